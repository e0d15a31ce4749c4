//! # Photo Models
//!
//! Wire shapes for the feed endpoints plus the domain photo record owned
//! by the feed service.

use std::collections::HashMap;

use serde::Deserialize;

/// URL flavors served for every photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoUrlKind {
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

impl PhotoUrlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoUrlKind::Raw => "raw",
            PhotoUrlKind::Full => "full",
            PhotoUrlKind::Regular => "regular",
            PhotoUrlKind::Small => "small",
            PhotoUrlKind::Thumb => "thumb",
        }
    }
}

/// One element of a feed page as returned by the photos endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoResult {
    pub id: String,
    pub created_at: Option<String>,
    pub width: u32,
    pub height: u32,
    pub description: Option<String>,
    #[serde(default)]
    pub liked_by_user: bool,
    #[serde(default)]
    pub urls: HashMap<String, String>,
}

/// Envelope returned by the like endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LikeResult {
    pub photo: PhotoResult,
}

/// Domain photo record
///
/// Owned exclusively by the feed service; consumers only ever see
/// read-only snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub thumb_url: String,
    pub large_url: String,
    pub is_liked: bool,
}

impl PhotoResult {
    /// Convert the wire photo into the domain record
    ///
    /// Picks the thumb and full URL flavors and reformats the creation
    /// date for display. A missing flavor becomes an empty URL rather than
    /// a decode failure, matching the lenient behavior of the feed screen.
    pub fn into_photo(self) -> Photo {
        let thumb_url = self
            .urls
            .get(PhotoUrlKind::Thumb.as_str())
            .cloned()
            .unwrap_or_default();
        let large_url = self
            .urls
            .get(PhotoUrlKind::Full.as_str())
            .cloned()
            .unwrap_or_default();

        let created_at = self.created_at.map(|raw| format_created_at(&raw));

        Photo {
            id: self.id,
            width: self.width,
            height: self.height,
            created_at,
            description: self.description,
            thumb_url,
            large_url,
            is_liked: self.liked_by_user,
        }
    }
}

/// Reformat an ISO-8601 timestamp as a display date
///
/// Unparseable input is passed through untouched.
fn format_created_at(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%d %B %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
