//! # Profile Models
//!
//! Wire shapes for the profile endpoints and the immutable domain profile.

use std::collections::HashMap;

use serde::Deserialize;

/// Placeholder for profile fields the server left empty
const MISSING_FIELD: &str = "No data";

/// Body of the `/me` endpoint; every field may be absent
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResult {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Body of the `/users/{username}` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct UserResult {
    #[serde(rename = "profile_image", default)]
    pub profile_image: HashMap<String, String>,
}

/// Avatar flavors served per user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSize {
    Small,
    Medium,
    Large,
}

impl AvatarSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvatarSize::Small => "small",
            AvatarSize::Medium => "medium",
            AvatarSize::Large => "large",
        }
    }
}

/// Immutable domain profile; replaced wholesale on re-fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub username: String,
    pub name: String,
    pub login_name: String,
    pub bio: String,
}

impl ProfileResult {
    /// Build the domain profile, filling absent fields with a placeholder
    pub fn into_profile(self) -> Profile {
        let username = self.username.unwrap_or_else(|| MISSING_FIELD.to_string());
        let first = self.first_name.unwrap_or_else(|| MISSING_FIELD.to_string());
        let last = self.last_name.unwrap_or_else(|| MISSING_FIELD.to_string());

        Profile {
            name: format!("{first} {last}"),
            login_name: format!("@{username}"),
            bio: self.bio.unwrap_or_else(|| MISSING_FIELD.to_string()),
            username,
        }
    }
}
