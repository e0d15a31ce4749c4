//! Configuration constants and the profile store for imageline
//!
//! Client credentials live in an INI profile file so that several Unsplash
//! applications can be switched with `--profile`, mirroring how connection
//! profiles work elsewhere in the tool family.

use anyhow::{Context, Result};
use ini::Ini;

/// Web root of the photo service, used for OAuth endpoints
pub const DEFAULT_BASE_URL: &str = "https://unsplash.com/";

/// API root, used for all authenticated data endpoints
pub const API_BASE_URL: &str = "https://api.unsplash.com/";

/// OAuth scopes requested during authorization
pub const ACCESS_SCOPE: &str =
    "public+read_user+write_user+read_photos+write_photos+write_likes";

/// Out-of-band redirect URI for clients without a callback server
pub const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Number of photos requested per feed page
pub const PHOTOS_PER_PAGE: u32 = 10;

/// Default profile file path for imageline
pub const DEFAULT_PROFILE_PATH: &str = "~/.imageline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "IMAGELINE_PROFILE_PATH";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Credentials and endpoints for one registered API application
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub access_key: String,
    pub secret_key: String,
    pub redirect_uri: String,
}

impl ClientConfig {
    /// Create a config with the default out-of-band redirect URI
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }
}

/// Loads named [`ClientConfig`] sections from an INI profile file
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Load a profile section by name
    ///
    /// Returns `Ok(None)` when the file or the section does not exist so the
    /// caller can decide whether a missing profile is an error.
    pub fn load_profile(&self, name: &str) -> Result<Option<ClientConfig>> {
        let expanded = shellexpand::tilde(&self.path).into_owned();
        if !std::path::Path::new(&expanded).exists() {
            tracing::debug!("profile file '{}' does not exist", expanded);
            return Ok(None);
        }

        let ini = Ini::load_from_file(&expanded)
            .with_context(|| format!("failed to read profile file '{expanded}'"))?;

        let section = match ini.section(Some(name)) {
            Some(s) => s,
            None => {
                tracing::debug!("profile '{}' not found in '{}'", name, expanded);
                return Ok(None);
            }
        };

        let access_key = section
            .get("access_key")
            .with_context(|| format!("profile '{name}' is missing 'access_key'"))?;
        let secret_key = section
            .get("secret_key")
            .with_context(|| format!("profile '{name}' is missing 'secret_key'"))?;
        let redirect_uri = section.get("redirect_uri").unwrap_or(DEFAULT_REDIRECT_URI);

        Ok(Some(ClientConfig {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            redirect_uri: redirect_uri.to_string(),
        }))
    }
}
