//! # Token Storage
//!
//! Opaque key-value store for the single OAuth bearer token. The file
//! backend keeps the token under the user's home directory with an
//! environment-variable override, the same way the profile path works.

use std::fs;
use std::path::PathBuf;

/// Default token file path
pub const DEFAULT_TOKEN_PATH: &str = "~/.imageline/token";

/// Environment variable name for overriding the token path
pub const TOKEN_PATH_ENV_VAR: &str = "IMAGELINE_TOKEN_PATH";

/// Get the token file path, checking environment variable first, then falling back to default
pub fn get_token_path() -> String {
    std::env::var_os(TOKEN_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string())
}

/// Holds at most one bearer token
///
/// Set on a successful code exchange, cleared on logout. Reads and writes
/// are best-effort: storage failures are logged, never surfaced.
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&mut self, token: &str);
    fn clear(&mut self);
}

/// File-backed token store
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured path, honoring the environment override
    pub fn from_env() -> Self {
        let path = shellexpand::tilde(&get_token_path()).into_owned();
        Self::new(path)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("failed to read token file: {}", e);
                None
            }
        }
    }

    fn set(&mut self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("failed to create token directory: {}", e);
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, token) {
            tracing::warn!("failed to write token file: {}", e);
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to remove token file: {}", e),
        }
    }
}

/// In-memory token store for tests and embedders with their own secrets
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.clone()
    }

    fn set(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn clear(&mut self) {
        self.token = None;
    }
}
