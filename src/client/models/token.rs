//! # Token Models
//!
//! Wire shape of the OAuth token-exchange response.

use serde::Deserialize;

/// Body of the `POST /oauth/token` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub created_at: i64,
}
