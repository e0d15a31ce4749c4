//! # Error Types
//!
//! Typed failures for the client core. Services never panic past their
//! callback boundary; every failure path ends in one of these variants
//! handed to a completion callback.

use thiserror::Error;

/// Failure to interpret a response body as the expected type
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to decode response body as {type_name}")]
    Decode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Transport, status, and decode failures from the HTTP layer
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failures specific to the authorization-code exchange
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("a token exchange for this code was already requested")]
    DuplicateRequest,

    #[error("invalid authorization request")]
    InvalidRequest,

    #[error("unexpected token type {0:?}, expected bearer")]
    InvalidTokenType(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Failures constructing event-bus registrations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventBusError {
    #[error("a registration must observe at least one event name")]
    EmptyNameSet,
}
