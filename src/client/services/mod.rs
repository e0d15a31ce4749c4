//! # Services Module
//!
//! The business-logic layer: paginated feed, like toggling, token
//! exchange, and profile lookups. Services own their state exclusively;
//! network completions are applied only inside each service's `poll`,
//! called from the control thread.

pub mod auth;
pub mod feed;
pub mod profile;

pub use auth::{AuthService, TokenCompletion};
pub use feed::{FeedCompletion, PhotoFeedService};
pub use profile::{
    AvatarCompletion, ProfileCompletion, ProfileImageService, ProfileService, AVATAR_URL_KEY,
};
