//! # Models Module
//!
//! Wire models for every REST endpoint the client consumes, plus the
//! domain records the services own.

pub mod photo;
pub mod profile;
pub mod token;

pub use photo::{LikeResult, Photo, PhotoResult, PhotoUrlKind};
pub use profile::{AvatarSize, Profile, ProfileResult, UserResult};
pub use token::TokenResponse;
