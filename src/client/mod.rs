//! # Client Module
//!
//! The client core, organized by responsibility:
//!
//! - `events`: publish/subscribe bus with buffered redelivery
//! - `http`: transport trait, reqwest client, decode helper, mock
//! - `models`: wire and domain data types
//! - `services`: feed paging, like toggling, token exchange, profile
//! - `storage`: bearer-token persistence
//! - `view_models`: thin presenters over the bus
//! - `controllers`: the single-threaded control loop

pub mod controllers;
pub mod error;
pub mod events;
pub mod http;
pub mod models;
pub mod services;
pub mod storage;
pub mod view_models;

pub use controllers::{AppController, Presentation, PresentFn};
pub use error::{AuthError, EventBusError, NetworkError, ParseError};
pub use events::{Event, EventBus, EventName, Registration, SenderTag, SubscriptionHandle};
pub use http::{HttpClient, HttpTransport};
pub use models::{Photo, Profile};
pub use services::{AuthService, PhotoFeedService, ProfileImageService, ProfileService};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use view_models::{FeedViewModel, ProfileViewModel};
