//! # Events Module
//!
//! The event system: a closed set of event names, sender tags, and the
//! bus that delivers or buffers published events.

pub mod event_bus;
pub mod types;

pub use event_bus::{Event, EventBus, EventHandler, Payload, Registration, SubscriptionHandle};
pub use types::{EventName, SenderTag};
