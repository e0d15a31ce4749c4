//! # Event Types
//!
//! The closed set of process-wide event names and the sender tag used to
//! scope events to the component that emitted them.

use std::any::TypeId;

/// Names of the process-wide events carried by the bus
///
/// The set is closed: services emit these and nothing else, so a subscriber
/// can enumerate everything it may receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// The cached user profile was replaced
    ProfileChanged,
    /// The avatar URL for the current user became available
    AvatarChanged,
    /// The photo feed gained or replaced items
    FeedChanged,
    /// The session was torn down
    Logout,
    /// The bus itself changed (generic announcement)
    BusChanged,
}

/// Identifies the emitter of an event by its runtime type
///
/// Filtering is deliberately type-level, not instance-level: two instances
/// of the same emitting type are indistinguishable to a filtered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderTag {
    type_id: TypeId,
    type_name: &'static str,
}

impl SenderTag {
    /// Tag for the type `S`
    pub fn of<S: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            type_name: std::any::type_name::<S>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable type name, for diagnostics only
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}
