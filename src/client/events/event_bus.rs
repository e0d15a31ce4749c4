//! # Event Bus
//!
//! Process-wide publish/subscribe with buffered redelivery. An event
//! published while no matching subscriber is registered is kept in a pending
//! set, keyed by `(name, sender type)`, and handed to the first matching
//! subscriber that registers later. Delivery is synchronous: by the time
//! `publish` returns, every currently registered matching handler has run.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use crate::client::error::EventBusError;
use crate::client::events::types::{EventName, SenderTag};

/// Payload attached to an event, keyed by caller-defined strings
pub type Payload = HashMap<String, serde_json::Value>;

/// Type alias for event handlers to reduce complexity
pub type EventHandler = Box<dyn Fn(&Event) + Send + Sync>;

/// A named, sender-scoped event
#[derive(Debug, Clone)]
pub struct Event {
    name: EventName,
    sender: SenderTag,
    payload: Payload,
}

impl Event {
    pub fn new(name: EventName, sender: SenderTag) -> Self {
        Self {
            name,
            sender,
            payload: Payload::new(),
        }
    }

    /// Event tagged with the emitting type `S`
    pub fn from_sender<S: 'static>(name: EventName) -> Self {
        Self::new(name, SenderTag::of::<S>())
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Attach a single string payload entry
    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.payload
            .insert(key.to_string(), serde_json::Value::String(value.into()));
        self
    }

    pub fn name(&self) -> EventName {
        self.name
    }

    pub fn sender(&self) -> SenderTag {
        self.sender
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Fetch a string payload entry by key
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|value| value.as_str())
    }

    /// Buffering identity: repeated unconsumed events with the same key
    /// replace one another, newest wins
    fn pending_key(&self) -> (EventName, TypeId) {
        (self.name, self.sender.type_id())
    }
}

/// A subscriber's handler plus its name and sender filters
pub struct Registration {
    handler: EventHandler,
    names: HashSet<EventName>,
    senders: Option<HashSet<TypeId>>,
}

impl Registration {
    /// Create a registration observing the given event names
    ///
    /// An empty name set is a construction-time error: such a registration
    /// could never match anything.
    pub fn new(
        names: impl IntoIterator<Item = EventName>,
        handler: EventHandler,
    ) -> Result<Self, EventBusError> {
        let names: HashSet<EventName> = names.into_iter().collect();
        if names.is_empty() {
            return Err(EventBusError::EmptyNameSet);
        }
        Ok(Self {
            handler,
            names,
            senders: None,
        })
    }

    /// Restrict matching to events emitted by the given sender types
    pub fn with_senders(mut self, senders: impl IntoIterator<Item = SenderTag>) -> Self {
        self.senders = Some(senders.into_iter().map(|tag| tag.type_id()).collect());
        self
    }

    fn matches(&self, event: &Event) -> bool {
        match &self.senders {
            None => self.names.contains(&event.name()),
            Some(senders) if senders.is_empty() => self.names.contains(&event.name()),
            Some(senders) => {
                senders.contains(&event.sender().type_id()) && self.names.contains(&event.name())
            }
        }
    }
}

/// Handle returned from `subscribe`, used for explicit unsubscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// In-memory event bus with buffered redelivery
pub struct EventBus {
    registrations: Vec<(SubscriptionHandle, Registration)>,
    pending: HashMap<(EventName, TypeId), Event>,
    next_handle: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            pending: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Publish an event to every matching subscriber
    ///
    /// With no matching subscriber the event is buffered under its
    /// `(name, sender type)` key, replacing any pending event with the same
    /// key. With at least one match the event is delivered synchronously to
    /// each and never buffered.
    pub fn publish(&mut self, event: Event) {
        let mut delivered = false;
        for (_, registration) in &self.registrations {
            if registration.matches(&event) {
                (registration.handler)(&event);
                delivered = true;
            }
        }

        if !delivered {
            tracing::debug!(
                "no subscriber for {:?} from {}, buffering",
                event.name(),
                event.sender().type_name()
            );
            self.pending.insert(event.pending_key(), event);
        }
    }

    /// Register a subscriber and replay any pending events it matches
    ///
    /// Each matched pending event is delivered exactly once and removed.
    pub fn subscribe(&mut self, registration: Registration) -> SubscriptionHandle {
        let handle = SubscriptionHandle(self.next_handle);
        self.next_handle += 1;
        self.registrations.push((handle, registration));

        if let Some((_, registration)) = self.registrations.last() {
            let matched: Vec<(EventName, TypeId)> = self
                .pending
                .iter()
                .filter(|(_, event)| registration.matches(event))
                .map(|(key, _)| *key)
                .collect();
            for key in matched {
                if let Some(event) = self.pending.remove(&key) {
                    tracing::debug!("replaying buffered {:?} to late subscriber", event.name());
                    (registration.handler)(&event);
                }
            }
        }

        handle
    }

    /// Remove exactly one registration; unknown handles are a no-op
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) {
        self.registrations.retain(|(h, _)| *h != handle);
    }

    /// Remove every registration except the optionally excluded one
    ///
    /// Used at logout to tear down all screen subscriptions while keeping
    /// the root subscription alive.
    pub fn unsubscribe_all(&mut self, except: Option<SubscriptionHandle>) {
        self.registrations.retain(|(h, _)| Some(*h) == except);
    }

    /// Drop all buffered events without delivering them
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FeedSender;
    struct ProfileSender;

    fn recording_handler(received: &Arc<Mutex<Vec<Event>>>) -> EventHandler {
        let received = Arc::clone(received);
        Box::new(move |event| {
            received.lock().unwrap().push(event.clone());
        })
    }

    #[test]
    fn publish_should_deliver_to_matching_subscriber() {
        let mut bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&received)).unwrap(),
        );
        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name(), EventName::FeedChanged);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn delivery_should_be_synchronous_with_publish() {
        let mut bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        bus.subscribe(
            Registration::new(
                [EventName::BusChanged],
                Box::new(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap(),
        );

        bus.publish(Event::from_sender::<FeedSender>(EventName::BusChanged));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn publish_without_subscriber_should_buffer() {
        let mut bus = EventBus::new();
        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));
        assert_eq!(bus.pending_count(), 1);
    }

    #[test]
    fn publishing_same_key_twice_should_replace_not_append() {
        let mut bus = EventBus::new();
        bus.publish(
            Event::from_sender::<ProfileSender>(EventName::AvatarChanged)
                .with_entry("avatar_url", "https://img.example/old"),
        );
        bus.publish(
            Event::from_sender::<ProfileSender>(EventName::AvatarChanged)
                .with_entry("avatar_url", "https://img.example/new"),
        );
        assert_eq!(bus.pending_count(), 1);

        // The late subscriber sees only the newest event for the key
        let received = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            Registration::new([EventName::AvatarChanged], recording_handler(&received)).unwrap(),
        );
        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0].payload_str("avatar_url"),
            Some("https://img.example/new")
        );
    }

    #[test]
    fn same_name_from_different_sender_types_should_buffer_separately() {
        let mut bus = EventBus::new();
        bus.publish(Event::from_sender::<FeedSender>(EventName::BusChanged));
        bus.publish(Event::from_sender::<ProfileSender>(EventName::BusChanged));
        assert_eq!(bus.pending_count(), 2);
    }

    #[test]
    fn late_subscriber_should_receive_buffered_event_exactly_once() {
        let mut bus = EventBus::new();
        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));

        let received = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&received)).unwrap(),
        );

        assert_eq!(received.lock().unwrap().len(), 1);
        assert_eq!(bus.pending_count(), 0);

        // A second subscriber gets nothing: the event was consumed
        let late = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&late)).unwrap(),
        );
        assert!(late.lock().unwrap().is_empty());
    }

    #[test]
    fn delivered_event_should_not_be_buffered() {
        let mut bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&received)).unwrap(),
        );

        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn disjoint_name_sets_should_not_cross_deliver() {
        let mut bus = EventBus::new();
        let feed_events = Arc::new(Mutex::new(Vec::new()));
        let profile_events = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&feed_events)).unwrap(),
        );
        bus.subscribe(
            Registration::new([EventName::ProfileChanged], recording_handler(&profile_events))
                .unwrap(),
        );

        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));

        assert_eq!(feed_events.lock().unwrap().len(), 1);
        assert!(profile_events.lock().unwrap().is_empty());
    }

    #[test]
    fn sender_filter_should_match_on_sender_type() {
        let mut bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            Registration::new([EventName::BusChanged], recording_handler(&received))
                .unwrap()
                .with_senders([SenderTag::of::<FeedSender>()]),
        );

        bus.publish(Event::from_sender::<ProfileSender>(EventName::BusChanged));
        assert!(received.lock().unwrap().is_empty());

        bus.publish(Event::from_sender::<FeedSender>(EventName::BusChanged));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn sender_filtered_subscriber_should_still_require_name_match() {
        let mut bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&received))
                .unwrap()
                .with_senders([SenderTag::of::<FeedSender>()]),
        );

        bus.publish(Event::from_sender::<FeedSender>(EventName::BusChanged));
        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_sender_filter_should_fall_back_to_name_matching() {
        let mut bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&received))
                .unwrap()
                .with_senders([]),
        );

        bus.publish(Event::from_sender::<ProfileSender>(EventName::FeedChanged));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn empty_name_set_should_be_rejected_at_construction() {
        let result = Registration::new([], Box::new(|_| {}));
        assert!(matches!(result, Err(EventBusError::EmptyNameSet)));
    }

    #[test]
    fn unsubscribe_should_be_idempotent() {
        let mut bus = EventBus::new();
        let handle = bus.subscribe(
            Registration::new([EventName::FeedChanged], Box::new(|_| {})).unwrap(),
        );

        bus.unsubscribe(handle);
        assert_eq!(bus.registration_count(), 0);

        // Second removal of the same handle is a no-op, not a fault
        bus.unsubscribe(handle);
        assert_eq!(bus.registration_count(), 0);
    }

    #[test]
    fn unsubscribe_all_should_keep_excluded_handle() {
        let mut bus = EventBus::new();
        let root = bus.subscribe(
            Registration::new([EventName::Logout], Box::new(|_| {})).unwrap(),
        );
        bus.subscribe(Registration::new([EventName::FeedChanged], Box::new(|_| {})).unwrap());
        bus.subscribe(Registration::new([EventName::ProfileChanged], Box::new(|_| {})).unwrap());

        bus.unsubscribe_all(Some(root));
        assert_eq!(bus.registration_count(), 1);

        // The survivor is the root registration: a feed event no longer
        // finds a subscriber and gets buffered
        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));
        assert_eq!(bus.pending_count(), 1);
    }

    #[test]
    fn unsubscribe_all_without_exclusion_should_remove_everything() {
        let mut bus = EventBus::new();
        bus.subscribe(Registration::new([EventName::FeedChanged], Box::new(|_| {})).unwrap());
        bus.subscribe(Registration::new([EventName::Logout], Box::new(|_| {})).unwrap());

        bus.unsubscribe_all(None);
        assert_eq!(bus.registration_count(), 0);
    }

    #[test]
    fn clear_pending_should_drop_buffered_events() {
        let mut bus = EventBus::new();
        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));
        bus.publish(Event::from_sender::<ProfileSender>(EventName::ProfileChanged));
        assert_eq!(bus.pending_count(), 2);

        bus.clear_pending();
        assert_eq!(bus.pending_count(), 0);

        // A later subscriber sees nothing
        let received = Arc::new(Mutex::new(Vec::new()));
        bus.subscribe(
            Registration::new(
                [EventName::FeedChanged, EventName::ProfileChanged],
                recording_handler(&received),
            )
            .unwrap(),
        );
        assert!(received.lock().unwrap().is_empty());
    }

    #[test]
    fn multiple_subscribers_should_each_receive_the_event() {
        let mut bus = EventBus::new();
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&first)).unwrap(),
        );
        bus.subscribe(
            Registration::new([EventName::FeedChanged], recording_handler(&second)).unwrap(),
        );

        bus.publish(Event::from_sender::<FeedSender>(EventName::FeedChanged));

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
    }
}
