//! # Feed View Model
//!
//! Thin presenter for the feed screen: subscribes to feed changes and
//! turns photo snapshots into render-ready lines.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::error::EventBusError;
use crate::client::events::{EventBus, EventName, Registration, SenderTag, SubscriptionHandle};
use crate::client::models::Photo;
use crate::client::services::PhotoFeedService;

/// Tracks whether the feed screen needs a redraw
pub struct FeedViewModel {
    dirty: Arc<AtomicBool>,
    subscription: SubscriptionHandle,
}

impl FeedViewModel {
    /// Subscribe to feed changes emitted by the feed service
    pub fn attach(bus: &mut EventBus) -> Result<Self, EventBusError> {
        let dirty = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&dirty);

        let registration = Registration::new(
            [EventName::FeedChanged],
            Box::new(move |_| {
                flag.store(true, Ordering::SeqCst);
            }),
        )?
        .with_senders([SenderTag::of::<PhotoFeedService>()]);

        let subscription = bus.subscribe(registration);
        Ok(Self {
            dirty,
            subscription,
        })
    }

    /// Consume the dirty flag; true means a redraw is due
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    pub fn subscription(&self) -> SubscriptionHandle {
        self.subscription
    }

    /// Format a photo snapshot for presentation
    pub fn render_lines(photos: &[Photo]) -> Vec<String> {
        photos
            .iter()
            .enumerate()
            .map(|(index, photo)| {
                let like_marker = if photo.is_liked { "♥" } else { " " };
                let date = photo.created_at.as_deref().unwrap_or("");
                format!(
                    "{index:>3} {like_marker} {} {}x{} {date}",
                    photo.id, photo.width, photo.height
                )
            })
            .collect()
    }
}
