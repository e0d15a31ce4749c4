//! # Profile View Model
//!
//! Thin presenter for the profile screen: watches profile and avatar
//! changes and keeps the avatar URL it received through the event payload.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::error::EventBusError;
use crate::client::events::{
    Event, EventBus, EventName, Registration, SenderTag, SubscriptionHandle,
};
use crate::client::models::Profile;
use crate::client::services::{ProfileImageService, ProfileService, AVATAR_URL_KEY};

/// Tracks profile-screen state between renders
pub struct ProfileViewModel {
    dirty: Arc<AtomicBool>,
    avatar_url: Arc<Mutex<Option<String>>>,
    subscription: SubscriptionHandle,
}

impl ProfileViewModel {
    /// Subscribe to profile and avatar changes from the profile services
    pub fn attach(bus: &mut EventBus) -> Result<Self, EventBusError> {
        let dirty = Arc::new(AtomicBool::new(false));
        let avatar_url = Arc::new(Mutex::new(None));

        let flag = Arc::clone(&dirty);
        let url_slot = Arc::clone(&avatar_url);
        let registration = Registration::new(
            [EventName::ProfileChanged, EventName::AvatarChanged],
            Box::new(move |event: &Event| {
                if let Some(url) = event.payload_str(AVATAR_URL_KEY) {
                    *url_slot.lock().unwrap() = Some(url.to_string());
                }
                flag.store(true, Ordering::SeqCst);
            }),
        )?
        .with_senders([
            SenderTag::of::<ProfileService>(),
            SenderTag::of::<ProfileImageService>(),
        ]);

        let subscription = bus.subscribe(registration);
        Ok(Self {
            dirty,
            avatar_url,
            subscription,
        })
    }

    /// Consume the dirty flag; true means a redraw is due
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    /// Avatar URL captured from the most recent avatar event
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar_url.lock().unwrap().clone()
    }

    pub fn subscription(&self) -> SubscriptionHandle {
        self.subscription
    }

    /// Format a profile snapshot for presentation
    pub fn render_lines(profile: &Profile, avatar_url: Option<&str>) -> Vec<String> {
        let mut lines = vec![
            profile.name.clone(),
            profile.login_name.clone(),
            profile.bio.clone(),
        ];
        if let Some(url) = avatar_url {
            lines.push(format!("avatar: {url}"));
        }
        lines
    }
}
