//! # Profile Services
//!
//! Fetch the authenticated user's profile and avatar URL, cache the
//! results for the session, and announce changes on the event bus. The
//! avatar URL additionally travels in the event payload so subscribers can
//! render it without querying the service back.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::error::{NetworkError, ParseError};
use crate::client::events::{Event, EventBus, EventName};
use crate::client::http::{self, HttpRequest, HttpTransport};
use crate::client::models::{AvatarSize, Profile, ProfileResult, UserResult};
use crate::config;

/// Payload key carrying the avatar URL on [`EventName::AvatarChanged`]
pub const AVATAR_URL_KEY: &str = "avatar_url";

/// Completion callback for the profile fetch
pub type ProfileCompletion = Box<dyn FnOnce(Result<Profile, NetworkError>)>;

/// Completion callback for the avatar fetch
pub type AvatarCompletion = Box<dyn FnOnce(Result<String, NetworkError>)>;

/// Fetches and caches the authenticated user's profile
pub struct ProfileService {
    transport: Arc<dyn HttpTransport>,
    profile: Option<Profile>,
    in_flight: bool,
    completion: Option<ProfileCompletion>,
    tx: mpsc::Sender<Result<ProfileResult, NetworkError>>,
    rx: mpsc::Receiver<Result<ProfileResult, NetworkError>>,
}

impl ProfileService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let (tx, rx) = mpsc::channel(10);
        Self {
            transport,
            profile: None,
            in_flight: false,
            completion: None,
            tx,
            rx,
        }
    }

    /// Cached profile, if one was fetched this session
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn busy(&self) -> bool {
        self.in_flight
    }

    /// Fetch the profile of the token's owner
    ///
    /// A request while one is already running is logged and dropped.
    pub fn fetch_profile(&mut self, token: &str, completion: ProfileCompletion) {
        if self.in_flight {
            tracing::warn!("previous profile fetch is still running, dropping request");
            return;
        }

        let request = HttpRequest::get(format!("{}me", config::API_BASE_URL)).bearer(token);
        self.in_flight = true;
        self.completion = Some(completion);

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = http::fetch_json::<ProfileResult>(transport.as_ref(), request).await;
            let _ = tx.send(result).await;
        });
    }

    /// Apply queued fetch results; the cached profile is replaced wholesale
    pub fn poll(&mut self, bus: &mut EventBus) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.rx.try_recv() {
            self.in_flight = false;
            match result {
                Ok(wire) => {
                    let profile = wire.into_profile();
                    self.profile = Some(profile.clone());
                    if let Some(completion) = self.completion.take() {
                        completion(Ok(profile));
                    }
                    bus.publish(Event::from_sender::<ProfileService>(EventName::ProfileChanged));
                }
                Err(error) => {
                    tracing::error!("profile fetch failed: {}", error);
                    if let Some(completion) = self.completion.take() {
                        completion(Err(error));
                    }
                }
            }
            applied += 1;
        }
        applied
    }

    pub fn reset(&mut self) {
        self.profile = None;
        self.in_flight = false;
        self.completion = None;
        while self.rx.try_recv().is_ok() {}
    }
}

/// Fetches and caches the avatar URL for a username
pub struct ProfileImageService {
    transport: Arc<dyn HttpTransport>,
    avatar_url: Option<String>,
    in_flight: bool,
    completion: Option<AvatarCompletion>,
    tx: mpsc::Sender<Result<UserResult, NetworkError>>,
    rx: mpsc::Receiver<Result<UserResult, NetworkError>>,
}

impl ProfileImageService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let (tx, rx) = mpsc::channel(10);
        Self {
            transport,
            avatar_url: None,
            in_flight: false,
            completion: None,
            tx,
            rx,
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn busy(&self) -> bool {
        self.in_flight
    }

    /// Fetch the avatar URL for `username`, preferring the large flavor
    pub fn fetch_avatar_url(&mut self, username: &str, token: &str, completion: AvatarCompletion) {
        if self.in_flight {
            tracing::warn!("previous avatar fetch is still running, dropping request");
            return;
        }

        let request =
            HttpRequest::get(format!("{}users/{}", config::API_BASE_URL, username)).bearer(token);
        self.in_flight = true;
        self.completion = Some(completion);

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = http::fetch_json::<UserResult>(transport.as_ref(), request).await;
            let _ = tx.send(result).await;
        });
    }

    /// Apply queued fetch results
    ///
    /// A response without the expected flavor is a decode failure, not a
    /// silent fallback.
    pub fn poll(&mut self, bus: &mut EventBus) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.rx.try_recv() {
            self.in_flight = false;
            match result.and_then(Self::pick_large_flavor) {
                Ok(url) => {
                    self.avatar_url = Some(url.clone());
                    if let Some(completion) = self.completion.take() {
                        completion(Ok(url.clone()));
                    }
                    bus.publish(
                        Event::from_sender::<ProfileImageService>(EventName::AvatarChanged)
                            .with_entry(AVATAR_URL_KEY, url),
                    );
                }
                Err(error) => {
                    tracing::error!("avatar fetch failed: {}", error);
                    if let Some(completion) = self.completion.take() {
                        completion(Err(error));
                    }
                }
            }
            applied += 1;
        }
        applied
    }

    fn pick_large_flavor(user: UserResult) -> Result<String, NetworkError> {
        user.profile_image
            .get(AvatarSize::Large.as_str())
            .cloned()
            .ok_or_else(|| {
                ParseError::Decode {
                    type_name: std::any::type_name::<UserResult>(),
                    source: serde::de::Error::custom("profile_image is missing the large flavor"),
                }
                .into()
            })
    }

    pub fn reset(&mut self) {
        self.avatar_url = None;
        self.in_flight = false;
        self.completion = None;
        while self.rx.try_recv().is_ok() {}
    }
}
