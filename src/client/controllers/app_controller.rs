//! # Application Controller
//!
//! Owns the event bus, the services, the token store, and the view models,
//! and runs the single-threaded control loop. All network completions are
//! applied to shared state inside [`AppController::tick`]; nothing in the
//! core takes a lock around business state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::error::{AuthError, EventBusError};
use crate::client::events::{Event, EventBus, EventName, Registration, SubscriptionHandle};
use crate::client::http::HttpTransport;
use crate::client::models::Profile;
use crate::client::services::{
    AuthService, AvatarCompletion, FeedCompletion, PhotoFeedService, ProfileCompletion,
    ProfileImageService, ProfileService, TokenCompletion,
};
use crate::client::storage::TokenStore;
use crate::client::view_models::{FeedViewModel, ProfileViewModel};
use crate::config::ClientConfig;

/// What the presentation seam is asked to show
#[derive(Debug, Clone, PartialEq)]
pub enum Presentation {
    Feed(Vec<String>),
    Profile(Vec<String>),
    Alert(String),
}

/// Presentation callback supplied by the embedder
pub type PresentFn = Box<dyn Fn(Presentation)>;

/// Orchestrates services, bus, and view models on one logical thread
pub struct AppController {
    event_bus: EventBus,
    token_store: Box<dyn TokenStore>,

    auth: AuthService,
    feed: PhotoFeedService,
    profile: ProfileService,
    profile_image: ProfileImageService,

    feed_view: FeedViewModel,
    profile_view: ProfileViewModel,
    root_subscription: SubscriptionHandle,
    logged_out: Arc<AtomicBool>,

    pending_token: Arc<Mutex<Option<String>>>,
    present: PresentFn,
}

impl AppController {
    pub fn new(
        client: ClientConfig,
        transport: Arc<dyn HttpTransport>,
        token_store: Box<dyn TokenStore>,
        present: PresentFn,
    ) -> Result<Self, EventBusError> {
        let mut event_bus = EventBus::new();

        // Root subscription: survives logout teardown, like the splash
        // screen that has to notice the session ending
        let logged_out = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&logged_out);
        let root_subscription = event_bus.subscribe(Registration::new(
            [EventName::Logout],
            Box::new(move |_| {
                flag.store(true, Ordering::SeqCst);
            }),
        )?);

        let feed_view = FeedViewModel::attach(&mut event_bus)?;
        let profile_view = ProfileViewModel::attach(&mut event_bus)?;

        Ok(Self {
            auth: AuthService::new(Arc::clone(&transport), client.clone()),
            feed: PhotoFeedService::new(Arc::clone(&transport), client.access_key.clone()),
            profile: ProfileService::new(Arc::clone(&transport)),
            profile_image: ProfileImageService::new(transport),
            event_bus,
            token_store,
            feed_view,
            profile_view,
            root_subscription,
            logged_out,
            pending_token: Arc::new(Mutex::new(None)),
            present,
        })
    }

    /// Stored bearer token, if the user is logged in
    pub fn token(&self) -> Option<String> {
        self.token_store.get()
    }

    /// URL the user opens in a browser to grant access
    pub fn authorization_request_url(&self) -> Result<String, AuthError> {
        self.auth.authorization_request_url()
    }

    /// Exchange an authorization code; the token is stored on success
    pub fn login(&mut self, code: &str, completion: TokenCompletion) {
        let pending = Arc::clone(&self.pending_token);
        self.auth.fetch_token(
            code,
            Box::new(move |result| {
                if let Ok(token) = &result {
                    *pending.lock().unwrap() = Some(token.clone());
                }
                completion(result);
            }),
        );
    }

    /// Fetch the next feed page
    pub fn load_next_page(&mut self, completion: FeedCompletion) {
        self.feed.fetch_next_page(completion);
    }

    /// Toggle the like state of the photo at `index`
    ///
    /// Requires a stored token; without one an alert is presented and the
    /// completion is never invoked.
    pub fn toggle_like(&mut self, index: usize, completion: FeedCompletion) {
        match self.token_store.get() {
            Some(token) => self.feed.change_like(&token, index, completion),
            None => {
                tracing::warn!("like toggle requested without a stored token");
                (self.present)(Presentation::Alert("Log in to like photos".to_string()));
            }
        }
    }

    /// Fetch the authenticated user's profile
    pub fn load_profile(&mut self, completion: ProfileCompletion) {
        match self.token_store.get() {
            Some(token) => self.profile.fetch_profile(&token, completion),
            None => {
                tracing::warn!("profile fetch requested without a stored token");
                (self.present)(Presentation::Alert("Log in to see your profile".to_string()));
            }
        }
    }

    /// Fetch the avatar URL for `username`
    pub fn load_avatar(&mut self, username: &str, completion: AvatarCompletion) {
        match self.token_store.get() {
            Some(token) => self.profile_image.fetch_avatar_url(username, &token, completion),
            None => {
                tracing::warn!("avatar fetch requested without a stored token");
                (self.present)(Presentation::Alert("Log in to see your profile".to_string()));
            }
        }
    }

    /// Cached profile snapshot
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.profile()
    }

    /// Apply queued network completions and re-present dirty screens
    ///
    /// Returns the number of completions applied. This is the only place
    /// shared state mutates, so everything stays on the control thread.
    pub fn tick(&mut self) -> usize {
        let mut applied = 0;

        applied += self.auth.poll();
        if let Some(token) = self.pending_token.lock().unwrap().take() {
            self.token_store.set(&token);
            tracing::info!("bearer token stored");
        }

        applied += self.feed.poll(&mut self.event_bus);
        applied += self.profile.poll(&mut self.event_bus);
        applied += self.profile_image.poll(&mut self.event_bus);

        if self.feed_view.take_dirty() {
            (self.present)(Presentation::Feed(FeedViewModel::render_lines(
                self.feed.photos(),
            )));
        }
        if self.profile_view.take_dirty() {
            if let Some(profile) = self.profile.profile() {
                (self.present)(Presentation::Profile(ProfileViewModel::render_lines(
                    profile,
                    self.profile_view.avatar_url().as_deref(),
                )));
            }
        }

        applied
    }

    /// Whether any service still has work in flight
    pub fn busy(&self) -> bool {
        self.auth.busy() || self.feed.busy() || self.profile.busy() || self.profile_image.busy()
    }

    /// Tick until every in-flight operation has completed
    pub async fn run_until_idle(&mut self) {
        loop {
            self.tick();
            if !self.busy() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Tear down the session
    ///
    /// Clears the stored token, resets every service, announces the logout
    /// to whoever is still listening, then removes every subscription
    /// except the root one and drops buffered events so nothing stale
    /// leaks into the next session.
    pub fn logout(&mut self) {
        tracing::info!("logging out");
        self.token_store.clear();
        self.auth.reset();
        self.feed.reset();
        self.profile.reset();
        self.profile_image.reset();

        self.event_bus
            .publish(Event::from_sender::<AppController>(EventName::Logout));
        self.event_bus.unsubscribe_all(Some(self.root_subscription));
        self.event_bus.clear_pending();
    }

    /// Set once the logout event has been observed by the root subscription
    pub fn is_logged_out(&self) -> bool {
        self.logged_out.load(Ordering::SeqCst)
    }

    /// Feed snapshot for embedders that render on their own schedule
    pub fn photos(&self) -> &[crate::client::models::Photo] {
        self.feed.photos()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
