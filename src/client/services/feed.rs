//! # Photo Feed Service
//!
//! Paginated photo listing and like toggling. Each operation kind is
//! independently single-flight: a page fetch and a like toggle may overlap,
//! but a second request of the same kind while one is running is logged and
//! dropped. Network work happens on spawned tasks; results come back over
//! an internal channel and are applied to the photo list only inside
//! [`PhotoFeedService::poll`], on the control thread.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::error::NetworkError;
use crate::client::events::{Event, EventBus, EventName};
use crate::client::http::{self, HttpMethod, HttpRequest, HttpTransport};
use crate::client::models::{LikeResult, Photo, PhotoResult};
use crate::config;

/// Completion callback for feed operations
pub type FeedCompletion = Box<dyn FnOnce(Result<(), NetworkError>)>;

/// Results sent back from spawned network tasks
enum FeedMessage {
    PageLoaded(Result<Vec<PhotoResult>, NetworkError>),
    LikeToggled {
        index: usize,
        result: Result<LikeResult, NetworkError>,
    },
}

/// Owns the in-memory photo list and the feed paging state
pub struct PhotoFeedService {
    transport: Arc<dyn HttpTransport>,
    access_key: String,
    per_page: u32,

    photos: Vec<Photo>,
    last_loaded_page: Option<u32>,

    page_in_flight: bool,
    like_in_flight: bool,
    page_completion: Option<FeedCompletion>,
    like_completion: Option<FeedCompletion>,

    tx: mpsc::Sender<FeedMessage>,
    rx: mpsc::Receiver<FeedMessage>,
}

impl PhotoFeedService {
    pub fn new(transport: Arc<dyn HttpTransport>, access_key: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(10);
        Self {
            transport,
            access_key: access_key.into(),
            per_page: config::PHOTOS_PER_PAGE,
            photos: Vec::new(),
            last_loaded_page: None,
            page_in_flight: false,
            like_in_flight: false,
            page_completion: None,
            like_completion: None,
            tx,
            rx,
        }
    }

    /// Read-only snapshot of the feed
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn last_loaded_page(&self) -> Option<u32> {
        self.last_loaded_page
    }

    /// Whether any feed operation is still in flight
    pub fn busy(&self) -> bool {
        self.page_in_flight || self.like_in_flight
    }

    /// Request the next feed page
    ///
    /// A request arriving while a page fetch is already running is dropped:
    /// logged, not queued, and the completion is never invoked.
    pub fn fetch_next_page(&mut self, completion: FeedCompletion) {
        if self.page_in_flight {
            tracing::warn!("previous page fetch is still running, dropping request");
            return;
        }

        let page = self.last_loaded_page.unwrap_or(0) + 1;
        let request = HttpRequest::get(format!("{}photos", config::API_BASE_URL))
            .query("client_id", self.access_key.clone())
            .query("page", page.to_string())
            .query("per_page", self.per_page.to_string());

        tracing::debug!("fetching feed page {}", page);
        self.page_in_flight = true;
        self.page_completion = Some(completion);

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = http::fetch_json::<Vec<PhotoResult>>(transport.as_ref(), request).await;
            let _ = tx.send(FeedMessage::PageLoaded(result)).await;
        });
    }

    /// Toggle the like state of the photo at `index`
    ///
    /// Out-of-range indexes are logged and ignored without invoking the
    /// completion. The verb follows the current state: POST to like,
    /// DELETE to unlike. The server's returned photo replaces the local
    /// one wholesale on success.
    pub fn change_like(&mut self, token: &str, index: usize, completion: FeedCompletion) {
        if self.like_in_flight {
            tracing::warn!("previous like toggle is still running, dropping request");
            return;
        }

        let photo = match self.photos.get(index) {
            Some(photo) => photo,
            None => {
                tracing::warn!("photo index {} out of range, ignoring like toggle", index);
                return;
            }
        };

        let method = if photo.is_liked {
            HttpMethod::Delete
        } else {
            HttpMethod::Post
        };
        let request = HttpRequest::new(
            method,
            format!("{}photos/{}/like", config::API_BASE_URL, photo.id),
        )
        .bearer(token);

        tracing::debug!("{} like for photo {}", method.as_str(), photo.id);
        self.like_in_flight = true;
        self.like_completion = Some(completion);

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = http::fetch_json::<LikeResult>(transport.as_ref(), request).await;
            let _ = tx.send(FeedMessage::LikeToggled { index, result }).await;
        });
    }

    /// Drop all feed state for a fresh session
    ///
    /// Results of operations still in flight are discarded.
    pub fn reset(&mut self) {
        self.photos.clear();
        self.last_loaded_page = None;
        self.page_in_flight = false;
        self.like_in_flight = false;
        self.page_completion = None;
        self.like_completion = None;
        while self.rx.try_recv().is_ok() {}
    }

    /// Apply queued network completions to the feed state
    ///
    /// Returns the number of completions applied. Must be called from the
    /// control thread; this is the only place feed state mutates.
    pub fn poll(&mut self, bus: &mut EventBus) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            self.apply(message, bus);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, message: FeedMessage, bus: &mut EventBus) {
        match message {
            FeedMessage::PageLoaded(Ok(results)) => {
                // The first item of every page repeats the tail of the
                // previous page; drop it before appending.
                let fresh: Vec<Photo> = results
                    .into_iter()
                    .skip(1)
                    .map(PhotoResult::into_photo)
                    .collect();

                self.last_loaded_page = Some(self.last_loaded_page.unwrap_or(0) + 1);
                tracing::debug!(
                    "page {} loaded, {} new photos",
                    self.last_loaded_page.unwrap_or(0),
                    fresh.len()
                );
                self.photos.extend(fresh);
                self.page_in_flight = false;

                if let Some(completion) = self.page_completion.take() {
                    completion(Ok(()));
                }
                bus.publish(Event::from_sender::<PhotoFeedService>(EventName::FeedChanged));
            }
            FeedMessage::PageLoaded(Err(error)) => {
                tracing::error!("feed page fetch failed: {}", error);
                self.page_in_flight = false;
                if let Some(completion) = self.page_completion.take() {
                    completion(Err(error));
                }
            }
            FeedMessage::LikeToggled {
                index,
                result: Ok(like),
            } => {
                self.like_in_flight = false;
                if self.photos.get(index).is_some() {
                    self.photos[index] = like.photo.into_photo();
                }
                if let Some(completion) = self.like_completion.take() {
                    completion(Ok(()));
                }
            }
            FeedMessage::LikeToggled {
                index,
                result: Err(error),
            } => {
                tracing::error!("like toggle for index {} failed: {}", index, error);
                self.like_in_flight = false;
                if let Some(completion) = self.like_completion.take() {
                    completion(Err(error));
                }
            }
        }
    }
}
