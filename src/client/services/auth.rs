//! # Auth Service
//!
//! Exchanges an OAuth authorization code for a bearer token, at most once
//! per code. The duplicate guard exists because an embedded web view can
//! fire its redirect callback twice for the same code; the second exchange
//! must not happen. Unlike the feed service, a *different* code supersedes
//! the in-flight exchange: the old task is aborted and its completion is
//! dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::error::{AuthError, NetworkError};
use crate::client::http::{self, HttpRequest, HttpTransport};
use crate::client::models::TokenResponse;
use crate::config::{self, ClientConfig};

/// Completion callback for the token exchange
pub type TokenCompletion = Box<dyn FnOnce(Result<String, AuthError>)>;

/// Result of one exchange attempt, stamped with its request generation so
/// results of superseded attempts can be discarded
struct AuthMessage {
    generation: u64,
    result: Result<TokenResponse, NetworkError>,
}

/// Performs the authorization-code exchange and builds the authorize URL
pub struct AuthService {
    transport: Arc<dyn HttpTransport>,
    client: ClientConfig,

    last_code: Option<String>,
    exchange_task: Option<JoinHandle<()>>,
    completion: Option<TokenCompletion>,
    generation: u64,

    tx: mpsc::Sender<AuthMessage>,
    rx: mpsc::Receiver<AuthMessage>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn HttpTransport>, client: ClientConfig) -> Self {
        let (tx, rx) = mpsc::channel(10);
        Self {
            transport,
            client,
            last_code: None,
            exchange_task: None,
            completion: None,
            generation: 0,
            tx,
            rx,
        }
    }

    /// Whether a token exchange is still in flight
    pub fn busy(&self) -> bool {
        self.exchange_task.is_some()
    }

    /// Exchange an authorization code for a bearer token
    ///
    /// The same code twice yields [`AuthError::DuplicateRequest`] without
    /// touching the in-flight exchange. A different code aborts the
    /// in-flight exchange; its completion never fires.
    pub fn fetch_token(&mut self, code: &str, completion: TokenCompletion) {
        if self.last_code.as_deref() == Some(code) {
            tracing::warn!("token exchange for this code was already requested");
            completion(Err(AuthError::DuplicateRequest));
            return;
        }

        if let Some(task) = self.exchange_task.take() {
            tracing::debug!("superseding in-flight token exchange");
            task.abort();
            self.completion = None;
        }

        self.generation += 1;
        self.last_code = Some(code.to_string());
        self.completion = Some(completion);

        let request = HttpRequest::post(format!("{}oauth/token", config::DEFAULT_BASE_URL))
            .query("client_id", self.client.access_key.clone())
            .query("client_secret", self.client.secret_key.clone())
            .query("redirect_uri", self.client.redirect_uri.clone())
            .query("code", code)
            .query("grant_type", "authorization_code");

        let generation = self.generation;
        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        self.exchange_task = Some(tokio::spawn(async move {
            let result = http::fetch_json::<TokenResponse>(transport.as_ref(), request).await;
            let _ = tx.send(AuthMessage { generation, result }).await;
        }));
    }

    /// Apply queued exchange results
    ///
    /// Returns the number of completions applied. On completion, success or
    /// failure, the code guard and task handle are cleared so a fresh code
    /// can be exchanged later.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.rx.try_recv() {
            if message.generation != self.generation {
                tracing::debug!("discarding result of a superseded token exchange");
                continue;
            }

            self.last_code = None;
            self.exchange_task = None;

            let outcome = match message.result {
                Ok(token) if token.token_type.eq_ignore_ascii_case("bearer") => {
                    Ok(token.access_token)
                }
                Ok(token) => {
                    tracing::error!("token exchange returned type {:?}", token.token_type);
                    Err(AuthError::InvalidTokenType(token.token_type))
                }
                Err(NetworkError::HttpStatus(401)) => Err(AuthError::AuthenticationFailed),
                Err(error) => {
                    tracing::error!("token exchange failed: {}", error);
                    Err(AuthError::Network(error))
                }
            };

            if let Some(completion) = self.completion.take() {
                completion(outcome);
            }
            applied += 1;
        }
        applied
    }

    /// Forget the exchange state (used at logout)
    pub fn reset(&mut self) {
        if let Some(task) = self.exchange_task.take() {
            task.abort();
        }
        self.last_code = None;
        self.completion = None;
        self.generation += 1;
        while self.rx.try_recv().is_ok() {}
    }

    /// Build the authorization URL the user opens to grant access
    ///
    /// Pure construction from the client credentials and scope; no network,
    /// no state.
    pub fn authorization_request_url(&self) -> Result<String, AuthError> {
        let url = format!(
            "{}oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
            config::DEFAULT_BASE_URL,
            self.client.access_key,
            self.client.redirect_uri,
            config::ACCESS_SCOPE,
        );
        reqwest::Url::parse(&url).map_err(|_| AuthError::InvalidRequest)?;
        Ok(url)
    }

    /// Extract the authorization code from a redirect URL
    pub fn authorization_code_from_redirect(url: &str) -> Result<String, AuthError> {
        let parsed = reqwest::Url::parse(url).map_err(|_| AuthError::InvalidRequest)?;
        parsed
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .ok_or(AuthError::InvalidRequest)
    }
}
