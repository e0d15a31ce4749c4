//! # HTTP Client
//!
//! Thin transport abstraction over reqwest plus a generic
//! request-and-decode helper. Services build [`HttpRequest`] values and
//! never touch reqwest types directly, which keeps them testable against
//! the mock transport.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::error::{NetworkError, ParseError};

/// HTTP verbs used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One transport-level request: verb, URL, headers, query parameters
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Add a query parameter
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Attach a bearer token as the Authorization header
    pub fn bearer(mut self, token: &str) -> Self {
        self.headers
            .push(("Authorization".to_string(), format!("Bearer {token}")));
        self
    }
}

/// Raw transport response: status code plus body bytes
#[derive(Debug, Clone)]
pub struct HttpResponseData {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executes transport-level requests
///
/// The concrete implementation is [`HttpClient`]; tests substitute
/// [`MockTransport`](super::mock::MockTransport).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponseData, NetworkError>;
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponseData, NetworkError> {
        let url = reqwest::Url::parse_with_params(&request.url, &request.query)
            .map_err(|_| NetworkError::InvalidUrl(request.url.clone()))?;

        tracing::debug!("{} {}", request.method.as_str(), url);

        let mut builder = self.inner.request(request.method.into(), url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?
            .to_vec();

        Ok(HttpResponseData { status, body })
    }
}

/// Execute a request and decode the JSON body into `T`
///
/// Non-2xx statuses map to [`NetworkError::HttpStatus`] before any decoding
/// is attempted.
pub async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<T, NetworkError> {
    let response = transport.execute(request).await?;
    if !(200..300).contains(&response.status) {
        return Err(NetworkError::HttpStatus(response.status));
    }
    decode_json(&response.body)
}

/// Decode a JSON body into `T`, mapping failures to a typed parse error
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, NetworkError> {
    serde_json::from_slice(body).map_err(|source| {
        ParseError::Decode {
            type_name: std::any::type_name::<T>(),
            source,
        }
        .into()
    })
}
