//! # Mock Transport for Testing
//!
//! Pre-programmed responses and recorded requests, so services can be
//! exercised without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::{HttpRequest, HttpResponseData, HttpTransport};
use crate::client::error::NetworkError;

/// Mock transport with a FIFO queue of canned responses
///
/// Every executed request is recorded for later inspection.
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponseData, NetworkError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response with the given status and body
    pub fn push_response(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponseData {
                status,
                body: body.as_bytes().to_vec(),
            }));
    }

    /// Queue a successful JSON response
    pub fn push_json(&self, value: serde_json::Value) {
        self.push_response(200, &value.to_string());
    }

    /// Queue a transport-level failure
    pub fn push_error(&self, error: NetworkError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Requests executed so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponseData, NetworkError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(NetworkError::RequestFailed(
                    "no canned response queued".to_string(),
                ))
            })
    }
}
