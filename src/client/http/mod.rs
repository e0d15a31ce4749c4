//! # HTTP Module
//!
//! Transport trait, the reqwest-backed client, the generic
//! request-and-decode helper, and the mock transport used by tests.

pub mod client;
pub mod mock;

pub use client::{
    decode_json, fetch_json, HttpClient, HttpMethod, HttpRequest, HttpResponseData, HttpTransport,
};
pub use mock::MockTransport;
