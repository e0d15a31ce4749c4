//! # Imageline - Headless Unsplash Client Core
//!
//! An event-driven client for a photo-sharing service: OAuth code
//! exchange, a paginated photo feed with like toggling, and profile
//! lookups, tied together by an in-process event bus with buffered
//! redelivery.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   present()   ┌──────────────┐   completions  ┌──────────┐
//! │  Embedder   │◄──────────────│  Controller  │◄───────────────│ Services │
//! │             │               │              │   (mpsc poll)  │          │
//! │ - CLI       │               │ - tick loop  │                │ - feed   │
//! │ - UI shell  │               │ - wiring     │                │ - auth   │
//! └─────────────┘               └──────┬───────┘                │ - profile│
//!                                      │                        └────┬─────┘
//!                                      │ subscribe                   │ publish
//!                                      ▼                             ▼
//!                               ┌──────────────────────────────────────┐
//!                               │              EventBus                │
//!                               │  buffered redelivery, sender filters │
//!                               └──────────────────────────────────────┘
//! ```
//!
//! All business state lives on one logical thread. Network calls run on
//! spawned tasks; their results come back as messages and are applied
//! inside the controller's tick, so no locks guard service state.

pub mod client;
pub mod cmd_args;
pub mod config;

// Re-export main types for easy access
pub use client::*;
