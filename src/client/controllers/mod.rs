//! # Controllers Module
//!
//! The application controller that wires the bus, services, storage, and
//! view models together and runs the control loop.

mod app_controller;

pub use app_controller::{AppController, Presentation, PresentFn};
