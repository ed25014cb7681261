//! Integration test utilities for the Courier API
//!
//! Provides helpers for spawning a test server and making HTTP requests
//! against it.

pub mod helpers;

pub use helpers::*;
