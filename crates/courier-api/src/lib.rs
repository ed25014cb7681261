//! # courier-api
//!
//! REST API server built with Axum. Exposes the conversation read-state
//! gateway plus the inbox, template, user, and assignment surfaces.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
