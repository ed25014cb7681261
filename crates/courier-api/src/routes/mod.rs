//! Route definitions
//!
//! All API routes organized by domain and mounted under /api. Unsupported
//! methods on known routes answer 405 from the router itself, which the
//! synchronizer's gateway strategy treats as a hard rejection.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{auth, conversations, health, messages, templates, users};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes (exported separately, probes skip the /api prefix)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(template_routes())
}

/// Conversation and read-state routes
fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/read-states",
            get(conversations::list_read_states),
        )
        .route(
            "/conversations/:phone/messages",
            get(conversations::get_conversation_messages),
        )
        .route(
            "/conversations/:phone/mark-read",
            patch(conversations::mark_read),
        )
}

/// Message routes
fn message_routes() -> Router<AppState> {
    Router::new().route("/messages", post(messages::send_message))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(auth::login))
}

/// User and assignment routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/phone-number", get(users::get_assignment))
        .route("/users/:user_id/phone-number", put(users::assign_number))
        .route(
            "/users/:user_id/phone-number",
            delete(users::remove_assignment),
        )
        .route("/phone-numbers", get(users::list_assignments))
}

/// Template routes
fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(templates::list_templates))
        .route("/templates", post(templates::create_template))
        .route("/templates/:template_id", patch(templates::update_template))
        .route(
            "/templates/:template_id",
            delete(templates::delete_template),
        )
}
