//! Conversation handlers
//!
//! The inbox listing, single-thread retrieval, and the read-state gateway
//! endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use courier_service::{
    ConversationResponse, InboxService, MarkReadRequest, MarkReadResponse, MessageResponse,
    ReadStateResponse,
};

use crate::extractors::{PhonePath, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters identifying the acting user
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

fn user_query(query: Result<Query<UserIdQuery>, axum::extract::rejection::QueryRejection>) -> ApiResult<Uuid> {
    let Query(q) = query.map_err(|_| ApiError::invalid_query("user_id is required"))?;
    Ok(q.user_id)
}

/// List conversation summaries, newest first
///
/// GET /api/conversations?user_id=…
pub async fn list_conversations(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<ConversationResponse>>> {
    let user_id = user_query(query)?;
    let service = InboxService::new(state.service_context());
    let conversations = service.conversations(user_id).await?;
    Ok(Json(conversations))
}

/// One conversation's messages, oldest first
///
/// GET /api/conversations/{phone}/messages?user_id=…
pub async fn get_conversation_messages(
    State(state): State<AppState>,
    PhonePath(phone): PhonePath,
    query: Result<Query<UserIdQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let user_id = user_query(query)?;
    let service = InboxService::new(state.service_context());
    let messages = service.conversation_messages(user_id, &phone).await?;
    Ok(Json(messages))
}

/// Mark a conversation as read (the gateway upsert)
///
/// PATCH /api/conversations/{phone}/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    PhonePath(phone): PhonePath,
    ValidatedJson(request): ValidatedJson<MarkReadRequest>,
) -> ApiResult<Json<MarkReadResponse>> {
    let service = InboxService::new(state.service_context());
    let response = service.mark_read(request.user_id, &phone).await?;
    Ok(Json(response))
}

/// All stored read markers for a user
///
/// GET /api/conversations/read-states?user_id=…
pub async fn list_read_states(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<ReadStateResponse>>> {
    let user_id = user_query(query)?;
    let service = InboxService::new(state.service_context());
    let states = service.read_states(user_id).await?;
    Ok(Json(states))
}
