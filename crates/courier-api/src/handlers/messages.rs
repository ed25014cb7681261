//! Message handlers

use axum::{extract::State, Json};

use courier_service::{InboxService, MessageResponse, SendMessageRequest};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Send an outbound message from the user's assigned number
///
/// POST /api/messages
pub async fn send_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = InboxService::new(state.service_context());
    let message = service
        .send_message(request.user_id, &request.to, &request.body)
        .await?;
    Ok(Created(Json(message)))
}
