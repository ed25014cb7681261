//! Authentication handlers

use axum::{extract::State, Json};

use courier_service::{LoginRequest, UserResponse, UserService};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Verify credentials and return the account
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let user = service.login(request).await?;
    Ok(Json(user))
}
