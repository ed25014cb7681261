//! User and phone-assignment handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use courier_service::{
    AssignNumberRequest, AssignmentResponse, AssignmentService, CreateUserRequest, UserResponse,
    UserService,
};

use crate::extractors::ValidatedJson;
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

fn parse_user_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
}

/// List all users
///
/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.list_users().await?))
}

/// Create a user
///
/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let user = service.create_user(request).await?;
    Ok(Created(Json(user)))
}

/// Get one user
///
/// GET /api/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_user(user_id).await?))
}

/// Get the user's assigned number
///
/// GET /api/users/{user_id}/phone-number
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Option<AssignmentResponse>>> {
    let user_id = parse_user_id(&user_id)?;
    let service = AssignmentService::new(state.service_context());
    Ok(Json(service.assignment_for_user(user_id).await?))
}

/// Assign a number to the user, replacing any previous one
///
/// PUT /api/users/{user_id}/phone-number
pub async fn assign_number(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(request): ValidatedJson<AssignNumberRequest>,
) -> ApiResult<Json<AssignmentResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let service = AssignmentService::new(state.service_context());
    let assignment = service.assign(user_id, &request.phone_number).await?;
    Ok(Json(assignment))
}

/// Remove the user's assignment
///
/// DELETE /api/users/{user_id}/phone-number
pub async fn remove_assignment(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<NoContent> {
    let user_id = parse_user_id(&user_id)?;
    let service = AssignmentService::new(state.service_context());
    service.remove(user_id).await?;
    Ok(NoContent)
}

/// List all assignments with their users (admin surface)
///
/// GET /api/phone-numbers
pub async fn list_assignments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AssignmentResponse>>> {
    let service = AssignmentService::new(state.service_context());
    Ok(Json(service.list_all().await?))
}
