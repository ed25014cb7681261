//! Template handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use courier_service::{
    CreateTemplateRequest, TemplateResponse, TemplateService, UpdateTemplateRequest,
};

use crate::extractors::ValidatedJson;
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Query parameters identifying the template owner
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

fn owner_query(
    query: Result<Query<OwnerQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Uuid> {
    let Query(q) = query.map_err(|_| ApiError::invalid_query("user_id is required"))?;
    Ok(q.user_id)
}

fn parse_template_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path("Invalid template id format"))
}

/// List a user's templates
///
/// GET /api/templates?user_id=…
pub async fn list_templates(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<TemplateResponse>>> {
    let user_id = owner_query(query)?;
    let service = TemplateService::new(state.service_context());
    Ok(Json(service.list_for_user(user_id).await?))
}

/// Create a template
///
/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTemplateRequest>,
) -> ApiResult<Created<Json<TemplateResponse>>> {
    let service = TemplateService::new(state.service_context());
    let template = service.create(request).await?;
    Ok(Created(Json(template)))
}

/// Update a template
///
/// PATCH /api/templates/{template_id}?user_id=…
pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    query: Result<Query<OwnerQuery>, axum::extract::rejection::QueryRejection>,
    ValidatedJson(request): ValidatedJson<UpdateTemplateRequest>,
) -> ApiResult<Json<TemplateResponse>> {
    let template_id = parse_template_id(&template_id)?;
    let user_id = owner_query(query)?;
    let service = TemplateService::new(state.service_context());
    let template = service.update(user_id, template_id, request).await?;
    Ok(Json(template))
}

/// Delete a template
///
/// DELETE /api/templates/{template_id}?user_id=…
pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<String>,
    query: Result<Query<OwnerQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<NoContent> {
    let template_id = parse_template_id(&template_id)?;
    let user_id = owner_query(query)?;
    let service = TemplateService::new(state.service_context());
    service.delete(user_id, template_id).await?;
    Ok(NoContent)
}
