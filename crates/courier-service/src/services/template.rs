//! Template service
//!
//! Per-user CRUD on message templates. Placeholder substitution is a client
//! concern and never happens here.

use tracing::{info, instrument};
use uuid::Uuid;

use courier_core::{MessageTemplate, TemplateKind};

use crate::dto::{CreateTemplateRequest, TemplateResponse, UpdateTemplateRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Template service
pub struct TemplateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TemplateService<'a> {
    /// Create a new TemplateService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All templates owned by a user, newest first
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<TemplateResponse>> {
        let templates = self.ctx.template_repo().find_by_user(user_id).await?;
        Ok(templates.iter().map(TemplateResponse::from).collect())
    }

    /// Create a template
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateTemplateRequest) -> ServiceResult<TemplateResponse> {
        let kind = parse_kind(&request.kind)?;
        let template = MessageTemplate::new(request.user_id, kind, request.name, request.content);
        self.ctx.template_repo().create(&template).await?;

        info!(template_id = %template.id, "Template created");
        Ok(TemplateResponse::from(&template))
    }

    /// Update a template owned by the given user
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        user_id: Uuid,
        template_id: Uuid,
        request: UpdateTemplateRequest,
    ) -> ServiceResult<TemplateResponse> {
        let mut template = self.owned_template(user_id, template_id).await?;

        let kind = match request.kind.as_deref() {
            Some(raw) => parse_kind(raw)?,
            None => template.kind,
        };
        let name = request.name.unwrap_or_else(|| template.name.clone());
        let content = request.content.unwrap_or_else(|| template.content.clone());
        template.edit(kind, name, content);

        self.ctx.template_repo().update(&template).await?;
        Ok(TemplateResponse::from(&template))
    }

    /// Delete a template owned by the given user
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, template_id: Uuid) -> ServiceResult<()> {
        self.owned_template(user_id, template_id).await?;
        self.ctx.template_repo().delete(template_id).await?;
        info!(template_id = %template_id, "Template deleted");
        Ok(())
    }

    /// Fetch a template and verify ownership. Templates of other users are
    /// reported as not-found rather than forbidden, so ids cannot be probed.
    async fn owned_template(
        &self,
        user_id: Uuid,
        template_id: Uuid,
    ) -> ServiceResult<MessageTemplate> {
        let template = self
            .ctx
            .template_repo()
            .find_by_id(template_id)
            .await?
            .filter(|t| t.user_id == user_id)
            .ok_or_else(|| ServiceError::not_found("Template", template_id.to_string()))?;
        Ok(template)
    }
}

fn parse_kind(raw: &str) -> ServiceResult<TemplateKind> {
    TemplateKind::parse(raw)
        .ok_or_else(|| ServiceError::validation(format!("Unknown template kind: {raw}")))
}
