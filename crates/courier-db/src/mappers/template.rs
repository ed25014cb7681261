//! Template entity <-> model mapper

use courier_core::{DomainError, MessageTemplate, TemplateKind};

use crate::models::TemplateModel;

impl TryFrom<TemplateModel> for MessageTemplate {
    type Error = DomainError;

    fn try_from(model: TemplateModel) -> Result<Self, Self::Error> {
        let kind = TemplateKind::parse(&model.kind)
            .ok_or_else(|| DomainError::DatabaseError(format!("corrupt kind column: {}", model.kind)))?;
        Ok(MessageTemplate {
            id: model.id,
            user_id: model.user_id,
            kind,
            name: model.name,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
