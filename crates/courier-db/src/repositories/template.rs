//! PostgreSQL implementation of TemplateRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{MessageTemplate, RepoResult, TemplateRepository};

use crate::models::TemplateModel;

use super::error::{map_db_error, template_not_found};

const TEMPLATE_COLUMNS: &str = "id, user_id, kind, name, content, created_at, updated_at";

/// PostgreSQL implementation of TemplateRepository
#[derive(Clone)]
pub struct PgTemplateRepository {
    pool: PgPool,
}

impl PgTemplateRepository {
    /// Create a new PgTemplateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<MessageTemplate>> {
        let model = sqlx::query_as::<_, TemplateModel>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM message_templates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(MessageTemplate::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<MessageTemplate>> {
        let models = sqlx::query_as::<_, TemplateModel>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM message_templates WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(MessageTemplate::try_from).collect()
    }

    #[instrument(skip(self, template))]
    async fn create(&self, template: &MessageTemplate) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO message_templates (id, user_id, kind, name, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(template.id)
        .bind(template.user_id)
        .bind(template.kind.as_str())
        .bind(&template.name)
        .bind(&template.content)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, template))]
    async fn update(&self, template: &MessageTemplate) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE message_templates
            SET kind = $2, name = $3, content = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(template.id)
        .bind(template.kind.as_str())
        .bind(&template.name)
        .bind(&template.content)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(template_not_found(template.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM message_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(template_not_found(id));
        }

        Ok(())
    }
}
