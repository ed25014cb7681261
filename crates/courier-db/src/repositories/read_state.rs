//! PostgreSQL implementation of ReadStateRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{ConversationReadState, PhoneNumber, ReadStateRepository, RepoResult};

use crate::models::ReadStateModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReadStateRepository
#[derive(Clone)]
pub struct PgReadStateRepository {
    pool: PgPool,
}

impl PgReadStateRepository {
    /// Create a new PgReadStateRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadStateRepository for PgReadStateRepository {
    #[instrument(skip(self))]
    async fn upsert(
        &self,
        user_id: Uuid,
        phone_number: &PhoneNumber,
        last_read_at: DateTime<Utc>,
    ) -> RepoResult<ConversationReadState> {
        // Whole-row upsert on the (user_id, phone_number) key. Re-running the
        // same upsert converges to the same row apart from updated_at.
        let model = sqlx::query_as::<_, ReadStateModel>(
            r#"
            INSERT INTO conversation_read_states (user_id, phone_number, last_read_at, updated_at)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT (user_id, phone_number)
            DO UPDATE SET last_read_at = EXCLUDED.last_read_at, updated_at = EXCLUDED.updated_at
            RETURNING user_id, phone_number, last_read_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(phone_number.as_str())
        .bind(last_read_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        ConversationReadState::try_from(model)
    }

    #[instrument(skip(self))]
    async fn find_all_for_user(&self, user_id: Uuid) -> RepoResult<Vec<ConversationReadState>> {
        let models = sqlx::query_as::<_, ReadStateModel>(
            r#"
            SELECT user_id, phone_number, last_read_at, updated_at
            FROM conversation_read_states
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(ConversationReadState::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_one(
        &self,
        user_id: Uuid,
        phone_number: &PhoneNumber,
    ) -> RepoResult<Option<ConversationReadState>> {
        let model = sqlx::query_as::<_, ReadStateModel>(
            r#"
            SELECT user_id, phone_number, last_read_at, updated_at
            FROM conversation_read_states
            WHERE user_id = $1 AND phone_number = $2
            "#,
        )
        .bind(user_id)
        .bind(phone_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(ConversationReadState::try_from).transpose()
    }
}
