//! PostgreSQL implementation of PhoneAssignmentRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{
    DomainError, PhoneAssignment, PhoneAssignmentRepository, PhoneNumber, RepoResult,
};

use crate::models::AssignmentModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of PhoneAssignmentRepository
#[derive(Clone)]
pub struct PgPhoneAssignmentRepository {
    pool: PgPool,
}

impl PgPhoneAssignmentRepository {
    /// Create a new PgPhoneAssignmentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhoneAssignmentRepository for PgPhoneAssignmentRepository {
    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Option<PhoneAssignment>> {
        let model = sqlx::query_as::<_, AssignmentModel>(
            r#"
            SELECT user_id, phone_number, assigned_at
            FROM user_phone_numbers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(PhoneAssignment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_phone(
        &self,
        phone_number: &PhoneNumber,
    ) -> RepoResult<Option<PhoneAssignment>> {
        let model = sqlx::query_as::<_, AssignmentModel>(
            r#"
            SELECT user_id, phone_number, assigned_at
            FROM user_phone_numbers
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(PhoneAssignment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<PhoneAssignment>> {
        let models = sqlx::query_as::<_, AssignmentModel>(
            r#"
            SELECT user_id, phone_number, assigned_at
            FROM user_phone_numbers
            ORDER BY phone_number
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(PhoneAssignment::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn assign(
        &self,
        user_id: Uuid,
        phone_number: &PhoneNumber,
    ) -> RepoResult<PhoneAssignment> {
        // Each user keeps exactly one number: drop any previous assignment
        // and insert the new one in the same transaction.
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM user_phone_numbers WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let model = sqlx::query_as::<_, AssignmentModel>(
            r#"
            INSERT INTO user_phone_numbers (user_id, phone_number, assigned_at)
            VALUES ($1, $2, $3)
            RETURNING user_id, phone_number, assigned_at
            "#,
        )
        .bind(user_id)
        .bind(phone_number.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::PhoneNumberAssigned(phone_number.as_str().to_string())
            })
        })?;

        tx.commit().await.map_err(map_db_error)?;

        PhoneAssignment::try_from(model)
    }

    #[instrument(skip(self))]
    async fn remove(&self, user_id: Uuid) -> RepoResult<()> {
        sqlx::query("DELETE FROM user_phone_numbers WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
