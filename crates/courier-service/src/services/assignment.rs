//! Phone assignment service
//!
//! Admin operations for handing provider numbers to users. A user keeps at
//! most one number; assigning replaces the previous one.

use std::collections::HashMap;

use tracing::{info, instrument};
use uuid::Uuid;

use courier_core::{DomainError, PhoneNumber};

use crate::dto::{AssignmentResponse, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Phone assignment service
pub struct AssignmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AssignmentService<'a> {
    /// Create a new AssignmentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The number assigned to a user, if any
    #[instrument(skip(self))]
    pub async fn assignment_for_user(
        &self,
        user_id: Uuid,
    ) -> ServiceResult<Option<AssignmentResponse>> {
        let assignment = self.ctx.assignment_repo().find_by_user(user_id).await?;
        Ok(assignment.as_ref().map(AssignmentResponse::from))
    }

    /// Assign a number to a user, replacing any previous assignment
    #[instrument(skip(self))]
    pub async fn assign(&self, user_id: Uuid, raw_number: &str) -> ServiceResult<AssignmentResponse> {
        let phone_number = PhoneNumber::parse(raw_number).map_err(DomainError::from)?;

        // The user must exist before a number can point at them
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        // A number can only belong to one user at a time
        if let Some(existing) = self.ctx.assignment_repo().find_by_phone(&phone_number).await? {
            if existing.user_id != user_id {
                return Err(DomainError::PhoneNumberAssigned(
                    phone_number.as_str().to_string(),
                )
                .into());
            }
        }

        let assignment = self
            .ctx
            .assignment_repo()
            .assign(user_id, &phone_number)
            .await?;

        info!(user_id = %user_id, phone_number = %phone_number, "Phone number assigned");
        Ok(AssignmentResponse::from(&assignment))
    }

    /// Remove a user's assignment
    #[instrument(skip(self))]
    pub async fn remove(&self, user_id: Uuid) -> ServiceResult<()> {
        self.ctx.assignment_repo().remove(user_id).await?;
        info!(user_id = %user_id, "Phone number assignment removed");
        Ok(())
    }

    /// All assignments joined with their users (admin listing)
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ServiceResult<Vec<AssignmentResponse>> {
        let assignments = self.ctx.assignment_repo().list_all().await?;
        let users: HashMap<Uuid, UserResponse> = self
            .ctx
            .user_repo()
            .list()
            .await?
            .iter()
            .map(|u| (u.id, UserResponse::from(u)))
            .collect();

        Ok(assignments
            .iter()
            .map(|a| {
                let mut response = AssignmentResponse::from(a);
                response.user = users.get(&a.user_id).cloned();
                response
            })
            .collect())
    }
}
