//! User service
//!
//! Account creation, listing, and credential verification.

use tracing::{info, instrument};
use uuid::Uuid;

use courier_common::AppError;
use courier_core::{User, UserRole};

use crate::dto::{CreateUserRequest, LoginRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Verify credentials and return the account.
    ///
    /// Unknown usernames and wrong passwords both answer with the same
    /// invalid-credentials error.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_username(&request.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &hash)?;

        info!(user_id = %user.id, "User logged in");
        Ok(UserResponse::from(&user))
    }

    /// Create a new account
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<UserResponse> {
        let role = match request.role.as_deref() {
            None => UserRole::User,
            Some(raw) => UserRole::parse(raw)
                .ok_or_else(|| ServiceError::validation(format!("Unknown role: {raw}")))?,
        };

        let user = User::new(request.username, request.display_name, role);
        let hash = self.ctx.password_service().hash(&request.password)?;
        self.ctx.user_repo().create(&user, &hash).await?;

        info!(user_id = %user.id, "User created");
        Ok(UserResponse::from(&user))
    }

    /// List all accounts
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().list().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// Fetch one account by id
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id.to_string()))?;
        Ok(UserResponse::from(&user))
    }
}
