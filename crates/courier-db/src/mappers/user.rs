//! User entity <-> model mapper

use courier_core::{DomainError, User, UserRole};

use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&model.role)
            .ok_or_else(|| DomainError::DatabaseError(format!("corrupt role column: {}", model.role)))?;
        Ok(User {
            id: model.id,
            username: model.username,
            display_name: model.display_name,
            role,
            created_at: model.created_at,
        })
    }
}
