//! Phone assignment entity <-> model mapper

use courier_core::{DomainError, PhoneAssignment};

use super::parse_stored_phone;
use crate::models::AssignmentModel;

impl TryFrom<AssignmentModel> for PhoneAssignment {
    type Error = DomainError;

    fn try_from(model: AssignmentModel) -> Result<Self, Self::Error> {
        Ok(PhoneAssignment {
            user_id: model.user_id,
            phone_number: parse_stored_phone(&model.phone_number)?,
            assigned_at: model.assigned_at,
        })
    }
}
