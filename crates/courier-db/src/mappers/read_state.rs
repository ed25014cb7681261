//! Read-state entity <-> model mapper

use courier_core::{ConversationReadState, DomainError};

use super::parse_stored_phone;
use crate::models::ReadStateModel;

impl TryFrom<ReadStateModel> for ConversationReadState {
    type Error = DomainError;

    fn try_from(model: ReadStateModel) -> Result<Self, Self::Error> {
        Ok(ConversationReadState {
            user_id: model.user_id,
            phone_number: parse_stored_phone(&model.phone_number)?,
            last_read_at: model.last_read_at,
            updated_at: model.updated_at,
        })
    }
}
