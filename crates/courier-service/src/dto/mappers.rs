//! Entity → response mappers

use courier_core::{Message, MessageTemplate, PhoneAssignment, User};

use super::responses::{
    AssignmentResponse, MessageResponse, TemplateResponse, UserResponse,
};

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            from: message.from.as_str().to_string(),
            to: message.to.as_str().to_string(),
            direction: message.direction,
            body: message.body.clone(),
            media_count: message.media_count,
            timestamp: message.timestamp,
            status: message.status.clone(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}

impl From<&PhoneAssignment> for AssignmentResponse {
    fn from(assignment: &PhoneAssignment) -> Self {
        Self {
            user_id: assignment.user_id,
            phone_number: assignment.phone_number.as_str().to_string(),
            assigned_at: assignment.assigned_at,
            user: None,
        }
    }
}

impl From<&MessageTemplate> for TemplateResponse {
    fn from(template: &MessageTemplate) -> Self {
        Self {
            id: template.id,
            user_id: template.user_id,
            kind: template.kind.as_str().to_string(),
            name: template.name.clone(),
            content: template.content.clone(),
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}
