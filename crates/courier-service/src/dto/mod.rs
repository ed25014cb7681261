//! Data transfer objects for API endpoints

mod mappers;
mod requests;
mod responses;

pub use requests::{
    AssignNumberRequest, CreateTemplateRequest, CreateUserRequest, LoginRequest,
    MarkReadRequest, SendMessageRequest, UpdateTemplateRequest,
};
pub use responses::{
    AssignmentResponse, ConversationResponse, HealthResponse, MarkReadResponse,
    MessageResponse, ReadStateResponse, ReadinessResponse, TemplateResponse, UserResponse,
};
