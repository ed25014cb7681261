//! # courier-service
//!
//! Application layer: DTOs, services, and the conversation read-state
//! synchronizer with its mark-read strategy chain.

pub mod dto;
pub mod services;
pub mod sync;

// Re-export commonly used types at crate root
pub use dto::{
    AssignNumberRequest, AssignmentResponse, ConversationResponse, CreateTemplateRequest,
    CreateUserRequest, HealthResponse, LoginRequest, MarkReadRequest, MarkReadResponse,
    MessageResponse, ReadStateResponse, ReadinessResponse, SendMessageRequest,
    TemplateResponse, UpdateTemplateRequest, UserResponse,
};
pub use services::{
    AssignmentService, InboxService, ServiceContext, ServiceError, ServiceResult,
    TemplateService, UserService,
};
pub use sync::{
    DirectStoreStrategy, GatewayError, HttpGatewayStrategy, MarkReadConfirmation,
    MarkReadOutcome, MarkReadStrategy, ReadStateSynchronizer, SyncPhase,
};
