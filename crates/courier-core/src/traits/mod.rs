//! Repository traits (ports)

mod repositories;

pub use repositories::{
    PhoneAssignmentRepository, ReadStateRepository, RepoResult, TemplateRepository,
    UserRepository,
};
