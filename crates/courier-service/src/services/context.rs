//! Service context - dependency container for services
//!
//! Holds the repositories, provider client, and other dependencies needed by
//! services. Constructed once at startup and shared behind `Arc`.

use std::sync::Arc;

use courier_common::PasswordService;
use courier_core::{
    PhoneAssignmentRepository, ReadStateRepository, TemplateRepository, UserRepository,
};
use courier_db::PgPool;
use courier_provider::ProviderClient;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    pool: PgPool,
    read_state_repo: Arc<dyn ReadStateRepository>,
    user_repo: Arc<dyn UserRepository>,
    assignment_repo: Arc<dyn PhoneAssignmentRepository>,
    template_repo: Arc<dyn TemplateRepository>,
    provider: Arc<ProviderClient>,
    password_service: PasswordService,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: PgPool,
        read_state_repo: Arc<dyn ReadStateRepository>,
        user_repo: Arc<dyn UserRepository>,
        assignment_repo: Arc<dyn PhoneAssignmentRepository>,
        template_repo: Arc<dyn TemplateRepository>,
        provider: Arc<ProviderClient>,
    ) -> Self {
        Self {
            pool,
            read_state_repo,
            user_repo,
            assignment_repo,
            template_repo,
            provider,
            password_service: PasswordService::new(),
        }
    }

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the read-state repository
    pub fn read_state_repo(&self) -> &Arc<dyn ReadStateRepository> {
        &self.read_state_repo
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &Arc<dyn UserRepository> {
        &self.user_repo
    }

    /// Get the phone-assignment repository
    pub fn assignment_repo(&self) -> &Arc<dyn PhoneAssignmentRepository> {
        &self.assignment_repo
    }

    /// Get the template repository
    pub fn template_repo(&self) -> &Arc<dyn TemplateRepository> {
        &self.template_repo
    }

    /// Get the messaging provider client
    pub fn provider(&self) -> &Arc<ProviderClient> {
        &self.provider
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}
