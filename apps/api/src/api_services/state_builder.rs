use std::sync::Arc;

use inkpost_application::{
    AuditRepository, AuthorizationService, ContentRepository, ContentService, OwnershipRegistry,
    RoleClaimRepository, RoleClaimStore, RoleMembershipRepository, SecurityAdminRepository,
    SecurityAdminService,
};
use inkpost_infrastructure::{
    PostgresAuditRepository, PostgresContentRepository, PostgresRoleClaimRepository,
    PostgresSecurityAdminRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Storage adapters the services are wired against.
pub struct ServiceRepositories {
    pub role_claim_repository: Arc<dyn RoleClaimRepository>,
    pub membership_repository: Arc<dyn RoleMembershipRepository>,
    pub security_admin_repository: Arc<dyn SecurityAdminRepository>,
    pub content_repository: Arc<dyn ContentRepository>,
    pub audit_repository: Arc<dyn AuditRepository>,
}

impl ServiceRepositories {
    pub fn postgres(pool: &PgPool) -> Self {
        let role_claim_repository = Arc::new(PostgresRoleClaimRepository::new(pool.clone()));

        Self {
            role_claim_repository: role_claim_repository.clone(),
            membership_repository: role_claim_repository,
            security_admin_repository: Arc::new(PostgresSecurityAdminRepository::new(pool.clone())),
            content_repository: Arc::new(PostgresContentRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
        }
    }
}

pub fn build_app_state(repositories: ServiceRepositories, config: &ApiConfig) -> AppState {
    let claim_store = RoleClaimStore::new(repositories.role_claim_repository);
    let authorization_service = AuthorizationService::new(
        claim_store.clone(),
        repositories.membership_repository,
        OwnershipRegistry::with_blog_resources(),
    );

    AppState {
        security_admin_service: SecurityAdminService::new(
            authorization_service.clone(),
            claim_store,
            repositories.security_admin_repository,
            repositories.audit_repository.clone(),
        ),
        content_service: ContentService::new(
            authorization_service.clone(),
            repositories.content_repository.clone(),
            repositories.audit_repository,
        ),
        authorization_service,
        content_repository: repositories.content_repository,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
