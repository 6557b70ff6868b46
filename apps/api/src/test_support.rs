use std::sync::Arc;

use inkpost_application::{Actor, ContentRepository, SecurityAdminRepository};
use inkpost_core::UserIdentity;
use inkpost_domain::{DefaultRole, RoleId, UserAccount, UserId};
use inkpost_infrastructure::{
    InMemoryAuditRepository, InMemoryContentRepository, InMemorySecurityRepository,
};

use crate::api_config::ApiConfig;
use crate::api_services::{ServiceRepositories, build_app_state};
use crate::state::AppState;

pub const FRONTEND_URL: &str = "http://localhost:3000";
pub const BOOTSTRAP_TOKEN: &str = "bootstrap-token-for-tests";

/// Application state wired against in-memory adapters with seeded roles.
pub struct TestApp {
    pub state: AppState,
    pub security: Arc<InMemorySecurityRepository>,
    pub content: Arc<InMemoryContentRepository>,
    pub audit: Arc<InMemoryAuditRepository>,
}

impl TestApp {
    pub async fn seeded() -> Self {
        let security = Arc::new(InMemorySecurityRepository::new());
        let content = Arc::new(InMemoryContentRepository::new());
        let audit = Arc::new(InMemoryAuditRepository::new());

        let state = build_app_state(
            ServiceRepositories {
                role_claim_repository: security.clone(),
                membership_repository: security.clone(),
                security_admin_repository: security.clone(),
                content_repository: content.clone(),
                audit_repository: audit.clone(),
            },
            &test_config(),
        );

        state
            .security_admin_service
            .seed_default_roles()
            .await
            .unwrap_or_else(|_| unreachable!());

        Self {
            state,
            security,
            content,
            audit,
        }
    }

    pub async fn role_id(&self, role: DefaultRole) -> RoleId {
        self.security
            .list_roles()
            .await
            .unwrap_or_default()
            .into_iter()
            .find(|summary| summary.name == role.name())
            .map(|summary| summary.role_id)
            .unwrap_or_else(|| unreachable!())
    }

    /// Registers a user account holding `role` and returns its resolved actor.
    pub async fn member(&self, role: DefaultRole, display_name: &str) -> Actor {
        let user_id = UserId::new();
        let account = UserAccount::new(user_id, display_name).unwrap_or_else(|_| unreachable!());
        self.content
            .upsert_user(&account)
            .await
            .unwrap_or_else(|_| unreachable!());
        self.security
            .assign_role_to_user(user_id, self.role_id(role).await)
            .await
            .unwrap_or_else(|_| unreachable!());

        self.state
            .authorization_service
            .resolve_actor(UserIdentity::new(user_id.to_string(), display_name, None))
            .await
            .unwrap_or_else(|_| unreachable!())
    }
}

pub fn test_config() -> ApiConfig {
    ApiConfig {
        migrate_only: false,
        database_url: "postgres://unused".to_owned(),
        frontend_url: FRONTEND_URL.to_owned(),
        bootstrap_token: BOOTSTRAP_TOKEN.to_owned(),
        api_host: "127.0.0.1".to_owned(),
        api_port: 3001,
        cookie_secure: false,
    }
}
