use std::sync::Arc;

use inkpost_application::{
    AuthorizationService, ContentRepository, ContentService, SecurityAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub security_admin_service: SecurityAdminService,
    pub content_service: ContentService,
    pub content_repository: Arc<dyn ContentRepository>,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
