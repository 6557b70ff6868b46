//! Route-level permission checks.
//!
//! Routes declare the collection-level permission they need with [`guarded`].
//! Checks against a concrete post, comment or like run inside the services once
//! the resource is loaded.

use axum::Extension;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use axum::routing::MethodRouter;
use inkpost_application::{Actor, ResourceScope};
use inkpost_core::AppError;
use inkpost_domain::{PermissionAction, PermissionTarget};

use crate::error::ApiResult;
use crate::state::AppState;

/// Permission a route requires over the whole target collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirePermission {
    pub action: PermissionAction,
    pub target: PermissionTarget,
}

impl RequirePermission {
    pub const fn new(action: PermissionAction, target: PermissionTarget) -> Self {
        Self { action, target }
    }
}

/// Wraps a method router so it only runs for actors holding `requirement`.
pub fn guarded(
    method_router: MethodRouter<AppState>,
    app_state: &AppState,
    requirement: RequirePermission,
) -> MethodRouter<AppState> {
    method_router
        .route_layer(from_fn_with_state(app_state.clone(), require_permission))
        .layer(Extension(requirement))
}

pub async fn require_permission(
    State(state): State<AppState>,
    Extension(requirement): Extension<RequirePermission>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let actor = request
        .extensions()
        .get::<Actor>()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    state
        .authorization_service
        .require(
            actor,
            requirement.action,
            requirement.target,
            ResourceScope::Collection,
        )
        .await?;

    Ok(next.run(request).await)
}
