use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use inkpost_core::AppError;
use inkpost_domain::{PermissionAction, PermissionTarget};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::policy::{RequirePermission, guarded};
use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

const READ_ROLES: RequirePermission =
    RequirePermission::new(PermissionAction::Read, PermissionTarget::Role);
const CREATE_ROLES: RequirePermission =
    RequirePermission::new(PermissionAction::Create, PermissionTarget::Role);
const UPDATE_ROLES: RequirePermission =
    RequirePermission::new(PermissionAction::Update, PermissionTarget::Role);
const DELETE_ROLES: RequirePermission =
    RequirePermission::new(PermissionAction::Delete, PermissionTarget::Role);
const READ_PERMISSIONS: RequirePermission =
    RequirePermission::new(PermissionAction::Read, PermissionTarget::Permission);
const CREATE_PERMISSIONS: RequirePermission =
    RequirePermission::new(PermissionAction::Create, PermissionTarget::Permission);
const DELETE_PERMISSIONS: RequirePermission =
    RequirePermission::new(PermissionAction::Delete, PermissionTarget::Permission);

pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let security_routes = Router::new()
        .route(
            "/api/security/roles",
            guarded(
                get(handlers::security::list_roles_handler),
                &app_state,
                READ_ROLES,
            )
            .merge(guarded(
                post(handlers::security::create_role_handler),
                &app_state,
                CREATE_ROLES,
            )),
        )
        .route(
            "/api/security/roles/{role_id}",
            guarded(
                delete(handlers::security::delete_role_handler),
                &app_state,
                DELETE_ROLES,
            ),
        )
        .route(
            "/api/security/roles/{role_id}/permissions",
            guarded(
                get(handlers::security::list_permissions_handler),
                &app_state,
                READ_PERMISSIONS,
            )
            .merge(guarded(
                post(handlers::security::add_permission_handler),
                &app_state,
                CREATE_PERMISSIONS,
            )),
        )
        .route(
            "/api/security/roles/{role_id}/permissions/{permission}",
            guarded(
                delete(handlers::security::remove_permission_handler),
                &app_state,
                DELETE_PERMISSIONS,
            ),
        )
        .route(
            "/api/security/role-assignments",
            guarded(
                get(handlers::security::list_role_assignments_handler),
                &app_state,
                READ_ROLES,
            )
            .merge(guarded(
                post(handlers::security::assign_role_handler),
                &app_state,
                UPDATE_ROLES,
            )),
        )
        .route(
            "/api/security/role-unassignments",
            guarded(
                post(handlers::security::unassign_role_handler),
                &app_state,
                UPDATE_ROLES,
            ),
        );

    // Content routes check ownership against the loaded resource in the service.
    let content_routes = Router::new()
        .route(
            "/api/accounts/{user_id}",
            get(handlers::content::get_account_handler),
        )
        .route("/api/posts", post(handlers::content::create_post_handler))
        .route(
            "/api/posts/{post_id}",
            get(handlers::content::get_post_handler)
                .put(handlers::content::update_post_handler)
                .delete(handlers::content::delete_post_handler),
        )
        .route(
            "/api/posts/{post_id}/comments",
            post(handlers::content::create_comment_handler),
        )
        .route(
            "/api/posts/{post_id}/likes",
            post(handlers::content::like_post_handler),
        )
        .route(
            "/api/comments/{comment_id}",
            delete(handlers::content::delete_comment_handler),
        )
        .route(
            "/api/likes/{like_id}",
            delete(handlers::content::remove_like_handler),
        );

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .merge(security_routes)
        .merge(content_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
