use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use inkpost_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::auth::{SESSION_ABSOLUTE_TIMEOUT_SECONDS, SESSION_CREATED_AT_KEY, SESSION_USER_KEY};
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session identity into an [`inkpost_application::Actor`].
///
/// Role memberships are reloaded on every request so role changes apply
/// without a new login.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session creation time: {error}"))
        })?;
    if created_at.is_none_or(|created_at| {
        chrono::Utc::now().timestamp() - created_at > SESSION_ABSOLUTE_TIMEOUT_SECONDS
    }) {
        session
            .delete()
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    }

    let actor = state.authorization_service.resolve_actor(identity).await?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site")
            && fetch_site == HeaderValue::from_static("cross-site")
        {
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        let allowed_origin = state.frontend_url.trim_end_matches('/');
        let origin_is_allowed = origin == allowed_origin;
        let referer_is_allowed = referer_matches_origin(referer, allowed_origin);

        if !origin_is_allowed && !referer_is_allowed {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// A referer matches when its origin part equals `allowed_origin` exactly,
/// so look-alike hosts such as `http://localhost:3000.evil.example` fail.
fn referer_matches_origin(referer: &str, allowed_origin: &str) -> bool {
    referer
        .strip_prefix(allowed_origin)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
