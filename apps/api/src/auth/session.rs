use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use inkpost_application::Actor;
use inkpost_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let subject = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .map(|identity| identity.subject().to_owned());

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(subject) = subject {
        info!(subject = subject.as_str(), "session closed");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let permissions = state
        .authorization_service
        .effective_permissions(&actor)
        .await?;

    Ok(Json(UserIdentityResponse::from_actor_with_permissions(
        &actor,
        permissions,
    )))
}
