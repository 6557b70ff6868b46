use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use inkpost_core::{AppError, UserIdentity};
use inkpost_domain::{UserAccount, UserId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub subject: String,
    pub display_name: Option<String>,
    pub token: String,
}

pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if !constant_time_eq(payload.token.as_bytes(), state.bootstrap_token.as_bytes()) {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let user_id = payload.subject.parse::<UserId>()?;
    let display_name = payload
        .display_name
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| user_id.to_string());
    let account = UserAccount::new(user_id, display_name)?;

    state.content_repository.upsert_user(&account).await?;
    let baseline_role = state
        .security_admin_service
        .ensure_default_membership(user_id)
        .await?;

    let identity = UserIdentity::new(
        user_id.to_string(),
        account.display_name().as_str(),
        None,
    );

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(
        %user_id,
        baseline_role = baseline_role.map(|role| role.name()),
        "bootstrap session started"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Compares secrets without stopping at the first differing byte.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0_u8, |diff, (left, right)| diff | (left ^ right))
        == 0
}
