use super::*;

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    let (user_id, role_id) = payload.identifiers()?;

    state
        .security_admin_service
        .assign_role(&actor, user_id, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<RemoveRoleAssignmentRequest>,
) -> ApiResult<StatusCode> {
    let (user_id, role_id) = payload.identifiers()?;

    state
        .security_admin_service
        .unassign_role(&actor, user_id, role_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .security_admin_service
        .list_role_assignments(&actor)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}
