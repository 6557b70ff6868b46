use super::*;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .security_admin_service
        .list_roles(&actor)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .create_role(&actor, payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_role(&actor, role_id.parse::<RoleId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
