use super::*;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_permissions(&actor, role_id.parse::<RoleId>()?)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn add_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(role_id): Path<String>,
    Json(payload): Json<AddPermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let role_id = role_id.parse::<RoleId>()?;
    let permission = payload.permission()?;

    state
        .security_admin_service
        .add_permission(&actor, role_id, permission)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn remove_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((role_id, permission)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .remove_permission(
            &actor,
            role_id.parse::<RoleId>()?,
            Permission::from_claim_value(permission.as_str())?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
