use super::*;

pub async fn get_account_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<AccountResponse>> {
    let account = state
        .content_service
        .get_account(&actor, user_id.parse::<UserId>()?)
        .await?;

    Ok(Json(AccountResponse::from(account)))
}
