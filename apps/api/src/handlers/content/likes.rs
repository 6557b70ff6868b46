use super::*;

pub async fn like_post_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(post_id): Path<String>,
) -> ApiResult<(StatusCode, Json<LikeResponse>)> {
    let like = state
        .content_service
        .like_post(&actor, post_id.parse::<PostId>()?)
        .await?;

    Ok((StatusCode::CREATED, Json(LikeResponse::from(like))))
}

pub async fn remove_like_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(like_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .content_service
        .remove_like(&actor, like_id.parse::<LikeId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
