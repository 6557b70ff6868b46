use super::*;

pub async fn create_comment_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(post_id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let comment = state
        .content_service
        .create_comment(&actor, post_id.parse::<PostId>()?, payload.body)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

pub async fn delete_comment_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(comment_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .content_service
        .delete_comment(&actor, comment_id.parse::<CommentId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
