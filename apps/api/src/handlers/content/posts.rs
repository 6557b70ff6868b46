use super::*;

pub async fn get_post_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post = state
        .content_service
        .get_post(&actor, post_id.parse::<PostId>()?)
        .await?;

    Ok(Json(PostResponse::from(post)))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let post = state
        .content_service
        .create_post(&actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let post = state
        .content_service
        .update_post(&actor, post_id.parse::<PostId>()?, payload.into())
        .await?;

    Ok(Json(PostResponse::from(post)))
}

pub async fn delete_post_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(post_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .content_service
        .delete_post(&actor, post_id.parse::<PostId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
