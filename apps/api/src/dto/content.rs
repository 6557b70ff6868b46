use inkpost_application::{CreatePostInput, UpdatePostInput};
use inkpost_domain::{Comment, Like, Post, UserAccount};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for post creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-post-request.ts"
)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

/// Incoming payload for post revision.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-post-request.ts"
)]
pub struct UpdatePostRequest {
    pub title: String,
    pub body: String,
}

/// Incoming payload for comment creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-comment-request.ts"
)]
pub struct CreateCommentRequest {
    pub body: String,
}

/// API representation of a post.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/post-response.ts"
)]
pub struct PostResponse {
    pub post_id: String,
    pub author_id: String,
    pub title: String,
    pub body: String,
}

/// API representation of a comment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/comment-response.ts"
)]
pub struct CommentResponse {
    pub comment_id: String,
    pub post_id: String,
    /// Empty once the author account was deleted.
    pub author_id: Option<String>,
    pub body: String,
}

/// API representation of a like.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/like-response.ts"
)]
pub struct LikeResponse {
    pub like_id: String,
    pub post_id: String,
    pub user_id: Option<String>,
}

/// API representation of a user account.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/account-response.ts"
)]
pub struct AccountResponse {
    pub user_id: String,
    pub display_name: String,
}

impl From<CreatePostRequest> for CreatePostInput {
    fn from(value: CreatePostRequest) -> Self {
        Self {
            title: value.title,
            body: value.body,
        }
    }
}

impl From<UpdatePostRequest> for UpdatePostInput {
    fn from(value: UpdatePostRequest) -> Self {
        Self {
            title: value.title,
            body: value.body,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            post_id: value.id().to_string(),
            author_id: value.author_id().to_string(),
            title: value.title().as_str().to_owned(),
            body: value.body().to_owned(),
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            comment_id: value.id().to_string(),
            post_id: value.post_id().to_string(),
            author_id: value.author_id().map(|author_id| author_id.to_string()),
            body: value.body().as_str().to_owned(),
        }
    }
}

impl From<Like> for LikeResponse {
    fn from(value: Like) -> Self {
        Self {
            like_id: value.id().to_string(),
            post_id: value.post_id().to_string(),
            user_id: value.user_id().map(|user_id| user_id.to_string()),
        }
    }
}

impl From<UserAccount> for AccountResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            user_id: value.id().to_string(),
            display_name: value.display_name().as_str().to_owned(),
        }
    }
}
