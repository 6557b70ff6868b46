use async_trait::async_trait;

use inkpost_core::AppResult;
use inkpost_domain::{Comment, CommentId, Like, LikeId, Post, PostId, UserAccount, UserId};

/// Input payload for post creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostInput {
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
}

/// Input payload for post revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePostInput {
    /// New post title.
    pub title: String,
    /// New post body.
    pub body: String,
}

/// Repository port for user accounts and blog content.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Finds one user account.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Inserts a user account or refreshes its display name.
    async fn upsert_user(&self, account: &UserAccount) -> AppResult<()>;

    /// Finds one post.
    async fn find_post(&self, post_id: PostId) -> AppResult<Option<Post>>;

    /// Inserts a new post.
    async fn insert_post(&self, post: &Post) -> AppResult<()>;

    /// Persists title and body of an existing post.
    async fn update_post(&self, post: &Post) -> AppResult<()>;

    /// Deletes a post with its comments and likes.
    async fn delete_post(&self, post_id: PostId) -> AppResult<()>;

    /// Finds one comment.
    async fn find_comment(&self, comment_id: CommentId) -> AppResult<Option<Comment>>;

    /// Inserts a new comment.
    async fn insert_comment(&self, comment: &Comment) -> AppResult<()>;

    /// Deletes a comment.
    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()>;

    /// Finds one like.
    async fn find_like(&self, like_id: LikeId) -> AppResult<Option<Like>>;

    /// Inserts a like. Fails with `Conflict` when the user already liked the post.
    async fn insert_like(&self, like: &Like) -> AppResult<()>;

    /// Deletes a like.
    async fn delete_like(&self, like_id: LikeId) -> AppResult<()>;
}
