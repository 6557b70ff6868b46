use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use inkpost_application::ContentRepository;
use inkpost_core::{AppError, AppResult};
use inkpost_domain::{
    Comment, CommentId, Like, LikeId, Post, PostId, UserAccount, UserId,
};

/// PostgreSQL-backed repository for user accounts, posts, comments and likes.
#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    display_name: String,
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: uuid::Uuid,
    author_id: uuid::Uuid,
    title: String,
    body: String,
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: uuid::Uuid,
    post_id: uuid::Uuid,
    author_id: Option<uuid::Uuid>,
    body: String,
}

#[derive(Debug, FromRow)]
struct LikeRow {
    id: uuid::Uuid,
    post_id: uuid::Uuid,
    user_id: Option<uuid::Uuid>,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        UserAccount::new(UserId::from_uuid(row.id), row.display_name).map_err(|error| {
            AppError::Internal(format!("failed to decode user '{}': {error}", row.id))
        })
    }
}

impl TryFrom<PostRow> for Post {
    type Error = AppError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Post::new(
            PostId::from_uuid(row.id),
            UserId::from_uuid(row.author_id),
            row.title,
            row.body,
        )
        .map_err(|error| AppError::Internal(format!("failed to decode post '{}': {error}", row.id)))
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = AppError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Comment::new(
            CommentId::from_uuid(row.id),
            PostId::from_uuid(row.post_id),
            row.author_id.map(UserId::from_uuid),
            row.body,
        )
        .map_err(|error| {
            AppError::Internal(format!("failed to decode comment '{}': {error}", row.id))
        })
    }
}

impl From<LikeRow> for Like {
    fn from(row: LikeRow) -> Self {
        Like::new(
            LikeId::from_uuid(row.id),
            PostId::from_uuid(row.post_id),
            row.user_id.map(UserId::from_uuid),
        )
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, display_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?
        .map(UserAccount::try_from)
        .transpose()
    }

    async fn upsert_user(&self, account: &UserAccount) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                updated_at = now()
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.display_name().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to upsert user: {error}")))?;

        Ok(())
    }

    async fn find_post(&self, post_id: PostId) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author_id, title, body
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find post: {error}")))?
        .map(Post::try_from)
        .transpose()
    }

    async fn insert_post(&self, post: &Post) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.author_id().as_uuid())
        .bind(post.title().as_str())
        .bind(post.body())
        .execute(&self.pool)
        .await
        .map_err(|error| map_missing_reference(error, "failed to insert post"))?;

        Ok(())
    }

    async fn update_post(&self, post: &Post) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE posts
            SET title = $2,
                body = $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.title().as_str())
        .bind(post.body())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update post: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("post '{}' was not found", post.id())));
        }

        Ok(())
    }

    async fn delete_post(&self, post_id: PostId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete post: {error}")))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("post '{post_id}' was not found")));
        }

        Ok(())
    }

    async fn find_comment(&self, comment_id: CommentId) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, author_id, body
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find comment: {error}")))?
        .map(Comment::try_from)
        .transpose()
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, body)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(comment.id().as_uuid())
        .bind(comment.post_id().as_uuid())
        .bind(comment.author_id().map(|author_id| author_id.as_uuid()))
        .bind(comment.body().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| map_missing_reference(error, "failed to insert comment"))?;

        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete comment: {error}")))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "comment '{comment_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn find_like(&self, like_id: LikeId) -> AppResult<Option<Like>> {
        let row = sqlx::query_as::<_, LikeRow>(
            r#"
            SELECT id, post_id, user_id
            FROM likes
            WHERE id = $1
            "#,
        )
        .bind(like_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find like: {error}")))?;

        Ok(row.map(Like::from))
    }

    async fn insert_like(&self, like: &Like) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO likes (id, post_id, user_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(like.id().as_uuid())
        .bind(like.post_id().as_uuid())
        .bind(like.user_id().map(|user_id| user_id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!(
                    "post '{}' is already liked by this user",
                    like.post_id()
                ));
            }

            map_missing_reference(error, "failed to insert like")
        })?;

        Ok(())
    }

    async fn delete_like(&self, like_id: LikeId) -> AppResult<()> {
        let rows_affected = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(like_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete like: {error}")))?
            .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("like '{like_id}' was not found")));
        }

        Ok(())
    }
}

fn map_missing_reference(error: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!("{context}: referenced row was not found"));
    }

    AppError::Internal(format!("{context}: {error}"))
}
