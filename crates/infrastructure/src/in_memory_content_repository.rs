use std::collections::HashMap;

use async_trait::async_trait;
use inkpost_application::{AuditEvent, AuditRepository, ContentRepository};
use inkpost_core::{AppError, AppResult};
use inkpost_domain::{Comment, CommentId, Like, LikeId, Post, PostId, UserAccount, UserId};
use tokio::sync::RwLock;

/// In-memory user account and blog content repository.
#[derive(Debug, Default)]
pub struct InMemoryContentRepository {
    users: RwLock<HashMap<UserId, UserAccount>>,
    posts: RwLock<HashMap<PostId, Post>>,
    comments: RwLock<HashMap<CommentId, Comment>>,
    likes: RwLock<HashMap<LikeId, Like>>,
}

impl InMemoryContentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn upsert_user(&self, account: &UserAccount) -> AppResult<()> {
        self.users
            .write()
            .await
            .insert(account.id(), account.clone());
        Ok(())
    }

    async fn find_post(&self, post_id: PostId) -> AppResult<Option<Post>> {
        Ok(self.posts.read().await.get(&post_id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> AppResult<()> {
        if !self.users.read().await.contains_key(&post.author_id()) {
            return Err(AppError::NotFound(format!(
                "user '{}' was not found",
                post.author_id()
            )));
        }

        self.posts.write().await.insert(post.id(), post.clone());
        Ok(())
    }

    async fn update_post(&self, post: &Post) -> AppResult<()> {
        let mut posts = self.posts.write().await;
        let stored = posts
            .get_mut(&post.id())
            .ok_or_else(|| AppError::NotFound(format!("post '{}' was not found", post.id())))?;
        *stored = post.clone();
        Ok(())
    }

    async fn delete_post(&self, post_id: PostId) -> AppResult<()> {
        if self.posts.write().await.remove(&post_id).is_none() {
            return Err(AppError::NotFound(format!("post '{post_id}' was not found")));
        }

        self.comments
            .write()
            .await
            .retain(|_, comment| comment.post_id() != post_id);
        self.likes
            .write()
            .await
            .retain(|_, like| like.post_id() != post_id);
        Ok(())
    }

    async fn find_comment(&self, comment_id: CommentId) -> AppResult<Option<Comment>> {
        Ok(self.comments.read().await.get(&comment_id).cloned())
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        if !self.posts.read().await.contains_key(&comment.post_id()) {
            return Err(AppError::NotFound(format!(
                "post '{}' was not found",
                comment.post_id()
            )));
        }

        self.comments
            .write()
            .await
            .insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()> {
        self.comments
            .write()
            .await
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("comment '{comment_id}' was not found")))
    }

    async fn find_like(&self, like_id: LikeId) -> AppResult<Option<Like>> {
        Ok(self.likes.read().await.get(&like_id).cloned())
    }

    async fn insert_like(&self, like: &Like) -> AppResult<()> {
        if !self.posts.read().await.contains_key(&like.post_id()) {
            return Err(AppError::NotFound(format!(
                "post '{}' was not found",
                like.post_id()
            )));
        }

        let mut likes = self.likes.write().await;
        if like.user_id().is_some()
            && likes.values().any(|stored| {
                stored.post_id() == like.post_id() && stored.user_id() == like.user_id()
            })
        {
            return Err(AppError::Conflict(format!(
                "post '{}' is already liked by this user",
                like.post_id()
            )));
        }

        likes.insert(like.id(), like.clone());
        Ok(())
    }

    async fn delete_like(&self, like_id: LikeId) -> AppResult<()> {
        self.likes
            .write()
            .await
            .remove(&like_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("like '{like_id}' was not found")))
    }
}

/// In-memory append-only audit repository.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events in append order.
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.write().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use inkpost_application::ContentRepository;
    use inkpost_core::AppError;
    use inkpost_domain::{Comment, CommentId, Like, LikeId, Post, PostId, UserAccount, UserId};

    use super::InMemoryContentRepository;

    async fn repository_with_post() -> (InMemoryContentRepository, Post) {
        let repository = InMemoryContentRepository::new();
        let author = UserId::new();
        let account = UserAccount::new(author, "Author").unwrap_or_else(|_| unreachable!());
        assert!(repository.upsert_user(&account).await.is_ok());
        let post =
            Post::new(PostId::new(), author, "Hello", "World").unwrap_or_else(|_| unreachable!());
        assert!(repository.insert_post(&post).await.is_ok());
        (repository, post)
    }

    #[tokio::test]
    async fn deleting_post_removes_its_comments_and_likes() {
        let (repository, post) = repository_with_post().await;
        let comment = Comment::new(CommentId::new(), post.id(), Some(post.author_id()), "Hi")
            .unwrap_or_else(|_| unreachable!());
        let like = Like::new(LikeId::new(), post.id(), Some(post.author_id()));
        assert!(repository.insert_comment(&comment).await.is_ok());
        assert!(repository.insert_like(&like).await.is_ok());

        assert!(repository.delete_post(post.id()).await.is_ok());

        assert_eq!(repository.find_comment(comment.id()).await.ok(), Some(None));
        assert_eq!(repository.find_like(like.id()).await.ok(), Some(None));
    }

    #[tokio::test]
    async fn duplicate_like_conflicts() {
        let (repository, post) = repository_with_post().await;
        let fan = Some(UserId::new());

        let first = repository
            .insert_like(&Like::new(LikeId::new(), post.id(), fan))
            .await;
        let second = repository
            .insert_like(&Like::new(LikeId::new(), post.id(), fan))
            .await;

        assert!(first.is_ok());
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn content_on_missing_parents_is_not_found() {
        let repository = InMemoryContentRepository::new();
        let post = Post::new(PostId::new(), UserId::new(), "Orphan", "")
            .unwrap_or_else(|_| unreachable!());
        let comment = Comment::new(CommentId::new(), post.id(), None, "lost")
            .unwrap_or_else(|_| unreachable!());

        assert!(matches!(
            repository.insert_post(&post).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repository.insert_comment(&comment).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repository.delete_like(LikeId::new()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
