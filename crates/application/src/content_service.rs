use std::sync::Arc;

use inkpost_core::{AppError, AppResult};
use inkpost_domain::{
    AuditAction, Comment, CommentId, Like, LikeId, PermissionAction, PermissionTarget, Post,
    PostId, Resource, UserAccount, UserId,
};

use crate::{
    Actor, AuditEvent, AuditRepository, AuthorizationService, ContentRepository,
    CreatePostInput, ResourceScope, UpdatePostInput,
};

/// Application service for posts, comments and likes.
///
/// Every operation loads the concrete resource first so ownership-ranged
/// grants are checked against the stored owner.
#[derive(Clone)]
pub struct ContentService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn ContentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl ContentService {
    /// Creates a new content service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn ContentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_repository,
        }
    }

    /// Returns a user account when the actor may read it.
    pub async fn get_account(&self, actor: &Actor, user_id: UserId) -> AppResult<UserAccount> {
        let account = self
            .repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Read,
                PermissionTarget::Account,
                ResourceScope::Existing(Resource::Account(&account)),
            )
            .await?;

        Ok(account)
    }

    /// Returns one post.
    pub async fn get_post(&self, actor: &Actor, post_id: PostId) -> AppResult<Post> {
        let post = self.load_post(post_id).await?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Read,
                PermissionTarget::Post,
                ResourceScope::Existing(Resource::Post(&post)),
            )
            .await?;

        Ok(post)
    }

    /// Creates a post authored by the actor.
    pub async fn create_post(&self, actor: &Actor, input: CreatePostInput) -> AppResult<Post> {
        self.authorization_service
            .require(
                actor,
                PermissionAction::Create,
                PermissionTarget::Post,
                ResourceScope::NewOwnedByActor,
            )
            .await?;

        let post = Post::new(
            PostId::new(),
            actor_user_id(actor)?,
            input.title,
            input.body,
        )?;
        self.repository.insert_post(&post).await?;

        Ok(post)
    }

    /// Revises title and body of a post.
    pub async fn update_post(
        &self,
        actor: &Actor,
        post_id: PostId,
        input: UpdatePostInput,
    ) -> AppResult<Post> {
        let mut post = self.load_post(post_id).await?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Update,
                PermissionTarget::Post,
                ResourceScope::Existing(Resource::Post(&post)),
            )
            .await?;

        post.revise(input.title, input.body)?;
        self.repository.update_post(&post).await?;

        Ok(post)
    }

    /// Deletes a post and emits an audit event.
    pub async fn delete_post(&self, actor: &Actor, post_id: PostId) -> AppResult<()> {
        let post = self.load_post(post_id).await?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Delete,
                PermissionTarget::Post,
                ResourceScope::Existing(Resource::Post(&post)),
            )
            .await?;

        self.repository.delete_post(post_id).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::ContentPostDeleted,
                resource_type: "post".to_owned(),
                resource_id: post_id.to_string(),
                detail: Some(format!("deleted post '{}'", post.title().as_str())),
            })
            .await
    }

    /// Adds a comment by the actor to a post.
    pub async fn create_comment(
        &self,
        actor: &Actor,
        post_id: PostId,
        body: String,
    ) -> AppResult<Comment> {
        self.load_post(post_id).await?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Create,
                PermissionTarget::Comment,
                ResourceScope::NewOwnedByActor,
            )
            .await?;

        let comment = Comment::new(
            CommentId::new(),
            post_id,
            Some(actor_user_id(actor)?),
            body,
        )?;
        self.repository.insert_comment(&comment).await?;

        Ok(comment)
    }

    /// Deletes a comment and emits an audit event.
    pub async fn delete_comment(&self, actor: &Actor, comment_id: CommentId) -> AppResult<()> {
        let comment = self
            .repository
            .find_comment(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment '{comment_id}' was not found")))?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Delete,
                PermissionTarget::Comment,
                ResourceScope::Existing(Resource::Comment(&comment)),
            )
            .await?;

        self.repository.delete_comment(comment_id).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::ContentCommentDeleted,
                resource_type: "comment".to_owned(),
                resource_id: comment_id.to_string(),
                detail: Some(format!("deleted comment on post '{}'", comment.post_id())),
            })
            .await
    }

    /// Records the actor's like on a post.
    pub async fn like_post(&self, actor: &Actor, post_id: PostId) -> AppResult<Like> {
        self.load_post(post_id).await?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Create,
                PermissionTarget::Like,
                ResourceScope::NewOwnedByActor,
            )
            .await?;

        let like = Like::new(LikeId::new(), post_id, Some(actor_user_id(actor)?));
        self.repository.insert_like(&like).await?;

        Ok(like)
    }

    /// Removes a like.
    pub async fn remove_like(&self, actor: &Actor, like_id: LikeId) -> AppResult<()> {
        let like = self
            .repository
            .find_like(like_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("like '{like_id}' was not found")))?;

        self.authorization_service
            .require(
                actor,
                PermissionAction::Delete,
                PermissionTarget::Like,
                ResourceScope::Existing(Resource::Like(&like)),
            )
            .await?;

        self.repository.delete_like(like_id).await
    }

    async fn load_post(&self, post_id: PostId) -> AppResult<Post> {
        self.repository
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post '{post_id}' was not found")))
    }
}

fn actor_user_id(actor: &Actor) -> AppResult<UserId> {
    actor.user_id().ok_or_else(|| {
        AppError::Unauthorized(format!(
            "subject '{}' is not a valid user id",
            actor.subject()
        ))
    })
}

#[cfg(test)]
mod tests;
