use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use inkpost_core::{AppError, AppResult, UserIdentity};
use inkpost_domain::{
    AuditAction, Comment, CommentId, DefaultRole, Like, LikeId, Post, PostId, RoleId,
    UserAccount, UserId,
};
use tokio::sync::Mutex;

use crate::{
    Actor, AuditEvent, AuditRepository, AuthorizationService, ContentRepository,
    CreatePostInput, OwnershipRegistry, RoleClaim, RoleClaimRepository, RoleClaimStore,
    RoleMembershipRepository, UpdatePostInput,
};

use super::ContentService;

struct DefaultRoleClaims {
    claims: HashMap<RoleId, Vec<RoleClaim>>,
}

#[async_trait]
impl RoleClaimRepository for DefaultRoleClaims {
    async fn list_role_claims(&self, role_id: RoleId) -> AppResult<Vec<RoleClaim>> {
        self.claims
            .get(&role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    async fn insert_role_claim(&self, _role_id: RoleId, _claim: RoleClaim) -> AppResult<()> {
        Ok(())
    }

    async fn delete_role_claims(
        &self,
        _role_id: RoleId,
        _claim_type: &str,
        _claim_values: &[String],
    ) -> AppResult<u64> {
        Ok(0)
    }
}

struct NoMemberships;

#[async_trait]
impl RoleMembershipRepository for NoMemberships {
    async fn list_role_ids_for_user(&self, _user_id: UserId) -> AppResult<Vec<RoleId>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct FakeContentState {
    users: HashMap<UserId, UserAccount>,
    posts: HashMap<PostId, Post>,
    comments: HashMap<CommentId, Comment>,
    likes: HashMap<LikeId, Like>,
}

#[derive(Default)]
struct FakeContentRepository {
    state: Mutex<FakeContentState>,
}

#[async_trait]
impl ContentRepository for FakeContentRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn upsert_user(&self, account: &UserAccount) -> AppResult<()> {
        self.state
            .lock()
            .await
            .users
            .insert(account.id(), account.clone());
        Ok(())
    }

    async fn find_post(&self, post_id: PostId) -> AppResult<Option<Post>> {
        Ok(self.state.lock().await.posts.get(&post_id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> AppResult<()> {
        self.state
            .lock()
            .await
            .posts
            .insert(post.id(), post.clone());
        Ok(())
    }

    async fn update_post(&self, post: &Post) -> AppResult<()> {
        self.insert_post(post).await
    }

    async fn delete_post(&self, post_id: PostId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.posts.remove(&post_id);
        state.comments.retain(|_, comment| comment.post_id() != post_id);
        state.likes.retain(|_, like| like.post_id() != post_id);
        Ok(())
    }

    async fn find_comment(&self, comment_id: CommentId) -> AppResult<Option<Comment>> {
        Ok(self.state.lock().await.comments.get(&comment_id).cloned())
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<()> {
        self.state
            .lock()
            .await
            .comments
            .insert(comment.id(), comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, comment_id: CommentId) -> AppResult<()> {
        self.state.lock().await.comments.remove(&comment_id);
        Ok(())
    }

    async fn find_like(&self, like_id: LikeId) -> AppResult<Option<Like>> {
        Ok(self.state.lock().await.likes.get(&like_id).cloned())
    }

    async fn insert_like(&self, like: &Like) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state
            .likes
            .values()
            .any(|stored| stored.post_id() == like.post_id() && stored.user_id() == like.user_id())
        {
            return Err(AppError::Conflict("post is already liked".to_owned()));
        }
        state.likes.insert(like.id(), like.clone());
        Ok(())
    }

    async fn delete_like(&self, like_id: LikeId) -> AppResult<()> {
        self.state.lock().await.likes.remove(&like_id);
        Ok(())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct Fixture {
    service: ContentService,
    repository: Arc<FakeContentRepository>,
    audit: Arc<FakeAuditRepository>,
    role_ids: HashMap<&'static str, RoleId>,
}

impl Fixture {
    fn new() -> Self {
        let role_ids = DefaultRole::all()
            .iter()
            .map(|role| (role.name(), RoleId::new()))
            .collect::<HashMap<_, _>>();
        let claims = DefaultRole::all()
            .iter()
            .map(|role| {
                let role_id = role_ids.get(role.name()).copied().unwrap_or_default();
                let claims = role
                    .permissions()
                    .iter()
                    .map(|permission| RoleClaim::new("permission", permission.to_claim_value()))
                    .collect::<Vec<_>>();
                (role_id, claims)
            })
            .collect();
        let authorization_service = AuthorizationService::new(
            RoleClaimStore::new(Arc::new(DefaultRoleClaims { claims })),
            Arc::new(NoMemberships),
            OwnershipRegistry::default(),
        );
        let repository = Arc::new(FakeContentRepository::default());
        let audit = Arc::new(FakeAuditRepository::default());

        Self {
            service: ContentService::new(authorization_service, repository.clone(), audit.clone()),
            repository,
            audit,
            role_ids,
        }
    }

    fn actor(&self, user_id: UserId, role: DefaultRole) -> Actor {
        Actor::new(
            UserIdentity::new(user_id.to_string(), role.name(), None),
            self.role_ids.get(role.name()).copied(),
        )
    }

    async fn post_by(&self, author: UserId) -> Post {
        let post =
            Post::new(PostId::new(), author, "Seeded", "Body").unwrap_or_else(|_| unreachable!());
        assert!(self.repository.insert_post(&post).await.is_ok());
        post
    }
}

fn post_input(title: &str) -> CreatePostInput {
    CreatePostInput {
        title: title.to_owned(),
        body: "Lorem ipsum".to_owned(),
    }
}

#[tokio::test]
async fn redactor_creates_posts_owned_by_themselves() {
    let fixture = Fixture::new();
    let redactor_id = UserId::new();
    let redactor = fixture.actor(redactor_id, DefaultRole::Redactor);

    let post = fixture
        .service
        .create_post(&redactor, post_input("Release notes"))
        .await;

    assert!(post.is_ok_and(|post| post.author_id() == redactor_id));
}

#[tokio::test]
async fn regular_user_can_not_create_posts() {
    let fixture = Fixture::new();
    let user = fixture.actor(UserId::new(), DefaultRole::User);

    let result = fixture.service.create_post(&user, post_input("Spam")).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(fixture.repository.state.lock().await.posts.is_empty());
}

#[tokio::test]
async fn missing_post_is_not_found_before_authorization() {
    let fixture = Fixture::new();
    let user = fixture.actor(UserId::new(), DefaultRole::User);

    let result = fixture.service.get_post(&user, PostId::new()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn redactor_revises_any_post() {
    let fixture = Fixture::new();
    let post = fixture.post_by(UserId::new()).await;
    let redactor = fixture.actor(UserId::new(), DefaultRole::Redactor);

    let updated = fixture
        .service
        .update_post(
            &redactor,
            post.id(),
            UpdatePostInput {
                title: "Edited".to_owned(),
                body: "New body".to_owned(),
            },
        )
        .await;

    assert!(updated.is_ok_and(|post| post.title().as_str() == "Edited"));
}

#[tokio::test]
async fn user_comments_and_deletes_only_own_comments() {
    let fixture = Fixture::new();
    let post = fixture.post_by(UserId::new()).await;
    let author = fixture.actor(UserId::new(), DefaultRole::User);
    let stranger = fixture.actor(UserId::new(), DefaultRole::User);

    let comment = fixture
        .service
        .create_comment(&author, post.id(), "First!".to_owned())
        .await
        .unwrap_or_else(|_| unreachable!());
    let by_stranger = fixture.service.delete_comment(&stranger, comment.id()).await;
    let by_author = fixture.service.delete_comment(&author, comment.id()).await;

    assert!(matches!(by_stranger, Err(AppError::Forbidden(_))));
    assert!(by_author.is_ok());
    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::ContentCommentDeleted);
}

#[tokio::test]
async fn orphaned_comment_is_only_deletable_with_full_range() {
    let fixture = Fixture::new();
    let post = fixture.post_by(UserId::new()).await;
    let orphan = Comment::new(CommentId::new(), post.id(), None, "left behind")
        .unwrap_or_else(|_| unreachable!());
    assert!(fixture.repository.insert_comment(&orphan).await.is_ok());
    let user = fixture.actor(UserId::new(), DefaultRole::User);
    let redactor = fixture.actor(UserId::new(), DefaultRole::Redactor);

    let by_user = fixture.service.delete_comment(&user, orphan.id()).await;
    let by_redactor = fixture.service.delete_comment(&redactor, orphan.id()).await;

    assert!(matches!(by_user, Err(AppError::Forbidden(_))));
    assert!(by_redactor.is_ok());
}

#[tokio::test]
async fn likes_are_unique_and_removable_by_their_owner() {
    let fixture = Fixture::new();
    let post = fixture.post_by(UserId::new()).await;
    let fan = fixture.actor(UserId::new(), DefaultRole::User);
    let other = fixture.actor(UserId::new(), DefaultRole::User);

    let like = fixture
        .service
        .like_post(&fan, post.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    let again = fixture.service.like_post(&fan, post.id()).await;
    let removed_by_other = fixture.service.remove_like(&other, like.id()).await;
    let removed_by_fan = fixture.service.remove_like(&fan, like.id()).await;

    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert!(matches!(removed_by_other, Err(AppError::Forbidden(_))));
    assert!(removed_by_fan.is_ok());
}

#[tokio::test]
async fn admin_deletes_post_with_audit_event() {
    let fixture = Fixture::new();
    let post = fixture.post_by(UserId::new()).await;
    let admin = fixture.actor(UserId::new(), DefaultRole::Admin);

    let deleted = fixture.service.delete_post(&admin, post.id()).await;

    assert!(deleted.is_ok());
    assert!(fixture.repository.state.lock().await.posts.is_empty());
    let events = fixture.audit.events.lock().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::ContentPostDeleted);
    assert_eq!(events[0].resource_id, post.id().to_string());
}

#[tokio::test]
async fn account_is_readable_only_by_its_owner_for_users() {
    let fixture = Fixture::new();
    let user_id = UserId::new();
    let other_id = UserId::new();
    for id in [user_id, other_id] {
        let account = UserAccount::new(id, "Reader").unwrap_or_else(|_| unreachable!());
        assert!(fixture.repository.upsert_user(&account).await.is_ok());
    }
    let user = fixture.actor(user_id, DefaultRole::User);
    let admin = fixture.actor(UserId::new(), DefaultRole::Admin);

    let own = fixture.service.get_account(&user, user_id).await;
    let other = fixture.service.get_account(&user, other_id).await;
    let by_admin = fixture.service.get_account(&admin, other_id).await;

    assert!(own.is_ok());
    assert!(matches!(other, Err(AppError::Forbidden(_))));
    assert!(by_admin.is_ok());
}

#[tokio::test]
async fn malformed_subject_can_not_create_content() {
    let fixture = Fixture::new();
    let post = fixture.post_by(UserId::new()).await;
    let ghost = Actor::new(
        UserIdentity::new("ghost", "Ghost", None),
        fixture.role_ids.get("Admin").copied(),
    );

    let result = fixture.service.like_post(&ghost, post.id()).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
