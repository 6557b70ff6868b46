use std::collections::HashMap;

use inkpost_domain::{OwnedResource, PermissionTarget, Resource, UserId};

/// Ownership check for one resource kind.
pub type OwnershipPredicate = fn(&Resource<'_>, UserId) -> bool;

/// Lookup table from permission target to its ownership predicate.
///
/// Targets without a registered predicate are never considered owned, so an
/// `Own` grant on them can not be satisfied.
#[derive(Clone)]
pub struct OwnershipRegistry {
    predicates: HashMap<PermissionTarget, OwnershipPredicate>,
}

impl OwnershipRegistry {
    /// Creates a registry without predicates.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Creates a registry covering the ownable blog resources.
    #[must_use]
    pub fn with_blog_resources() -> Self {
        Self::empty()
            .register(PermissionTarget::Post, post_owner)
            .register(PermissionTarget::Comment, comment_owner)
            .register(PermissionTarget::Like, like_owner)
            .register(PermissionTarget::User, user_owner)
            .register(PermissionTarget::Account, account_owner)
    }

    /// Registers or replaces the predicate for a target.
    #[must_use]
    pub fn register(mut self, target: PermissionTarget, predicate: OwnershipPredicate) -> Self {
        self.predicates.insert(target, predicate);
        self
    }

    /// Returns whether a predicate is registered for the target.
    #[must_use]
    pub fn supports(&self, target: PermissionTarget) -> bool {
        self.predicates.contains_key(&target)
    }

    /// Returns whether `actor_id` owns `resource` under the predicate of `target`.
    #[must_use]
    pub fn is_owner(
        &self,
        target: PermissionTarget,
        resource: &Resource<'_>,
        actor_id: UserId,
    ) -> bool {
        self.predicates
            .get(&target)
            .is_some_and(|predicate| predicate(resource, actor_id))
    }
}

impl Default for OwnershipRegistry {
    fn default() -> Self {
        Self::with_blog_resources()
    }
}

fn post_owner(resource: &Resource<'_>, actor_id: UserId) -> bool {
    matches!(resource, Resource::Post(post) if post.is_owned_by(actor_id))
}

fn comment_owner(resource: &Resource<'_>, actor_id: UserId) -> bool {
    matches!(resource, Resource::Comment(comment) if comment.is_owned_by(actor_id))
}

fn like_owner(resource: &Resource<'_>, actor_id: UserId) -> bool {
    matches!(resource, Resource::Like(like) if like.is_owned_by(actor_id))
}

fn user_owner(resource: &Resource<'_>, actor_id: UserId) -> bool {
    matches!(resource, Resource::User(account) if account.is_owned_by(actor_id))
}

fn account_owner(resource: &Resource<'_>, actor_id: UserId) -> bool {
    matches!(resource, Resource::Account(account) if account.is_owned_by(actor_id))
}

#[cfg(test)]
mod tests {
    use inkpost_domain::{
        Comment, CommentId, Like, LikeId, PermissionTarget, Post, PostId, Resource, UserAccount,
        UserId,
    };

    use super::OwnershipRegistry;

    #[test]
    fn registry_covers_every_ownable_target() {
        let registry = OwnershipRegistry::default();

        for target in [
            PermissionTarget::Post,
            PermissionTarget::Comment,
            PermissionTarget::Like,
            PermissionTarget::User,
            PermissionTarget::Account,
        ] {
            assert!(registry.supports(target), "{}", target.as_str());
        }
        assert!(!registry.supports(PermissionTarget::Tag));
        assert!(!registry.supports(PermissionTarget::Role));
    }

    #[test]
    fn predicates_compare_owner_with_actor() {
        let registry = OwnershipRegistry::default();
        let author = UserId::new();
        let stranger = UserId::new();
        let post = Post::new(PostId::new(), author, "Title", "Body");
        assert!(post.is_ok());
        let post = post.unwrap_or_else(|_| unreachable!());

        assert!(registry.is_owner(PermissionTarget::Post, &Resource::Post(&post), author));
        assert!(!registry.is_owner(PermissionTarget::Post, &Resource::Post(&post), stranger));
    }

    #[test]
    fn predicate_rejects_resource_of_another_kind() {
        let registry = OwnershipRegistry::default();
        let author = UserId::new();
        let like = Like::new(LikeId::new(), PostId::new(), Some(author));

        assert!(!registry.is_owner(PermissionTarget::Comment, &Resource::Like(&like), author));
    }

    #[test]
    fn ownerless_resources_are_never_owned() {
        let registry = OwnershipRegistry::default();
        let comment = Comment::new(CommentId::new(), PostId::new(), None, "text");
        assert!(comment.is_ok());
        let comment = comment.unwrap_or_else(|_| unreachable!());

        assert!(!registry.is_owner(
            PermissionTarget::Comment,
            &Resource::Comment(&comment),
            UserId::new()
        ));
    }

    #[test]
    fn unregistered_target_is_never_owned() {
        let registry = OwnershipRegistry::empty();
        let user_id = UserId::new();
        let account = UserAccount::new(user_id, "Ada");
        assert!(account.is_ok());
        let account = account.unwrap_or_else(|_| unreachable!());

        assert!(!registry.is_owner(
            PermissionTarget::Account,
            &Resource::Account(&account),
            user_id
        ));
    }
}
