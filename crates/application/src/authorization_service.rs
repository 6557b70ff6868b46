use std::collections::BTreeSet;
use std::sync::Arc;

use inkpost_core::{AppError, AppResult, UserIdentity};
use inkpost_domain::{
    Permission, PermissionAction, PermissionRange, PermissionTarget, Resource, RoleId, UserId,
};
use tracing::{debug, warn};

use crate::{Actor, OwnershipRegistry, RoleClaimStore, RoleMembershipRepository};

/// Outcome of one authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The actor may perform the action.
    Allow,
    /// The actor may not perform the action.
    Deny,
}

impl AccessDecision {
    /// Returns whether the decision allows access.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Resource context of an authorization check.
///
/// The scope decides whether an `Own` grant can satisfy the check, so every
/// call site states it explicitly.
#[derive(Debug, Clone, Copy)]
pub enum ResourceScope<'a> {
    /// Collection-level check without a concrete resource. `Own` never satisfies.
    Collection,
    /// Creation of a resource the actor will own. `Own` satisfies `Create` only.
    NewOwnedByActor,
    /// Check against an existing resource. `Own` satisfies when the actor owns it.
    Existing(Resource<'a>),
}

/// Application service deciding whether an actor may act on a resource.
#[derive(Clone)]
pub struct AuthorizationService {
    claim_store: RoleClaimStore,
    membership_repository: Arc<dyn RoleMembershipRepository>,
    ownership: Arc<OwnershipRegistry>,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        claim_store: RoleClaimStore,
        membership_repository: Arc<dyn RoleMembershipRepository>,
        ownership: OwnershipRegistry,
    ) -> Self {
        Self {
            claim_store,
            membership_repository,
            ownership: Arc::new(ownership),
        }
    }

    /// Builds the request actor, loading its current role set.
    ///
    /// A subject that is not a valid user id yields an actor without roles.
    pub async fn resolve_actor(&self, identity: UserIdentity) -> AppResult<Actor> {
        let roles = match identity.subject().parse::<UserId>() {
            Ok(user_id) => {
                self.membership_repository
                    .list_role_ids_for_user(user_id)
                    .await?
            }
            Err(error) => {
                debug!(subject = identity.subject(), %error, "session subject is not a user id");
                Vec::new()
            }
        };

        Ok(Actor::new(identity, roles))
    }

    /// Decides whether the actor may perform `action` on `target` in `scope`.
    ///
    /// Insufficient rights are a `Deny`, never an error. Errors are reserved
    /// for storage failures and never imply access.
    pub async fn authorize(
        &self,
        actor: &Actor,
        action: PermissionAction,
        target: PermissionTarget,
        scope: ResourceScope<'_>,
    ) -> AppResult<AccessDecision> {
        let Some(actor_id) = actor.user_id() else {
            debug!(
                subject = actor.subject(),
                "denying access for malformed actor identity"
            );
            return Ok(AccessDecision::Deny);
        };

        for role_id in actor.roles() {
            let Some(permissions) = self.role_permissions(*role_id).await? else {
                continue;
            };

            let granted = permissions
                .iter()
                .filter(|permission| permission.covers(action, target))
                .any(|permission| {
                    self.range_satisfies(permission.range(), actor_id, action, target, &scope)
                });

            if granted {
                debug!(
                    %actor_id,
                    %role_id,
                    action = action.as_str(),
                    target = target.as_str(),
                    "access allowed"
                );
                return Ok(AccessDecision::Allow);
            }
        }

        debug!(
            %actor_id,
            action = action.as_str(),
            target = target.as_str(),
            "access denied"
        );
        Ok(AccessDecision::Deny)
    }

    /// Ensures the actor may perform the action, mapping `Deny` to `Forbidden`.
    pub async fn require(
        &self,
        actor: &Actor,
        action: PermissionAction,
        target: PermissionTarget,
        scope: ResourceScope<'_>,
    ) -> AppResult<()> {
        if self.authorize(actor, action, target, scope).await?.is_allowed() {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' may not {} {}",
            actor.subject(),
            action.as_str(),
            describe_scope(target, &scope)
        )))
    }

    /// Returns the union of permissions granted by the actor's roles.
    pub async fn effective_permissions(&self, actor: &Actor) -> AppResult<BTreeSet<Permission>> {
        let mut permissions = BTreeSet::new();

        if actor.user_id().is_none() {
            return Ok(permissions);
        }

        for role_id in actor.roles() {
            if let Some(role_permissions) = self.role_permissions(*role_id).await? {
                permissions.extend(role_permissions);
            }
        }

        Ok(permissions)
    }

    async fn role_permissions(&self, role_id: RoleId) -> AppResult<Option<BTreeSet<Permission>>> {
        match self.claim_store.list_permissions(role_id).await {
            Ok(permissions) => Ok(Some(permissions)),
            Err(AppError::NotFound(detail)) => {
                warn!(%role_id, detail = detail.as_str(), "actor holds a role that no longer exists");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn range_satisfies(
        &self,
        range: PermissionRange,
        actor_id: UserId,
        action: PermissionAction,
        target: PermissionTarget,
        scope: &ResourceScope<'_>,
    ) -> bool {
        match range {
            PermissionRange::All => true,
            PermissionRange::Own => match scope {
                ResourceScope::Collection => false,
                ResourceScope::NewOwnedByActor => {
                    action == PermissionAction::Create && self.ownership.supports(target)
                }
                ResourceScope::Existing(resource) => {
                    resource.target() == target
                        && self.ownership.is_owner(target, resource, actor_id)
                }
            },
        }
    }
}

fn describe_scope(target: PermissionTarget, scope: &ResourceScope<'_>) -> String {
    match scope {
        ResourceScope::Collection | ResourceScope::NewOwnedByActor => target.as_str().to_owned(),
        ResourceScope::Existing(resource) => format!("{} '{}'", target.as_str(), resource.id()),
    }
}
