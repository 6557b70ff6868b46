use std::collections::BTreeSet;
use std::sync::Arc;

use inkpost_core::{AppError, AppResult};
use inkpost_domain::{PERMISSION_CLAIM_TYPE, Permission, RoleId};
use tracing::warn;

use crate::{RoleClaim, RoleClaimRepository};

/// Typed access to the permission claims stored on roles.
#[derive(Clone)]
pub struct RoleClaimStore {
    repository: Arc<dyn RoleClaimRepository>,
}

impl RoleClaimStore {
    /// Creates a store over a claim repository.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleClaimRepository>) -> Self {
        Self { repository }
    }

    /// Returns the decoded permission set of a role.
    ///
    /// Claims of other types are ignored. Permission claims that fail to
    /// decode are skipped and logged.
    pub async fn list_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<Permission>> {
        let claims = self.repository.list_role_claims(role_id).await?;
        Ok(decode_permission_claims(role_id, &claims)
            .into_iter()
            .map(|(permission, _)| permission)
            .collect())
    }

    /// Adds a permission to a role.
    ///
    /// Fails with `Conflict` when a structurally equal permission is present,
    /// whichever claim encoding it was stored with.
    pub async fn add_permission(&self, role_id: RoleId, permission: Permission) -> AppResult<()> {
        if self.list_permissions(role_id).await?.contains(&permission) {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' already holds permission '{permission}'"
            )));
        }

        self.repository
            .insert_role_claim(
                role_id,
                RoleClaim::new(PERMISSION_CLAIM_TYPE, permission.to_claim_value()),
            )
            .await
    }

    /// Removes a permission from a role.
    ///
    /// Fails with `NotFound` when the role does not hold the permission. Only
    /// claims decoding to exactly this permission are deleted.
    pub async fn remove_permission(
        &self,
        role_id: RoleId,
        permission: Permission,
    ) -> AppResult<()> {
        let claims = self.repository.list_role_claims(role_id).await?;
        let matching_values = decode_permission_claims(role_id, &claims)
            .into_iter()
            .filter(|(stored, _)| stored == &permission)
            .map(|(_, claim_value)| claim_value)
            .collect::<Vec<_>>();

        if matching_values.is_empty() {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not hold permission '{permission}'"
            )));
        }

        let removed = self
            .repository
            .delete_role_claims(role_id, PERMISSION_CLAIM_TYPE, &matching_values)
            .await?;

        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not hold permission '{permission}'"
            )));
        }

        Ok(())
    }
}

fn decode_permission_claims(role_id: RoleId, claims: &[RoleClaim]) -> Vec<(Permission, String)> {
    claims
        .iter()
        .filter(|claim| claim.claim_type == PERMISSION_CLAIM_TYPE)
        .filter_map(
            |claim| match Permission::from_claim_value(claim.claim_value.as_str()) {
                Ok(permission) => Some((permission, claim.claim_value.clone())),
                Err(error) => {
                    warn!(
                        %role_id,
                        claim_value = claim.claim_value.as_str(),
                        %error,
                        "skipping undecodable permission claim"
                    );
                    None
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use inkpost_core::{AppError, AppResult};
    use inkpost_domain::{Permission, PermissionAction, PermissionRange, PermissionTarget, RoleId};
    use tokio::sync::Mutex;

    use super::RoleClaimStore;
    use crate::{RoleClaim, RoleClaimRepository};

    #[derive(Default)]
    struct FakeRoleClaimRepository {
        claims: Mutex<HashMap<RoleId, Vec<RoleClaim>>>,
    }

    impl FakeRoleClaimRepository {
        fn with_role(role_id: RoleId, claims: Vec<RoleClaim>) -> Self {
            Self {
                claims: Mutex::new(HashMap::from([(role_id, claims)])),
            }
        }
    }

    #[async_trait]
    impl RoleClaimRepository for FakeRoleClaimRepository {
        async fn list_role_claims(&self, role_id: RoleId) -> AppResult<Vec<RoleClaim>> {
            self.claims
                .lock()
                .await
                .get(&role_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
        }

        async fn insert_role_claim(&self, role_id: RoleId, claim: RoleClaim) -> AppResult<()> {
            let mut claims = self.claims.lock().await;
            let role_claims = claims
                .get_mut(&role_id)
                .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
            if role_claims.contains(&claim) {
                return Err(AppError::Conflict("duplicate claim".to_owned()));
            }
            role_claims.push(claim);
            Ok(())
        }

        async fn delete_role_claims(
            &self,
            role_id: RoleId,
            claim_type: &str,
            claim_values: &[String],
        ) -> AppResult<u64> {
            let mut claims = self.claims.lock().await;
            let role_claims = claims
                .get_mut(&role_id)
                .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
            let before = role_claims.len();
            role_claims.retain(|claim| {
                !(claim.claim_type == claim_type && claim_values.contains(&claim.claim_value))
            });
            Ok((before - role_claims.len()) as u64)
        }
    }

    fn update_own_post() -> Permission {
        Permission::new(
            PermissionAction::Update,
            PermissionTarget::Post,
            PermissionRange::Own,
        )
    }

    fn create_all_post() -> Permission {
        Permission::new(
            PermissionAction::Create,
            PermissionTarget::Post,
            PermissionRange::All,
        )
    }

    #[tokio::test]
    async fn list_permissions_fails_for_unknown_role() {
        let store = RoleClaimStore::new(Arc::new(FakeRoleClaimRepository::default()));

        let result = store.list_permissions(RoleId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_permissions_skips_foreign_and_broken_claims() {
        let role_id = RoleId::new();
        let store = RoleClaimStore::new(Arc::new(FakeRoleClaimRepository::with_role(
            role_id,
            vec![
                RoleClaim::new("permission", "update.post.own"),
                RoleClaim::new("permission", "publish.post.all"),
                RoleClaim::new("display_color", "teal"),
                RoleClaim::new("permission", "0:4:1"),
            ],
        )));

        let permissions = store.list_permissions(role_id).await.unwrap_or_default();

        assert_eq!(permissions.len(), 2);
        assert!(permissions.contains(&update_own_post()));
        assert!(permissions.contains(&create_all_post()));
    }

    #[tokio::test]
    async fn adding_equal_permission_twice_conflicts_and_keeps_size() {
        let role_id = RoleId::new();
        let store = RoleClaimStore::new(Arc::new(FakeRoleClaimRepository::with_role(
            role_id,
            Vec::new(),
        )));

        assert!(store.add_permission(role_id, update_own_post()).await.is_ok());
        let second = store.add_permission(role_id, update_own_post()).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.list_permissions(role_id).await.unwrap_or_default().len(), 1);
    }

    #[tokio::test]
    async fn adding_permission_stored_in_legacy_encoding_conflicts() {
        let role_id = RoleId::new();
        let store = RoleClaimStore::new(Arc::new(FakeRoleClaimRepository::with_role(
            role_id,
            vec![RoleClaim::new("permission", "2:4:0")],
        )));

        let result = store.add_permission(role_id, update_own_post()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn removing_absent_permission_is_not_found_and_keeps_others() {
        let role_id = RoleId::new();
        let store = RoleClaimStore::new(Arc::new(FakeRoleClaimRepository::with_role(
            role_id,
            vec![RoleClaim::new("permission", "create.post.all")],
        )));

        let result = store.remove_permission(role_id, update_own_post()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        let remaining = store.list_permissions(role_id).await.unwrap_or_default();
        assert_eq!(remaining.into_iter().collect::<Vec<_>>(), vec![create_all_post()]);
    }

    #[tokio::test]
    async fn removing_permission_deletes_every_encoding_of_it() {
        let role_id = RoleId::new();
        let store = RoleClaimStore::new(Arc::new(FakeRoleClaimRepository::with_role(
            role_id,
            vec![
                RoleClaim::new("permission", "update.post.own"),
                RoleClaim::new("permission", "2:4:0"),
                RoleClaim::new("permission", "create.post.all"),
            ],
        )));

        let result = store.remove_permission(role_id, update_own_post()).await;

        assert!(result.is_ok());
        let remaining = store.list_permissions(role_id).await.unwrap_or_default();
        assert_eq!(remaining.into_iter().collect::<Vec<_>>(), vec![create_all_post()]);
    }
}
