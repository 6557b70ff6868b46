use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use inkpost_application::{
    RoleAssignment, RoleClaim, RoleClaimRepository, RoleMembershipRepository, RoleSummary,
    SecurityAdminRepository,
};
use inkpost_core::{AppError, AppResult};
use inkpost_domain::{PERMISSION_CLAIM_TYPE, Permission, RoleId, RoleName, UserId};
use tokio::sync::RwLock;

#[derive(Debug)]
struct StoredRole {
    summary: RoleSummary,
    claims: Vec<RoleClaim>,
}

#[derive(Debug, Clone)]
struct StoredMembership {
    user_id: UserId,
    role_id: RoleId,
    assigned_at: String,
}

/// In-memory role, claim and membership repository.
///
/// Implements every security port over one lock so claim writes and role
/// deletes stay consistent with each other.
#[derive(Debug, Default)]
pub struct InMemorySecurityRepository {
    roles: RwLock<HashMap<RoleId, StoredRole>>,
    memberships: RwLock<Vec<StoredMembership>>,
}

impl InMemorySecurityRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' was not found"))
}

#[async_trait]
impl RoleClaimRepository for InMemorySecurityRepository {
    async fn list_role_claims(&self, role_id: RoleId) -> AppResult<Vec<RoleClaim>> {
        self.roles
            .read()
            .await
            .get(&role_id)
            .map(|role| role.claims.clone())
            .ok_or_else(|| role_not_found(role_id))
    }

    async fn insert_role_claim(&self, role_id: RoleId, claim: RoleClaim) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| role_not_found(role_id))?;

        if role.claims.contains(&claim) {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' already holds claim '{}:{}'",
                claim.claim_type, claim.claim_value
            )));
        }

        role.claims.push(claim);
        Ok(())
    }

    async fn delete_role_claims(
        &self,
        role_id: RoleId,
        claim_type: &str,
        claim_values: &[String],
    ) -> AppResult<u64> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| role_not_found(role_id))?;

        let before = role.claims.len();
        role.claims.retain(|claim| {
            claim.claim_type != claim_type || !claim_values.contains(&claim.claim_value)
        });

        Ok(u64::try_from(before - role.claims.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl RoleMembershipRepository for InMemorySecurityRepository {
    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>> {
        Ok(self
            .memberships
            .read()
            .await
            .iter()
            .filter(|membership| membership.user_id == user_id)
            .map(|membership| membership.role_id)
            .collect())
    }
}

#[async_trait]
impl SecurityAdminRepository for InMemorySecurityRepository {
    async fn list_roles(&self) -> AppResult<Vec<RoleSummary>> {
        let mut roles = self
            .roles
            .read()
            .await
            .values()
            .map(|role| role.summary.clone())
            .collect::<Vec<_>>();
        roles.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roles)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleSummary>> {
        Ok(self
            .roles
            .read()
            .await
            .get(&role_id)
            .map(|role| role.summary.clone()))
    }

    async fn create_role(&self, name: RoleName) -> AppResult<RoleSummary> {
        let mut roles = self.roles.write().await;
        if roles
            .values()
            .any(|role| role.summary.name == name.as_str())
        {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        let summary = RoleSummary {
            role_id: RoleId::new(),
            name: name.as_str().to_owned(),
            is_system: false,
        };
        roles.insert(
            summary.role_id,
            StoredRole {
                summary: summary.clone(),
                claims: Vec::new(),
            },
        );

        Ok(summary)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if roles.remove(&role_id).is_none() {
            return Err(role_not_found(role_id));
        }

        self.memberships
            .write()
            .await
            .retain(|membership| membership.role_id != role_id);

        Ok(())
    }

    async fn ensure_system_role(
        &self,
        name: RoleName,
        permissions: &[Permission],
    ) -> AppResult<RoleSummary> {
        let mut roles = self.roles.write().await;
        let existing = roles
            .values()
            .find(|role| role.summary.name == name.as_str())
            .map(|role| role.summary.role_id);
        let role_id = existing.unwrap_or_default();
        let role = roles.entry(role_id).or_insert_with(|| StoredRole {
            summary: RoleSummary {
                role_id,
                name: name.as_str().to_owned(),
                is_system: true,
            },
            claims: Vec::new(),
        });
        role.summary.is_system = true;

        for permission in permissions {
            let claim = RoleClaim::new(PERMISSION_CLAIM_TYPE, permission.to_claim_value());
            if !role.claims.contains(&claim) {
                role.claims.push(claim);
            }
        }

        Ok(role.summary.clone())
    }

    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        if !self.roles.read().await.contains_key(&role_id) {
            return Err(role_not_found(role_id));
        }

        let mut memberships = self.memberships.write().await;
        if memberships
            .iter()
            .any(|membership| membership.user_id == user_id && membership.role_id == role_id)
        {
            return Ok(());
        }

        memberships.push(StoredMembership {
            user_id,
            role_id,
            assigned_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        Ok(())
    }

    async fn assign_baseline_role(
        &self,
        user_id: UserId,
        first_role: RoleId,
        fallback_role: RoleId,
    ) -> AppResult<Option<RoleId>> {
        let roles = self.roles.read().await;
        let mut memberships = self.memberships.write().await;

        if memberships
            .iter()
            .any(|membership| membership.user_id == user_id)
        {
            return Ok(None);
        }

        let role_id = if memberships
            .iter()
            .any(|membership| membership.role_id == first_role)
        {
            fallback_role
        } else {
            first_role
        };
        if !roles.contains_key(&role_id) {
            return Err(role_not_found(role_id));
        }

        memberships.push(StoredMembership {
            user_id,
            role_id,
            assigned_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
        Ok(Some(role_id))
    }

    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut memberships = self.memberships.write().await;
        let before = memberships.len();
        memberships
            .retain(|membership| !(membership.user_id == user_id && membership.role_id == role_id));

        if memberships.len() == before {
            return Err(AppError::NotFound(format!(
                "role assignment '{user_id}:{role_id}' was not found"
            )));
        }

        Ok(())
    }

    async fn list_role_assignments(&self) -> AppResult<Vec<RoleAssignment>> {
        let roles = self.roles.read().await;
        let memberships = self.memberships.read().await;

        let mut assignments = memberships
            .iter()
            .filter_map(|membership| {
                roles.get(&membership.role_id).map(|role| RoleAssignment {
                    user_id: membership.user_id,
                    role_id: membership.role_id,
                    role_name: role.summary.name.clone(),
                    assigned_at: membership.assigned_at.clone(),
                })
            })
            .collect::<Vec<_>>();
        assignments.sort_by(|left, right| {
            left.user_id
                .cmp(&right.user_id)
                .then_with(|| left.role_name.cmp(&right.role_name))
        });

        Ok(assignments)
    }
}
