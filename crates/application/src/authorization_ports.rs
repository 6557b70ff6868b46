use async_trait::async_trait;
use inkpost_core::AppResult;
use inkpost_domain::{RoleId, UserId};

/// Raw claim row attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleClaim {
    /// Claim namespace, e.g. `permission`.
    pub claim_type: String,
    /// Serialized claim payload.
    pub claim_value: String,
}

impl RoleClaim {
    /// Creates a claim row.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}

/// Repository port for claims persisted on roles.
#[async_trait]
pub trait RoleClaimRepository: Send + Sync {
    /// Lists every claim stored on a role.
    ///
    /// Fails with `NotFound` when the role does not exist.
    async fn list_role_claims(&self, role_id: RoleId) -> AppResult<Vec<RoleClaim>>;

    /// Inserts one claim as a single conditional write.
    ///
    /// Fails with `NotFound` when the role does not exist and with `Conflict`
    /// when an identical claim is already stored.
    async fn insert_role_claim(&self, role_id: RoleId, claim: RoleClaim) -> AppResult<()>;

    /// Deletes the listed claim values of one claim type and returns how many
    /// rows were removed.
    ///
    /// Fails with `NotFound` when the role does not exist.
    async fn delete_role_claims(
        &self,
        role_id: RoleId,
        claim_type: &str,
        claim_values: &[String],
    ) -> AppResult<u64>;
}

/// Repository port for user to role membership lookups.
#[async_trait]
pub trait RoleMembershipRepository: Send + Sync {
    /// Lists the roles currently held by a user.
    async fn list_role_ids_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleId>>;
}
