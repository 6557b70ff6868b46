use async_trait::async_trait;

use inkpost_core::AppResult;
use inkpost_domain::{Permission, RoleId, RoleName, UserId};

/// Persisted role row without its claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Indicates a seeded system role.
    pub is_system: bool,
}

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Indicates a seeded system role.
    pub is_system: bool,
    /// Decoded permission claims, sorted.
    pub permissions: Vec<Permission>,
}

/// Assignment projection mapping a user to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Member user.
    pub user_id: UserId,
    /// Role identifier.
    pub role_id: RoleId,
    /// Role name.
    pub role_name: String,
    /// Assignment timestamp in RFC3339.
    pub assigned_at: String,
}

/// Repository port for role and membership administration.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleSummary>>;

    /// Finds one role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleSummary>>;

    /// Creates a custom role. Fails with `Conflict` on a duplicate name.
    async fn create_role(&self, name: RoleName) -> AppResult<RoleSummary>;

    /// Deletes a role together with its claims and memberships.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Creates the system role if missing and adds any missing permission claims.
    async fn ensure_system_role(
        &self,
        name: RoleName,
        permissions: &[Permission],
    ) -> AppResult<RoleSummary>;

    /// Adds a user to a role. Assigning an existing membership is a no-op.
    async fn assign_role_to_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Gives a user without memberships `first_role` while nobody holds it,
    /// otherwise `fallback_role`.
    ///
    /// Deciding and inserting happen atomically so concurrent callers never
    /// both receive `first_role`. Returns `None` without writing when the user
    /// already holds any role.
    async fn assign_baseline_role(
        &self,
        user_id: UserId,
        first_role: RoleId,
        fallback_role: RoleId,
    ) -> AppResult<Option<RoleId>>;

    /// Removes a user from a role. Fails with `NotFound` when not a member.
    async fn remove_role_from_user(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Lists current role memberships.
    async fn list_role_assignments(&self) -> AppResult<Vec<RoleAssignment>>;
}
