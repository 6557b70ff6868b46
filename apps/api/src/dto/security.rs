use inkpost_core::AppResult;
use inkpost_domain::{Permission, RoleId, UserId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Incoming payload for custom role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
}

/// Incoming payload for adding a permission claim to a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/add-permission-request.ts"
)]
pub struct AddPermissionRequest {
    /// Permission tag such as `update.post.own`.
    pub permission: String,
}

impl AddPermissionRequest {
    /// Decodes the transported permission.
    pub fn permission(&self) -> AppResult<Permission> {
        Permission::from_claim_value(self.permission.as_str())
    }
}

/// Incoming payload for role assignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub user_id: String,
    pub role_id: String,
}

impl AssignRoleRequest {
    /// Parses the member and role identifiers.
    pub fn identifiers(&self) -> AppResult<(UserId, RoleId)> {
        Ok((self.user_id.parse()?, self.role_id.parse()?))
    }
}

/// Incoming payload for role unassignment.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/remove-role-assignment-request.ts"
)]
pub struct RemoveRoleAssignmentRequest {
    pub user_id: String,
    pub role_id: String,
}

impl RemoveRoleAssignmentRequest {
    /// Parses the member and role identifiers.
    pub fn identifiers(&self) -> AppResult<(UserId, RoleId)> {
        Ok((self.user_id.parse()?, self.role_id.parse()?))
    }
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub is_system: bool,
    pub permissions: Vec<String>,
}

/// API representation of one permission claim.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission: String,
    pub action: String,
    pub target: String,
    pub range: String,
}

/// API representation of a role assignment.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub user_id: String,
    pub role_id: String,
    pub role_name: String,
    pub assigned_at: String,
}
