use inkpost_application::{RoleAssignment, RoleDefinition};
use inkpost_domain::Permission;

use super::{PermissionResponse, RoleAssignmentResponse, RoleResponse};

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            name: value.name,
            is_system: value.is_system,
            permissions: value
                .permissions
                .iter()
                .map(Permission::to_claim_value)
                .collect(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission: value.to_claim_value(),
            action: value.action().as_str().to_owned(),
            target: value.target().as_str().to_owned(),
            range: value.range().as_str().to_owned(),
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            role_id: value.role_id.to_string(),
            role_name: value.role_name,
            assigned_at: value.assigned_at,
        }
    }
}
