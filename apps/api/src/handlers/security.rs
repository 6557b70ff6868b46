use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use inkpost_application::Actor;
use inkpost_domain::{Permission, RoleId};

use crate::dto::{
    AddPermissionRequest, AssignRoleRequest, CreateRoleRequest, PermissionResponse,
    RemoveRoleAssignmentRequest, RoleAssignmentResponse, RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod assignments;
mod permissions;
mod roles;

pub use assignments::{assign_role_handler, list_role_assignments_handler, unassign_role_handler};
pub use permissions::{add_permission_handler, list_permissions_handler, remove_permission_handler};
pub use roles::{create_role_handler, delete_role_handler, list_roles_handler};
