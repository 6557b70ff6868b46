//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod content;
mod role;
mod security;
mod user;

pub use content::{
    Comment, CommentId, Like, LikeId, OwnedResource, Post, PostId, Resource,
};
pub use role::{DefaultRole, ROLE_NAME_MAX_LENGTH, RoleId, RoleName};
pub use security::{
    AuditAction, PERMISSION_CLAIM_TYPE, Permission, PermissionAction, PermissionRange,
    PermissionTarget,
};
pub use user::{UserAccount, UserId};
