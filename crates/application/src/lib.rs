//! Application services and ports.

#![forbid(unsafe_code)]

mod actor;
mod audit_ports;
mod authorization_ports;
mod authorization_service;
mod content_ports;
mod content_service;
mod ownership;
mod role_claim_store;
mod security_admin_ports;
mod security_admin_service;

pub use actor::Actor;
pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_ports::{RoleClaim, RoleClaimRepository, RoleMembershipRepository};
pub use authorization_service::{AccessDecision, AuthorizationService, ResourceScope};
pub use content_ports::{ContentRepository, CreatePostInput, UpdatePostInput};
pub use content_service::ContentService;
pub use ownership::{OwnershipPredicate, OwnershipRegistry};
pub use role_claim_store::RoleClaimStore;
pub use security_admin_ports::{
    RoleAssignment, RoleDefinition, RoleSummary, SecurityAdminRepository,
};
pub use security_admin_service::SecurityAdminService;
