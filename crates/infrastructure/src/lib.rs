//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_content_repository;
mod in_memory_security_repository;
mod postgres_audit_repository;
mod postgres_content_repository;
mod postgres_role_claim_repository;
mod postgres_security_admin_repository;

#[cfg(test)]
mod test_support;

pub use in_memory_content_repository::{InMemoryAuditRepository, InMemoryContentRepository};
pub use in_memory_security_repository::InMemorySecurityRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_content_repository::PostgresContentRepository;
pub use postgres_role_claim_repository::PostgresRoleClaimRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
