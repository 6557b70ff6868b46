use std::sync::Arc;

use inkpost_core::{AppError, AppResult};
use inkpost_domain::{
    AuditAction, DefaultRole, Permission, PermissionAction, PermissionTarget, RoleId, RoleName,
    UserId,
};
use tracing::info;

use crate::{
    Actor, AuditEvent, AuditRepository, AuthorizationService, ResourceScope, RoleAssignment,
    RoleClaimStore, RoleDefinition, RoleSummary, SecurityAdminRepository,
};

/// Application service for role, claim and membership administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    claim_store: RoleClaimStore,
    repository: Arc<dyn SecurityAdminRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        claim_store: RoleClaimStore,
        repository: Arc<dyn SecurityAdminRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            claim_store,
            repository,
            audit_repository,
        }
    }

    /// Creates the default system roles and tops up their permission claims.
    ///
    /// Runs at startup without an actor and is safe to repeat.
    pub async fn seed_default_roles(&self) -> AppResult<Vec<RoleSummary>> {
        let mut seeded = Vec::with_capacity(DefaultRole::all().len());

        for default_role in DefaultRole::all() {
            let permissions = default_role.permissions();
            let role = self
                .repository
                .ensure_system_role(RoleName::new(default_role.name())?, &permissions)
                .await?;
            info!(
                role = role.name.as_str(),
                role_id = %role.role_id,
                permissions = permissions.len(),
                "system role ensured"
            );
            seeded.push(role);
        }

        Ok(seeded)
    }

    /// Gives a user without roles its baseline role.
    ///
    /// The first user while nobody holds `Admin` becomes `Admin`, everyone else
    /// becomes `User`. Returns `None` when the user already holds a role.
    pub async fn ensure_default_membership(&self, user_id: UserId) -> AppResult<Option<DefaultRole>> {
        let roles = self.repository.list_roles().await?;
        let admin = seeded_role(&roles, DefaultRole::Admin)?;
        let user = seeded_role(&roles, DefaultRole::User)?;

        let Some(assigned_role_id) = self
            .repository
            .assign_baseline_role(user_id, admin.role_id, user.role_id)
            .await?
        else {
            return Ok(None);
        };

        let (default_role, role) = if assigned_role_id == admin.role_id {
            (DefaultRole::Admin, admin)
        } else {
            (DefaultRole::User, user)
        };
        info!(%user_id, role = default_role.name(), "assigned baseline role");

        self.audit_repository
            .append_event(AuditEvent {
                subject: user_id.to_string(),
                action: AuditAction::SecurityRoleAssigned,
                resource_type: "role".to_owned(),
                resource_id: role.role_id.to_string(),
                detail: Some(format!("assigned baseline role '{}'", role.name)),
            })
            .await?;

        Ok(Some(default_role))
    }

    /// Returns every role with its decoded permissions.
    pub async fn list_roles(&self, actor: &Actor) -> AppResult<Vec<RoleDefinition>> {
        self.require_collection(actor, PermissionAction::Read, PermissionTarget::Role)
            .await?;

        let roles = self.repository.list_roles().await?;
        let mut definitions = Vec::with_capacity(roles.len());
        for role in roles {
            let permissions = self.claim_store.list_permissions(role.role_id).await?;
            definitions.push(RoleDefinition {
                role_id: role.role_id,
                name: role.name,
                is_system: role.is_system,
                permissions: permissions.into_iter().collect(),
            });
        }

        Ok(definitions)
    }

    /// Creates a custom role without permissions and emits an audit event.
    pub async fn create_role(&self, actor: &Actor, name: &str) -> AppResult<RoleDefinition> {
        self.require_collection(actor, PermissionAction::Create, PermissionTarget::Role)
            .await?;

        let role = self.repository.create_role(RoleName::new(name)?).await?;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleCreated,
            role.role_id,
            format!("created role '{}'", role.name),
        )
        .await?;

        Ok(RoleDefinition {
            role_id: role.role_id,
            name: role.name,
            is_system: role.is_system,
            permissions: Vec::new(),
        })
    }

    /// Deletes a custom role and emits an audit event.
    pub async fn delete_role(&self, actor: &Actor, role_id: RoleId) -> AppResult<()> {
        self.require_collection(actor, PermissionAction::Delete, PermissionTarget::Role)
            .await?;

        let role = self.find_role(role_id).await?;
        if role.is_system {
            return Err(AppError::Validation(format!(
                "system role '{}' can not be deleted",
                role.name
            )));
        }

        self.repository.delete_role(role_id).await?;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleDeleted,
            role_id,
            format!("deleted role '{}'", role.name),
        )
        .await
    }

    /// Returns the sorted permission set of one role.
    pub async fn list_permissions(
        &self,
        actor: &Actor,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        self.require_collection(actor, PermissionAction::Read, PermissionTarget::Permission)
            .await?;

        Ok(self
            .claim_store
            .list_permissions(role_id)
            .await?
            .into_iter()
            .collect())
    }

    /// Adds a permission claim to a role and emits an audit event.
    pub async fn add_permission(
        &self,
        actor: &Actor,
        role_id: RoleId,
        permission: Permission,
    ) -> AppResult<()> {
        self.require_collection(actor, PermissionAction::Create, PermissionTarget::Permission)
            .await?;

        self.claim_store.add_permission(role_id, permission).await?;

        self.append_audit(
            actor,
            AuditAction::SecurityPermissionAdded,
            role_id,
            format!("added permission '{permission}'"),
        )
        .await
    }

    /// Removes a permission claim from a role and emits an audit event.
    pub async fn remove_permission(
        &self,
        actor: &Actor,
        role_id: RoleId,
        permission: Permission,
    ) -> AppResult<()> {
        self.require_collection(actor, PermissionAction::Delete, PermissionTarget::Permission)
            .await?;

        self.claim_store
            .remove_permission(role_id, permission)
            .await?;

        self.append_audit(
            actor,
            AuditAction::SecurityPermissionRemoved,
            role_id,
            format!("removed permission '{permission}'"),
        )
        .await
    }

    /// Assigns a role to a user and emits an audit event.
    pub async fn assign_role(&self, actor: &Actor, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.require_collection(actor, PermissionAction::Update, PermissionTarget::Role)
            .await?;

        let role = self.find_role(role_id).await?;
        self.repository.assign_role_to_user(user_id, role_id).await?;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleAssigned,
            role_id,
            format!("assigned role '{}' to user '{user_id}'", role.name),
        )
        .await
    }

    /// Removes a role from a user and emits an audit event.
    pub async fn unassign_role(
        &self,
        actor: &Actor,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<()> {
        self.require_collection(actor, PermissionAction::Update, PermissionTarget::Role)
            .await?;

        let role = self.find_role(role_id).await?;
        self.repository
            .remove_role_from_user(user_id, role_id)
            .await?;

        self.append_audit(
            actor,
            AuditAction::SecurityRoleUnassigned,
            role_id,
            format!("removed role '{}' from user '{user_id}'", role.name),
        )
        .await
    }

    /// Lists current role memberships.
    pub async fn list_role_assignments(&self, actor: &Actor) -> AppResult<Vec<RoleAssignment>> {
        self.require_collection(actor, PermissionAction::Read, PermissionTarget::Role)
            .await?;

        self.repository.list_role_assignments().await
    }

    async fn require_collection(
        &self,
        actor: &Actor,
        action: PermissionAction,
        target: PermissionTarget,
    ) -> AppResult<()> {
        self.authorization_service
            .require(actor, action, target, ResourceScope::Collection)
            .await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<RoleSummary> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    async fn append_audit(
        &self,
        actor: &Actor,
        action: AuditAction,
        role_id: RoleId,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action,
                resource_type: "role".to_owned(),
                resource_id: role_id.to_string(),
                detail: Some(detail),
            })
            .await
    }
}

fn seeded_role(roles: &[RoleSummary], default_role: DefaultRole) -> AppResult<&RoleSummary> {
    roles
        .iter()
        .find(|role| role.name == default_role.name())
        .ok_or_else(|| {
            AppError::Internal(format!(
                "system role '{}' has not been seeded",
                default_role.name()
            ))
        })
}
