//! Role identity and the seeded default role catalogue.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use inkpost_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Permission, PermissionAction, PermissionRange, PermissionTarget};

/// Maximum role name length in characters.
pub const ROLE_NAME_MAX_LENGTH: usize = 20;

/// Unique identifier for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid role id '{value}': {error}")))
    }
}

/// Validated unique role name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a trimmed role name of at most [`ROLE_NAME_MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "role name must not be empty".to_owned(),
            ));
        }

        if trimmed.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must be at most {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RoleName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// System roles seeded on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultRole {
    /// Full access to every target.
    Admin,
    /// Editorial staff managing posts and taxonomy.
    Redactor,
    /// Regular registered reader.
    User,
}

impl DefaultRole {
    /// Returns all seeded roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[DefaultRole] = &[DefaultRole::Admin, DefaultRole::Redactor, DefaultRole::User];

        ALL
    }

    /// Returns the persisted role name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Redactor => "Redactor",
            Self::User => "User",
        }
    }

    /// Returns the baseline permission set of the role.
    #[must_use]
    pub fn permissions(&self) -> Vec<Permission> {
        match self {
            Self::Admin => PermissionTarget::all()
                .iter()
                .flat_map(|target| {
                    PermissionAction::all()
                        .iter()
                        .map(|action| Permission::new(*action, *target, PermissionRange::All))
                })
                .collect(),
            Self::Redactor => {
                let mut permissions = read_all_except(&[
                    PermissionTarget::Account,
                    PermissionTarget::Role,
                    PermissionTarget::Permission,
                ]);
                for target in [
                    PermissionTarget::Post,
                    PermissionTarget::Category,
                    PermissionTarget::Tag,
                ] {
                    permissions.extend(writes(target, PermissionRange::All));
                }
                permissions.push(Permission::new(
                    PermissionAction::Delete,
                    PermissionTarget::Comment,
                    PermissionRange::All,
                ));
                permissions.extend(own_contributions());
                permissions
            }
            Self::User => {
                let mut permissions = read_all_except(&[PermissionTarget::Account]);
                permissions.extend(own_contributions());
                permissions.push(Permission::new(
                    PermissionAction::Read,
                    PermissionTarget::Account,
                    PermissionRange::Own,
                ));
                permissions
            }
        }
    }
}

fn read_all_except(excluded: &[PermissionTarget]) -> Vec<Permission> {
    PermissionTarget::all()
        .iter()
        .filter(|target| !excluded.contains(target))
        .map(|target| Permission::new(PermissionAction::Read, *target, PermissionRange::All))
        .collect()
}

fn writes(target: PermissionTarget, range: PermissionRange) -> [Permission; 3] {
    [
        Permission::new(PermissionAction::Create, target, range),
        Permission::new(PermissionAction::Update, target, range),
        Permission::new(PermissionAction::Delete, target, range),
    ]
}

fn own_contributions() -> Vec<Permission> {
    [
        PermissionTarget::Comment,
        PermissionTarget::Like,
        PermissionTarget::Account,
    ]
    .into_iter()
    .flat_map(|target| writes(target, PermissionRange::Own))
    .collect()
}
