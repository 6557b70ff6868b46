use std::fmt::{Display, Formatter};
use std::str::FromStr;

use inkpost_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Claim type under which permissions are stored on a role.
pub const PERMISSION_CLAIM_TYPE: &str = "permission";

/// Operation a permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Creating new resources.
    Create,
    /// Reading resources.
    Read,
    /// Updating existing resources.
    Update,
    /// Deleting existing resources.
    Delete,
}

impl PermissionAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::Create,
            PermissionAction::Read,
            PermissionAction::Update,
            PermissionAction::Delete,
        ];

        ALL
    }

    fn code(self) -> u8 {
        match self {
            Self::Create => 0,
            Self::Read => 1,
            Self::Update => 2,
            Self::Delete => 3,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::all().get(usize::from(code)).copied()
    }
}

impl FromStr for PermissionAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Self::Create),
            "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown permission action '{value}'"
            ))),
        }
    }
}

/// Resource kind a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionTarget {
    /// User profiles.
    User,
    /// Roles and role membership.
    Role,
    /// Post categories.
    Category,
    /// Post tags.
    Tag,
    /// Blog posts.
    Post,
    /// Comments on posts.
    Comment,
    /// Likes on posts.
    Like,
    /// Permission claims attached to roles.
    Permission,
    /// Account settings of a user.
    Account,
}

impl PermissionTarget {
    /// Returns a stable storage value for this target.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Like => "like",
            Self::Permission => "permission",
            Self::Account => "account",
        }
    }

    /// Returns all known targets.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionTarget] = &[
            PermissionTarget::User,
            PermissionTarget::Role,
            PermissionTarget::Category,
            PermissionTarget::Tag,
            PermissionTarget::Post,
            PermissionTarget::Comment,
            PermissionTarget::Like,
            PermissionTarget::Permission,
            PermissionTarget::Account,
        ];

        ALL
    }

    fn code(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Role => 1,
            Self::Category => 2,
            Self::Tag => 3,
            Self::Post => 4,
            Self::Comment => 5,
            Self::Like => 6,
            Self::Permission => 7,
            Self::Account => 8,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::all().get(usize::from(code)).copied()
    }
}

impl FromStr for PermissionTarget {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "role" => Ok(Self::Role),
            "category" => Ok(Self::Category),
            "tag" => Ok(Self::Tag),
            "post" => Ok(Self::Post),
            "comment" => Ok(Self::Comment),
            "like" => Ok(Self::Like),
            "permission" => Ok(Self::Permission),
            "account" => Ok(Self::Account),
            _ => Err(AppError::Validation(format!(
                "unknown permission target '{value}'"
            ))),
        }
    }
}

/// Scope of a permission grant.
///
/// `All` dominates `Own`: an `All` grant satisfies a request regardless of
/// ownership, an `Own` grant only when the actor owns the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionRange {
    /// Only resources owned by the actor.
    Own,
    /// Every resource of the target kind.
    All,
}

impl PermissionRange {
    /// Returns a stable storage value for this range.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::All => "all",
        }
    }

    /// Returns all known ranges.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionRange] = &[PermissionRange::Own, PermissionRange::All];

        ALL
    }

    fn code(self) -> u8 {
        match self {
            Self::Own => 0,
            Self::All => 1,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        Self::all().get(usize::from(code)).copied()
    }
}

impl FromStr for PermissionRange {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "own" => Ok(Self::Own),
            "all" => Ok(Self::All),
            _ => Err(AppError::Validation(format!(
                "unknown permission range '{value}'"
            ))),
        }
    }
}

/// Permission record attached to roles.
///
/// Equality is structural over all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    action: PermissionAction,
    target: PermissionTarget,
    range: PermissionRange,
}

impl Permission {
    /// Creates a permission record.
    #[must_use]
    pub const fn new(
        action: PermissionAction,
        target: PermissionTarget,
        range: PermissionRange,
    ) -> Self {
        Self {
            action,
            target,
            range,
        }
    }

    /// Returns the granted action.
    #[must_use]
    pub fn action(&self) -> PermissionAction {
        self.action
    }

    /// Returns the target resource kind.
    #[must_use]
    pub fn target(&self) -> PermissionTarget {
        self.target
    }

    /// Returns the grant range.
    #[must_use]
    pub fn range(&self) -> PermissionRange {
        self.range
    }

    /// Returns whether this record grants `action` on `target` at any range.
    #[must_use]
    pub fn covers(&self, action: PermissionAction, target: PermissionTarget) -> bool {
        self.action == action && self.target == target
    }

    /// Returns the value stored in a role claim, e.g. `update.post.own`.
    #[must_use]
    pub fn to_claim_value(&self) -> String {
        format!(
            "{}.{}.{}",
            self.action.as_str(),
            self.target.as_str(),
            self.range.as_str()
        )
    }

    /// Decodes a stored claim value.
    ///
    /// Accepts the tagged form `update.post.own` and the compact numeric
    /// triple `2:4:0` written by earlier releases.
    pub fn from_claim_value(value: &str) -> AppResult<Self> {
        let value = value.trim();

        if value.contains(':') {
            return Self::from_numeric_claim(value);
        }

        let mut parts = value.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(action), Some(target), Some(range), None) => Ok(Self::new(
                action.parse()?,
                target.parse()?,
                range.parse()?,
            )),
            _ => Err(AppError::Validation(format!(
                "permission claim '{value}' must have the form 'action.target.range'"
            ))),
        }
    }

    /// Returns the compact numeric claim encoding, e.g. `2:4:0`.
    #[must_use]
    pub fn to_numeric_claim(&self) -> String {
        format!(
            "{}:{}:{}",
            self.action.code(),
            self.target.code(),
            self.range.code()
        )
    }

    fn from_numeric_claim(value: &str) -> AppResult<Self> {
        let invalid = || {
            AppError::Validation(format!(
                "numeric permission claim '{value}' is malformed"
            ))
        };

        let codes = value
            .split(':')
            .map(|part| part.parse::<u8>().map_err(|_| invalid()))
            .collect::<AppResult<Vec<_>>>()?;

        let [action, target, range] = codes.as_slice() else {
            return Err(invalid());
        };

        Ok(Self::new(
            PermissionAction::from_code(*action).ok_or_else(invalid)?,
            PermissionTarget::from_code(*target).ok_or_else(invalid)?,
            PermissionRange::from_code(*range).ok_or_else(invalid)?,
        ))
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.to_claim_value().as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_claim_value(value)
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a custom role is created.
    SecurityRoleCreated,
    /// Emitted when a custom role is deleted.
    SecurityRoleDeleted,
    /// Emitted when a role is assigned to a user.
    SecurityRoleAssigned,
    /// Emitted when a role is removed from a user.
    SecurityRoleUnassigned,
    /// Emitted when a permission claim is added to a role.
    SecurityPermissionAdded,
    /// Emitted when a permission claim is removed from a role.
    SecurityPermissionRemoved,
    /// Emitted when a post is deleted.
    ContentPostDeleted,
    /// Emitted when a comment is deleted.
    ContentCommentDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecurityRoleCreated => "security.role.created",
            Self::SecurityRoleDeleted => "security.role.deleted",
            Self::SecurityRoleAssigned => "security.role.assigned",
            Self::SecurityRoleUnassigned => "security.role.unassigned",
            Self::SecurityPermissionAdded => "security.permission.added",
            Self::SecurityPermissionRemoved => "security.permission.removed",
            Self::ContentPostDeleted => "content.post.deleted",
            Self::ContentCommentDeleted => "content.comment.deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::{Permission, PermissionAction, PermissionRange, PermissionTarget};

    fn permission_strategy() -> impl Strategy<Value = Permission> {
        (
            prop::sample::select(PermissionAction::all().to_vec()),
            prop::sample::select(PermissionTarget::all().to_vec()),
            prop::sample::select(PermissionRange::all().to_vec()),
        )
            .prop_map(|(action, target, range)| Permission::new(action, target, range))
    }

    #[test]
    fn claim_value_uses_dotted_tags() {
        let permission = Permission::new(
            PermissionAction::Update,
            PermissionTarget::Post,
            PermissionRange::Own,
        );

        assert_eq!(permission.to_claim_value(), "update.post.own");
    }

    #[test]
    fn numeric_claim_is_accepted() {
        let restored = Permission::from_claim_value("3:5:1");

        assert_eq!(
            restored.ok(),
            Some(Permission::new(
                PermissionAction::Delete,
                PermissionTarget::Comment,
                PermissionRange::All,
            ))
        );
    }

    #[test]
    fn malformed_claims_are_rejected() {
        for value in [
            "",
            "update.post",
            "update.post.own.extra",
            "update.blog.own",
            "9:0:0",
            "1:2",
            "a:b:c",
        ] {
            assert!(
                Permission::from_claim_value(value).is_err(),
                "claim '{value}' should be rejected"
            );
        }
    }

    #[test]
    fn structurally_equal_permissions_are_equal() {
        let left = Permission::from_str("read.tag.all");
        let right = Permission::from_str("1:3:1");

        assert!(left.is_ok());
        assert_eq!(left.ok(), right.ok());
    }

    proptest! {
        #[test]
        fn every_permission_decodes_from_both_claim_forms(permission in permission_strategy()) {
            prop_assert_eq!(
                Permission::from_claim_value(permission.to_claim_value().as_str()).ok(),
                Some(permission)
            );
            prop_assert_eq!(
                Permission::from_claim_value(permission.to_numeric_claim().as_str()).ok(),
                Some(permission)
            );
        }
    }
}
