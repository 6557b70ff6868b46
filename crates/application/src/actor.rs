use std::collections::BTreeSet;

use inkpost_core::UserIdentity;
use inkpost_domain::{RoleId, UserId};

/// Authenticated caller passed explicitly into every authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    identity: UserIdentity,
    roles: BTreeSet<RoleId>,
}

impl Actor {
    /// Creates an actor from a session identity and the roles it currently holds.
    #[must_use]
    pub fn new(identity: UserIdentity, roles: impl IntoIterator<Item = RoleId>) -> Self {
        Self {
            identity,
            roles: roles.into_iter().collect(),
        }
    }

    /// Returns the underlying session identity.
    #[must_use]
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Returns the raw subject, used for audit records.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.identity.subject()
    }

    /// Returns the parsed user id, or `None` for a malformed subject.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.identity.subject().parse().ok()
    }

    /// Returns the roles held by the actor.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<RoleId> {
        &self.roles
    }
}
