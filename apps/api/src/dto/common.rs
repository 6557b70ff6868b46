use std::collections::BTreeSet;

use inkpost_application::Actor;
use inkpost_domain::Permission;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    /// Effective permission tags, e.g. `["create.comment.own", "read.post.all"]`.
    pub permissions: Vec<String>,
}

impl UserIdentityResponse {
    /// Creates a response from the actor and its effective permissions.
    #[must_use]
    pub fn from_actor_with_permissions(actor: &Actor, permissions: BTreeSet<Permission>) -> Self {
        let identity = actor.identity();

        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            permissions: permissions
                .into_iter()
                .map(|permission| permission.to_claim_value())
                .collect(),
        }
    }
}
