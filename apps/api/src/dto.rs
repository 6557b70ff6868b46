mod common;
mod content;
mod security;

pub use common::{HealthResponse, UserIdentityResponse};
pub use content::{
    AccountResponse, CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse,
    PostResponse, UpdatePostRequest,
};
pub use security::{
    AddPermissionRequest, AssignRoleRequest, CreateRoleRequest, PermissionResponse,
    RemoveRoleAssignmentRequest, RoleAssignmentResponse, RoleResponse,
};

#[cfg(test)]
mod tests {
    use super::{
        AccountResponse, AddPermissionRequest, AssignRoleRequest, CommentResponse,
        CreateCommentRequest, CreatePostRequest, CreateRoleRequest, HealthResponse, LikeResponse,
        PermissionResponse, PostResponse, RemoveRoleAssignmentRequest, RoleAssignmentResponse,
        RoleResponse, UpdatePostRequest, UserIdentityResponse,
    };

    use std::collections::BTreeSet;

    use inkpost_application::{Actor, CreatePostInput, RoleDefinition};
    use inkpost_core::{AppError, UserIdentity};
    use inkpost_domain::{
        Comment, CommentId, Permission, PermissionAction, PermissionRange, PermissionTarget,
        PostId, RoleId, UserId,
    };
    use ts_rs::Config;
    use ts_rs::TS;

    use crate::error::ErrorResponse;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        AccountResponse::export(&config)?;
        AddPermissionRequest::export(&config)?;
        AssignRoleRequest::export(&config)?;
        CommentResponse::export(&config)?;
        CreateCommentRequest::export(&config)?;
        CreatePostRequest::export(&config)?;
        CreateRoleRequest::export(&config)?;
        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;
        LikeResponse::export(&config)?;
        PermissionResponse::export(&config)?;
        PostResponse::export(&config)?;
        RemoveRoleAssignmentRequest::export(&config)?;
        RoleAssignmentResponse::export(&config)?;
        RoleResponse::export(&config)?;
        UpdatePostRequest::export(&config)?;
        UserIdentityResponse::export(&config)?;

        Ok(())
    }

    #[test]
    fn add_permission_request_accepts_tagged_and_numeric_claims() {
        let tagged = AddPermissionRequest {
            permission: "update.post.own".to_owned(),
        };
        let numeric = AddPermissionRequest {
            permission: Permission::new(
                PermissionAction::Update,
                PermissionTarget::Post,
                PermissionRange::Own,
            )
            .to_numeric_claim(),
        };

        assert_eq!(tagged.permission().ok(), numeric.permission().ok());
        assert!(tagged.permission().is_ok());
    }

    #[test]
    fn add_permission_request_rejects_unknown_tags() {
        let request = AddPermissionRequest {
            permission: "publish.post.all".to_owned(),
        };

        assert!(matches!(request.permission(), Err(AppError::Validation(_))));
    }

    #[test]
    fn assign_role_request_parses_identifiers() {
        let user_id = UserId::new();
        let role_id = RoleId::new();
        let request = AssignRoleRequest {
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        };

        assert_eq!(request.identifiers().ok(), Some((user_id, role_id)));

        let malformed = RemoveRoleAssignmentRequest {
            user_id: "not-a-uuid".to_owned(),
            role_id: role_id.to_string(),
        };
        assert!(matches!(
            malformed.identifiers(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn role_response_lists_permission_tags_in_order() {
        let response = RoleResponse::from(RoleDefinition {
            role_id: RoleId::new(),
            name: "Moderator".to_owned(),
            is_system: false,
            permissions: vec![
                Permission::new(
                    PermissionAction::Read,
                    PermissionTarget::Post,
                    PermissionRange::All,
                ),
                Permission::new(
                    PermissionAction::Delete,
                    PermissionTarget::Comment,
                    PermissionRange::Own,
                ),
            ],
        });

        assert_eq!(
            response.permissions,
            vec!["read.post.all".to_owned(), "delete.comment.own".to_owned()]
        );
    }

    #[test]
    fn create_post_request_converts_to_input() {
        let input = CreatePostInput::from(CreatePostRequest {
            title: "Hello".to_owned(),
            body: "First post".to_owned(),
        });

        assert_eq!(input.title, "Hello");
        assert_eq!(input.body, "First post");
    }

    #[test]
    fn orphaned_comment_response_has_no_author() {
        let comment = Comment::new(CommentId::new(), PostId::new(), None, "left behind")
            .unwrap_or_else(|_| unreachable!());

        let response = CommentResponse::from(comment);

        assert_eq!(response.author_id, None);
        assert_eq!(response.body, "left behind");
    }

    #[test]
    fn identity_response_carries_effective_permission_tags() {
        let user_id = UserId::new();
        let actor = Actor::new(UserIdentity::new(user_id.to_string(), "Ada", None), []);
        let permissions = BTreeSet::from([Permission::new(
            PermissionAction::Create,
            PermissionTarget::Comment,
            PermissionRange::Own,
        )]);

        let response = UserIdentityResponse::from_actor_with_permissions(&actor, permissions);

        assert_eq!(response.subject, user_id.to_string());
        assert_eq!(response.display_name, "Ada");
        assert_eq!(response.permissions, vec!["create.comment.own".to_owned()]);
    }
}
