//! Blog content entities and the ownership capability they expose.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use inkpost_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PermissionTarget, UserAccount, UserId};

/// Capability of resources that can be owned by a user.
pub trait OwnedResource {
    /// Returns the owning user, or `None` when the owner is unset.
    fn owner_id(&self) -> Option<UserId>;

    /// Returns whether `actor_id` owns this resource.
    fn is_owned_by(&self, actor_id: UserId) -> bool {
        self.owner_id() == Some(actor_id)
    }
}

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
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

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
                    AppError::Validation(format!(concat!("invalid ", $label, " id '{}': {}"), value, error))
                })
            }
        }
    };
}

content_id!(
    /// Unique identifier for a post.
    PostId,
    "post"
);
content_id!(
    /// Unique identifier for a comment.
    CommentId,
    "comment"
);
content_id!(
    /// Unique identifier for a like.
    LikeId,
    "like"
);

/// Blog post written by an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    author_id: UserId,
    title: NonEmptyString,
    body: String,
}

impl Post {
    /// Creates a validated post.
    pub fn new(
        id: PostId,
        author_id: UserId,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            author_id,
            title: NonEmptyString::new(title)?,
            body: body.into(),
        })
    }

    /// Returns the post identifier.
    #[must_use]
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Returns the post author.
    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the post title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the post body.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Replaces title and body, keeping identity and authorship.
    pub fn revise(&mut self, title: impl Into<String>, body: impl Into<String>) -> AppResult<()> {
        self.title = NonEmptyString::new(title)?;
        self.body = body.into();
        Ok(())
    }
}

impl OwnedResource for Post {
    fn owner_id(&self) -> Option<UserId> {
        Some(self.author_id)
    }
}

/// Comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    post_id: PostId,
    author_id: Option<UserId>,
    body: NonEmptyString,
}

impl Comment {
    /// Creates a validated comment. The author is `None` once the user is gone.
    pub fn new(
        id: CommentId,
        post_id: PostId,
        author_id: Option<UserId>,
        body: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            post_id,
            author_id,
            body: NonEmptyString::new(body)?,
        })
    }

    /// Returns the comment identifier.
    #[must_use]
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the commented post.
    #[must_use]
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Returns the comment author, if still present.
    #[must_use]
    pub fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Returns the comment text.
    #[must_use]
    pub fn body(&self) -> &NonEmptyString {
        &self.body
    }
}

impl OwnedResource for Comment {
    fn owner_id(&self) -> Option<UserId> {
        self.author_id
    }
}

/// Like left by a user on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    id: LikeId,
    post_id: PostId,
    user_id: Option<UserId>,
}

impl Like {
    /// Creates a like. The user is `None` once the user is gone.
    #[must_use]
    pub fn new(id: LikeId, post_id: PostId, user_id: Option<UserId>) -> Self {
        Self {
            id,
            post_id,
            user_id,
        }
    }

    /// Returns the like identifier.
    #[must_use]
    pub fn id(&self) -> LikeId {
        self.id
    }

    /// Returns the liked post.
    #[must_use]
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Returns the liking user, if still present.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

impl OwnedResource for Like {
    fn owner_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Borrowed view of one concrete ownable resource.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// A post.
    Post(&'a Post),
    /// A comment.
    Comment(&'a Comment),
    /// A like.
    Like(&'a Like),
    /// A user profile.
    User(&'a UserAccount),
    /// A user's account settings.
    Account(&'a UserAccount),
}

impl Resource<'_> {
    /// Returns the permission target this resource is checked against.
    #[must_use]
    pub fn target(&self) -> PermissionTarget {
        match self {
            Self::Post(_) => PermissionTarget::Post,
            Self::Comment(_) => PermissionTarget::Comment,
            Self::Like(_) => PermissionTarget::Like,
            Self::User(_) => PermissionTarget::User,
            Self::Account(_) => PermissionTarget::Account,
        }
    }

    /// Returns a stable identifier for logs and audit records.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Post(post) => post.id().to_string(),
            Self::Comment(comment) => comment.id().to_string(),
            Self::Like(like) => like.id().to_string(),
            Self::User(account) | Self::Account(account) => account.id().to_string(),
        }
    }
}
