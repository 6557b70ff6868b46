use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use inkpost_application::Actor;
use inkpost_domain::{CommentId, LikeId, PostId, UserId};

use crate::dto::{
    AccountResponse, CommentResponse, CreateCommentRequest, CreatePostRequest, LikeResponse,
    PostResponse, UpdatePostRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod accounts;
mod comments;
mod likes;
mod posts;

pub use accounts::get_account_handler;
pub use comments::{create_comment_handler, delete_comment_handler};
pub use likes::{like_post_handler, remove_like_handler};
pub use posts::{create_post_handler, delete_post_handler, get_post_handler, update_post_handler};
