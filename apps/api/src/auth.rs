mod bootstrap;
mod session;

pub use bootstrap::bootstrap_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp, checked on every authenticated request.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Upper bound on a session's lifetime regardless of activity.
pub const SESSION_ABSOLUTE_TIMEOUT_SECONDS: i64 = 12 * 60 * 60;
