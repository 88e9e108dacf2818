mod middleware;
mod password;

pub use middleware::{UserId, reject_anonymous_users};
pub use password::{AuthError, Credentials, compute_password_hash, register_user, validate_credentials};
