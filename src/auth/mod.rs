pub mod password;
pub mod session;

use validator::Validate;

use crate::validation::{check_email, check_password, check_username};

// Re-export necessary items
pub use password::verify_password;
pub use session::AuthManager;

/// Fields collected by the registration screen.
#[derive(Debug, Clone, Validate)]
pub struct RegisterRequest {
    /// 3-20 characters, starts with a letter, then letters, digits or underscores.
    #[validate(custom = "check_username")]
    pub username: String,
    /// 8-50 characters with upper, lower, digit and symbol; no whitespace.
    #[validate(custom = "check_password")]
    pub password: String,
    /// Must be unique across the store as well as well-formed.
    #[validate(custom = "check_email")]
    pub email: String,
}

/// Profile edit for the logged-in user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileUpdate {
    #[validate(custom = "check_email")]
    pub email: Option<String>,
    #[validate(custom = "check_username")]
    pub username: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none()
    }
}
