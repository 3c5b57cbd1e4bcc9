//! Field validation for user input.
//!
//! Pure predicates over candidate usernames, passwords and emails. They hold no state,
//! perform no I/O and report invalid input only through their return value.
//! Each predicate rejects on the cheap length checks before scanning characters.

use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 50;
pub const EMAIL_MAX: usize = 100;

lazy_static::lazy_static! {
    // Leading ASCII letter, then ASCII letters, digits or underscores.
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
}

/// The three user-editable fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
    Email,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::Email => "email",
        }
    }

    /// Hint shown to the user after a rejected entry.
    pub fn requirements(self) -> &'static str {
        match self {
            Field::Username => {
                "3-20 chars, starts with letter, alphanumeric + underscore"
            }
            Field::Password => {
                "8-50 chars, uppercase, lowercase, digit, special char, no spaces"
            }
            Field::Email => "valid@email.com format, max 100 characters",
        }
    }

    pub fn is_valid(self, value: &str) -> bool {
        match self {
            Field::Username => is_valid_username(value),
            Field::Password => is_valid_password(value),
            Field::Email => is_valid_email(value),
        }
    }
}

pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return false;
    }

    USERNAME_REGEX.is_match(username)
}

/// A password needs an uppercase letter, a lowercase letter, a digit and a symbol.
/// Whitespace anywhere rejects the password even when every class is present.
pub fn is_valid_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return false;
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
        if c.is_whitespace() {
            return false;
        } else if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else {
            has_symbol = true;
        }
    }

    has_upper && has_lower && has_digit && has_symbol
}

pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().count() > EMAIL_MAX {
        return false;
    }

    let at = match email.find('@') {
        Some(0) | None => return false,
        Some(at) => at,
    };

    let (local, domain) = (&email[..at], &email[at + 1..]);
    if domain.contains('@') {
        return false;
    }

    // The first dot of the domain may be neither its first nor the email's last character.
    match domain.find('.') {
        None | Some(0) => return false,
        Some(dot) if dot + 1 == domain.len() => return false,
        Some(_) => {}
    }

    if email.chars().any(char::is_whitespace) {
        return false;
    }

    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn to_validation_error(field: Field) -> ValidationError {
    let mut error = ValidationError::new(field.name());
    error.message = Some(Cow::Borrowed(field.requirements()));
    error
}

/// Adapter for `#[validate(custom = "...")]`.
pub fn check_username(username: &str) -> Result<(), ValidationError> {
    if is_valid_username(username) {
        Ok(())
    } else {
        Err(to_validation_error(Field::Username))
    }
}

/// Adapter for `#[validate(custom = "...")]`.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if is_valid_password(password) {
        Ok(())
    } else {
        Err(to_validation_error(Field::Password))
    }
}

/// Adapter for `#[validate(custom = "...")]`.
pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(to_validation_error(Field::Email))
    }
}
