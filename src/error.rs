//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the crate.
//! Every fallible operation of the validation, repository and session layers returns
//! an `AppError`; nothing below the console ever panics or exits the process.
//!
//! `AppError` provides `From` implementations for `std::io::Error` and
//! `validator::ValidationErrors`, so both convert with the `?` operator.

use std::fmt;
use std::io;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the crate.
#[derive(Debug)]
pub enum AppError {
    /// A field failed its validation rules. Recoverable by asking again.
    Validation(String),
    /// The email is already used by another record.
    DuplicateEmail(String),
    /// The username is already used by another record.
    DuplicateUsername(String),
    /// The record addressed by a read, update or remove does not exist.
    NotFound(String),
    /// Username and password did not match any record.
    /// Deliberately carries no detail about which of the two was wrong.
    InvalidCredentials,
    /// An account operation was attempted without an active session.
    NotLoggedIn,
    /// A line of the store could not be parsed into a record.
    CorruptRecord { line: usize, reason: String },
    /// A configuration value could not be interpreted.
    Config(String),
    /// The store could not be read, written or replaced.
    /// The store keeps its previous content whenever this is returned.
    Io(io::Error),
}

impl AppError {
    /// Returns `true` when the caller can simply re-prompt and try again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            AppError::Io(_) | AppError::CorruptRecord { .. } | AppError::Config(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DuplicateEmail(email) => write!(f, "Email already registered: {}", email),
            AppError::DuplicateUsername(name) => write!(f, "Username already taken: {}", name),
            AppError::NotFound(what) => write!(f, "Not Found: {}", what),
            AppError::InvalidCredentials => write!(f, "Invalid username or password"),
            AppError::NotLoggedIn => write!(f, "No user is logged in"),
            AppError::CorruptRecord { line, reason } => {
                write!(f, "Corrupt record on line {}: {}", line, reason)
            }
            AppError::Config(msg) => write!(f, "Configuration Error: {}", msg),
            AppError::Io(e) => write!(f, "I/O Error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Converts `std::io::Error` into `AppError::Io`.
impl From<io::Error> for AppError {
    fn from(error: io::Error) -> AppError {
        AppError::Io(error)
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}
