use crate::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_USERS_FILE: &str = "users.txt";

pub struct Config {
    /// Location of the user store.
    pub users_file: PathBuf,
    /// Treat a freshly registered user as logged in.
    pub auto_login_after_register: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users_file: PathBuf::from(DEFAULT_USERS_FILE),
            auto_login_after_register: true,
        }
    }
}

impl Config {
    /// Reads `USERS_FILE` and `AUTO_LOGIN_AFTER_REGISTER`, falling back to the defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let users_file = env::var("USERS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.users_file);

        let auto_login_after_register = match env::var("AUTO_LOGIN_AFTER_REGISTER") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!(
                    "AUTO_LOGIN_AFTER_REGISTER must be true or false, got {:?}",
                    raw
                ))
            })?,
            Err(_) => defaults.auto_login_after_register,
        };

        Ok(Self {
            users_file,
            auto_login_after_register,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
