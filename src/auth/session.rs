//! The single in-memory session.
//!
//! `AuthManager` owns the repository and at most one logged-in `UserRecord`. The record
//! is an owned copy; the store behind it may be rewritten at any time.

use log::{info, warn};
use validator::Validate;

use super::password::verify_password;
use super::{ProfileUpdate, RegisterRequest};
use crate::config::Config;
use crate::error::AppError;
use crate::models::{now_timestamp, NewUser, UserRecord};
use crate::repository::{DiskStorage, Storage, UserRepository};
use crate::validation::{is_valid_password, Field};

pub struct AuthManager<S: Storage = DiskStorage> {
    repository: UserRepository<S>,
    current: Option<UserRecord>,
    auto_login_after_register: bool,
}

impl AuthManager<DiskStorage> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            UserRepository::new(&config.users_file),
            config.auto_login_after_register,
        )
    }
}

impl<S: Storage> AuthManager<S> {
    pub fn new(repository: UserRepository<S>, auto_login_after_register: bool) -> Self {
        Self {
            repository,
            current: None,
            auto_login_after_register,
        }
    }

    pub fn repository(&self) -> &UserRepository<S> {
        &self.repository
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&UserRecord> {
        self.current.as_ref()
    }

    fn session_user(&self) -> Result<&UserRecord, AppError> {
        self.current.as_ref().ok_or(AppError::NotLoggedIn)
    }

    /// Validates the request and stores a new user.
    ///
    /// With `auto_login_after_register` the new user also becomes the session.
    pub fn register(&mut self, request: RegisterRequest) -> Result<UserRecord, AppError> {
        request.validate()?;

        let created = self.repository.create(UserRecord::new(NewUser {
            username: request.username,
            email: request.email,
            password: request.password,
        }))?;

        if self.auto_login_after_register {
            self.current = Some(created.clone());
        }
        Ok(created)
    }

    /// Starts a session and stamps `last_login`.
    ///
    /// Any failed match is reported as `InvalidCredentials` and leaves no one logged in.
    pub fn login(&mut self, username: &str, password: &str) -> Result<UserRecord, AppError> {
        self.current = None;

        let mut user = match self.repository.validate_credentials(username, password) {
            Ok(user) => user,
            Err(AppError::InvalidCredentials) => {
                warn!("Failed login attempt for {}", username);
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        user.last_login = now_timestamp();
        let stored = self.repository.update(&user, &user.email)?;

        info!("User {} logged in", stored.username);
        self.current = Some(stored.clone());
        Ok(stored)
    }

    /// Clears the session. Returns whether someone was logged in.
    pub fn logout(&mut self) -> bool {
        match self.current.take() {
            Some(user) => {
                info!("User {} logged out", user.username);
                true
            }
            None => false,
        }
    }

    /// Changes the email and/or username of the logged-in user.
    pub fn update_profile(&mut self, changes: ProfileUpdate) -> Result<UserRecord, AppError> {
        let current = self.session_user()?.clone();
        changes.validate()?;

        if changes.is_empty() {
            return Ok(current);
        }

        let mut edited = current.clone();
        if let Some(email) = changes.email {
            edited.email = email;
        }
        if let Some(username) = changes.username {
            edited.username = username;
        }

        let stored = self.repository.update(&edited, &current.email)?;
        self.current = Some(stored.clone());
        Ok(stored)
    }

    /// Replaces the password after checking the current one.
    pub fn change_password(
        &mut self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.session_user()?.clone();

        if !verify_password(current_password, &user.password) {
            return Err(AppError::InvalidCredentials);
        }
        if !is_valid_password(new_password) {
            return Err(AppError::Validation(format!(
                "password: {}",
                Field::Password.requirements()
            )));
        }
        if verify_password(new_password, &user.password) {
            return Err(AppError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let edited = UserRecord {
            password: new_password.to_string(),
            ..user
        };
        let stored = self.repository.update(&edited, &edited.email)?;

        info!("User {} changed password", stored.username);
        self.current = Some(stored);
        Ok(())
    }

    /// Permanently removes the logged-in user and ends the session.
    ///
    /// Confirmation is the caller's job.
    pub fn delete_account(&mut self) -> Result<(), AppError> {
        let user = self.session_user()?.clone();

        if !self.repository.remove(&user.email)? {
            self.current = None;
            return Err(AppError::NotFound(format!("user {}", user.username)));
        }

        info!("User {} deleted their account", user.username);
        self.current = None;
        Ok(())
    }
}
