//! Interactive menus on top of `AuthManager`.
//!
//! The console only collects and displays; validation, uniqueness and persistence all
//! happen below it. It is generic over its input and output so whole sessions can be
//! scripted in tests.

pub mod prompt;
pub mod screens;

use log::error;
use std::io::{self, BufRead, Write};

use crate::auth::{AuthManager, ProfileUpdate, RegisterRequest};
use crate::error::AppError;
use crate::repository::Storage;
use crate::validation::Field;

pub use prompt::Prompter;

pub struct Console<S: Storage, R, W> {
    auth: AuthManager<S>,
    prompt: Prompter<R, W>,
}

impl<S: Storage, R: BufRead, W: Write> Console<S, R, W> {
    pub fn new(auth: AuthManager<S>, input: R, output: W) -> Self {
        Self {
            auth,
            prompt: Prompter::new(input, output),
        }
    }

    pub fn into_parts(self) -> (AuthManager<S>, W) {
        (self.auth, self.prompt.into_output())
    }

    /// Runs the menus until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        match self.main_loop() {
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
            other => other?,
        }
        self.auth.logout();
        screens::info(self.prompt.output(), "Thank you for using the system. Goodbye!")
    }

    fn main_loop(&mut self) -> io::Result<()> {
        loop {
            screens::initial_menu(self.prompt.output())?;
            match self.prompt.menu_choice(1..=3)? {
                1 => self.login()?,
                2 => self.register()?,
                _ => return Ok(()),
            }
        }
    }

    /// Prints an error outcome. I/O failures are also logged, since they mean the
    /// store could not be changed.
    fn report(&mut self, err: &AppError) -> io::Result<()> {
        if !err.is_recoverable() {
            error!("Operation failed: {}", err);
        }
        let message = match err {
            AppError::InvalidCredentials => "Invalid username or password.".to_string(),
            AppError::DuplicateEmail(_) => {
                "Email already registered. Please use a different email or login.".to_string()
            }
            AppError::DuplicateUsername(_) => {
                "Username already taken. Please choose a different username.".to_string()
            }
            other => other.to_string(),
        };
        screens::error(self.prompt.output(), &message)
    }

    fn login(&mut self) -> io::Result<()> {
        screens::header(self.prompt.output(), "LOGIN")?;
        let username = self.prompt.line("\nEnter Username: ")?;
        let password = self.prompt.secret("Enter Password: ")?;

        match self.auth.login(&username, &password) {
            Ok(_) => {
                screens::success(self.prompt.output(), "Login successful!")?;
                self.session_loop()
            }
            Err(e) => self.report(&e),
        }
    }

    fn register(&mut self) -> io::Result<()> {
        screens::header(self.prompt.output(), "REGISTRATION")?;

        let email = self.prompt.valid_field("\nEnter Email: ", Field::Email)?;
        if self.taken(&email, AppError::DuplicateEmail(email.clone()))? {
            return Ok(());
        }

        let username = self.prompt.valid_field("Enter Username: ", Field::Username)?;
        if self.taken(&username, AppError::DuplicateUsername(username.clone()))? {
            return Ok(());
        }

        let password = self.prompt.valid_field("Enter Password: ", Field::Password)?;
        let confirm = self.prompt.secret("Confirm Password: ")?;
        if password != confirm {
            return screens::error(self.prompt.output(), "Passwords do not match!");
        }

        let request = RegisterRequest {
            username,
            password,
            email,
        };
        match self.auth.register(request) {
            Ok(_) if self.auth.is_logged_in() => {
                screens::success(self.prompt.output(), "Registration successful! Welcome!")?;
                self.session_loop()
            }
            Ok(_) => screens::success(
                self.prompt.output(),
                "Registration successful! You can now login.",
            ),
            Err(e) => self.report(&e),
        }
    }

    /// Early uniqueness feedback during registration; the repository checks again on create.
    fn taken(&mut self, key: &str, duplicate: AppError) -> io::Result<bool> {
        match self.auth.repository().exists(key) {
            Ok(false) => Ok(false),
            Ok(true) => self.report(&duplicate).map(|_| true),
            Err(e) => self.report(&e).map(|_| true),
        }
    }

    fn session_loop(&mut self) -> io::Result<()> {
        while let Some(user) = self.auth.current_user() {
            let username = user.username.clone();
            screens::session_menu(self.prompt.output(), &username)?;

            match self.prompt.menu_choice(1..=5)? {
                1 => {
                    if let Some(user) = self.auth.current_user().cloned() {
                        screens::profile(self.prompt.output(), &user)?;
                    }
                }
                2 => self.edit_profile()?,
                3 => self.change_password()?,
                4 => {
                    if self.prompt.confirm("delete your account")? {
                        match self.auth.delete_account() {
                            Ok(()) => screens::success(
                                self.prompt.output(),
                                "Account deleted successfully.",
                            )?,
                            Err(e) => self.report(&e)?,
                        }
                    }
                }
                _ => {
                    self.auth.logout();
                    screens::success(self.prompt.output(), "Logged out successfully!")?;
                }
            }
        }
        Ok(())
    }

    fn edit_profile(&mut self) -> io::Result<()> {
        screens::edit_menu(self.prompt.output())?;
        let changes = match self.prompt.menu_choice(1..=3)? {
            1 => ProfileUpdate {
                email: Some(self.prompt.valid_field("\nEnter new Email: ", Field::Email)?),
                username: None,
            },
            2 => ProfileUpdate {
                email: None,
                username: Some(
                    self.prompt
                        .valid_field("\nEnter new Username: ", Field::Username)?,
                ),
            },
            _ => return screens::info(self.prompt.output(), "Cancelled."),
        };

        match self.auth.update_profile(changes) {
            Ok(_) => screens::success(self.prompt.output(), "Information updated successfully!"),
            Err(e) => self.report(&e),
        }
    }

    fn change_password(&mut self) -> io::Result<()> {
        screens::header(self.prompt.output(), "CHANGE PASSWORD")?;

        let current = self.prompt.secret("\nEnter current password: ")?;
        let matches = self
            .auth
            .current_user()
            .map(|user| crate::auth::verify_password(&current, &user.password))
            .unwrap_or(false);
        if !matches {
            return screens::error(self.prompt.output(), "Incorrect current password!");
        }

        let new_password = self
            .prompt
            .valid_field("Enter new password: ", Field::Password)?;
        let confirm = self.prompt.secret("Confirm new password: ")?;
        if new_password != confirm {
            return screens::error(self.prompt.output(), "Passwords do not match!");
        }

        match self.auth.change_password(&current, &new_password) {
            Ok(()) => screens::success(self.prompt.output(), "Password changed successfully!"),
            Err(e) => self.report(&e),
        }
    }
}
