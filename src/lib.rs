#![doc = "The `userlogin` library crate."]
#![doc = ""]
#![doc = "This crate contains the flat-file user store, field validation, the single-session"]
#![doc = "authentication manager, error handling and the console menus of the login system."]
#![doc = "It is used by the main binary (`main.rs`) to wire configuration and the console together."]

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

pub use crate::auth::AuthManager;
pub use crate::error::AppError;
pub use crate::models::UserRecord;
pub use crate::repository::UserRepository;
