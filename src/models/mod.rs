pub mod user;

pub use user::{now_timestamp, NewUser, UserRecord, TIMESTAMP_FORMAT};
