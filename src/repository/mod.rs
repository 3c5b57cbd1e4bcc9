//! The user store.
//!
//! `UserRepository` exclusively owns the store path. Reads scan the whole file; every
//! structural change (edit, delete, login stamp) regenerates the full file into a
//! sibling `.tmp` file and renames it over the original, so a reader never sees a
//! half-written store. Creation appends a single line.
//!
//! The store assumes a single process. Two processes sharing one path can lose each
//! other's updates; nothing here locks the file.

pub mod storage;

use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use crate::auth::password::verify_password;
use crate::error::AppError;
use crate::models::user::parse_id;
use crate::models::{now_timestamp, UserRecord};

pub use storage::{DiskStorage, Storage};

/// How a lookup key is matched: emails always contain `@`, usernames never do.
fn matches_key(record: &UserRecord, key: &str) -> bool {
    if key.contains('@') {
        record.email == key
    } else {
        record.username == key
    }
}

/// Non-empty lines of the store with their 1-based line numbers.
fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Line ending the store already uses, judged by its first line.
fn line_ending(content: &str) -> &'static str {
    match content.find('\n') {
        Some(pos) if content[..pos].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

/// Rebuilds the store with the record at `target` (counted over non-blank lines)
/// replaced, or dropped when `replacement` is `None`. Every other raw line is copied
/// byte for byte, terminator and blank lines included.
fn rewrite(content: &str, target: usize, replacement: Option<&str>) -> String {
    let mut output =
        String::with_capacity(content.len() + replacement.map_or(0, |line| line.len()));
    let mut record_idx = 0;

    for raw in content.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            output.push_str(raw);
            continue;
        }

        if record_idx != target {
            output.push_str(raw);
        } else if let Some(new_line) = replacement {
            output.push_str(new_line);
            output.push_str(&raw[line.len()..]);
        }
        record_idx += 1;
    }
    output
}

pub struct UserRepository<S: Storage = DiskStorage> {
    path: PathBuf,
    storage: S,
}

impl UserRepository<DiskStorage> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_storage(path, DiskStorage)
    }
}

impl<S: Storage> UserRepository<S> {
    pub fn with_storage(path: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            path: path.into(),
            storage,
        }
    }

    /// Sibling path the rewrite protocol writes to before renaming.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_content(&self) -> Result<String, AppError> {
        Ok(self.storage.read(&self.path)?.unwrap_or_default())
    }

    /// Parses every record. A repeated id, email or username means the file was edited
    /// by hand into a state the store can never produce, and is reported as corrupt.
    fn parse_all(content: &str) -> Result<Vec<UserRecord>, AppError> {
        let mut records = Vec::new();
        let mut ids = HashSet::new();
        let mut emails = HashSet::new();
        let mut usernames = HashSet::new();

        for (line_no, line) in numbered_lines(content) {
            let record = UserRecord::from_line(line, line_no)?;

            let repeated = if !ids.insert(record.id) {
                Some(format!("duplicate id {}", record.id))
            } else if !emails.insert(record.email.clone()) {
                Some(format!("duplicate email {}", record.email))
            } else if !usernames.insert(record.username.clone()) {
                Some(format!("duplicate username {}", record.username))
            } else {
                None
            };
            if let Some(reason) = repeated {
                return Err(AppError::CorruptRecord {
                    line: line_no,
                    reason,
                });
            }

            records.push(record);
        }
        Ok(records)
    }

    fn load(&self) -> Result<Vec<UserRecord>, AppError> {
        let records = Self::parse_all(&self.read_content()?)?;
        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Id of the last line plus one, or 1 for an empty store.
    fn next_id_in(content: &str) -> Result<u32, AppError> {
        let Some((line_no, last)) = numbered_lines(content).last() else {
            return Ok(1);
        };

        let id = parse_id(last).map_err(|reason| AppError::CorruptRecord {
            line: line_no,
            reason,
        })?;

        id.checked_add(1).ok_or_else(|| AppError::CorruptRecord {
            line: line_no,
            reason: "no ids left after this record".to_string(),
        })
    }

    /// Writes `content` to the temp path and renames it over the store.
    /// On failure the temp file is cleaned up and the store is left as it was.
    fn replace_content(&self, content: &str) -> Result<(), AppError> {
        let tmp = self.temp_path();

        let result = self
            .storage
            .write(&tmp, content)
            .and_then(|_| self.storage.rename(&tmp, &self.path));

        if let Err(e) = result {
            error!(
                "Failed to rewrite {} via {}: {}",
                self.path.display(),
                tmp.display(),
                e
            );
            match self.storage.remove(&tmp) {
                Ok(()) => {}
                Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
                Err(cleanup) => warn!("Could not remove {}: {}", tmp.display(), cleanup),
            }
            return Err(AppError::Io(e));
        }

        Ok(())
    }

    /// Stores a new record.
    ///
    /// Uniqueness is checked against the store as it is right now. The record gets the
    /// next id and fresh `created_at`/`last_login` stamps, then exactly one line is
    /// appended with the store's own line ending. Nothing is written on failure.
    pub fn create(&self, record: UserRecord) -> Result<UserRecord, AppError> {
        // Refuse unrepresentable fields before touching the store.
        record.check_fields()?;

        let content = self.read_content()?;
        let existing = Self::parse_all(&content)?;

        if existing.iter().any(|r| r.email == record.email) {
            return Err(AppError::DuplicateEmail(record.email));
        }
        if existing.iter().any(|r| r.username == record.username) {
            return Err(AppError::DuplicateUsername(record.username));
        }

        let now = now_timestamp();
        let stored = UserRecord {
            id: Self::next_id_in(&content)?,
            created_at: now,
            last_login: now,
            ..record
        };

        let ending = line_ending(&content);
        let mut line = String::new();
        if !content.is_empty() && !content.ends_with('\n') {
            line.push_str(ending);
        }
        line.push_str(&stored.to_line()?);
        line.push_str(ending);

        self.storage.append(&self.path, &line)?;
        info!("Created user {} with id {}", stored.username, stored.id);
        Ok(stored)
    }

    pub fn read(&self, username: &str) -> Result<UserRecord, AppError> {
        self.load()?
            .into_iter()
            .find(|r| r.username == username)
            .ok_or_else(|| AppError::NotFound(format!("user {}", username)))
    }

    pub fn find_by_email(&self, email: &str) -> Result<UserRecord, AppError> {
        self.load()?
            .into_iter()
            .find(|r| r.email == email)
            .ok_or_else(|| AppError::NotFound(format!("user with email {}", email)))
    }

    /// All records in file (insertion) order.
    pub fn get_all(&self) -> Result<Vec<UserRecord>, AppError> {
        self.load()
    }

    /// Replaces the record whose email is `previous_email`.
    ///
    /// The caller passes the old email explicitly because the email may be the field
    /// that changed. The id is kept from the stored record. Every other line is written
    /// back verbatim. Returns the record as stored.
    pub fn update(
        &self,
        record: &UserRecord,
        previous_email: &str,
    ) -> Result<UserRecord, AppError> {
        let content = self.read_content()?;
        let records = Self::parse_all(&content)?;

        let target = records
            .iter()
            .position(|r| r.email == previous_email)
            .ok_or_else(|| AppError::NotFound(format!("user with email {}", previous_email)))?;

        for (idx, other) in records.iter().enumerate() {
            if idx == target {
                continue;
            }
            if other.email == record.email {
                return Err(AppError::DuplicateEmail(record.email.clone()));
            }
            if other.username == record.username {
                return Err(AppError::DuplicateUsername(record.username.clone()));
            }
        }

        let stored = UserRecord {
            id: records[target].id,
            ..record.clone()
        };
        let replacement = stored.to_line()?;

        self.replace_content(&rewrite(&content, target, Some(&replacement)))?;
        info!("Updated user {} (id {})", stored.username, stored.id);
        Ok(stored)
    }

    /// Removes the record with the given username or email.
    ///
    /// Returns `false` without touching the store when no record matches, so removing
    /// twice is harmless.
    pub fn remove(&self, key: &str) -> Result<bool, AppError> {
        let content = self.read_content()?;
        let records = Self::parse_all(&content)?;

        let Some(target) = records.iter().position(|r| matches_key(r, key)) else {
            debug!("Nothing to remove for {}", key);
            return Ok(false);
        };

        self.replace_content(&rewrite(&content, target, None))?;
        info!("Removed user {} (id {})", records[target].username, records[target].id);
        Ok(true)
    }

    /// Whether a record with this username or email exists.
    pub fn exists(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.load()?.iter().any(|r| matches_key(r, key)))
    }

    pub fn count(&self) -> Result<usize, AppError> {
        Ok(self.load()?.len())
    }

    /// The id the next created record will receive.
    ///
    /// Derived from the last line of the file, not from the largest id, so removing an
    /// earlier record never frees its id.
    pub fn next_id(&self) -> Result<u32, AppError> {
        Self::next_id_in(&self.read_content()?)
    }

    /// Finds the record whose username and password both match exactly.
    pub fn validate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserRecord, AppError> {
        self.load()?
            .into_iter()
            .find(|r| r.username == username && verify_password(password, &r.password))
            .ok_or(AppError::InvalidCredentials)
    }
}
