use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt;

use crate::error::AppError;

/// Format of `created_at` / `last_login` in the store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DELIMITER: char = ',';
const FIELD_COUNT: usize = 6;

/// Current local time truncated to whole seconds, the precision the store keeps.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// A persisted user.
///
/// Stored as one line: `id,email,username,password,createdAt,lastLogin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u32,
    pub email: String,
    pub username: String,
    pub password: String,
    pub created_at: NaiveDateTime,
    pub last_login: NaiveDateTime,
}

/// Candidate fields for a record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserRecord {
    /// Builds a record from registration fields; id and timestamps are placeholders
    /// until the repository assigns them.
    pub fn new(input: NewUser) -> Self {
        let now = now_timestamp();
        Self {
            id: 0,
            email: input.email,
            username: input.username,
            password: input.password,
            created_at: now,
            last_login: now,
        }
    }

    /// Serializes the record without the trailing newline.
    ///
    /// Ids start at 1, so an unassigned record is refused; see [`UserRecord::check_fields`]
    /// for the text fields.
    pub fn to_line(&self) -> Result<String, AppError> {
        if self.id == 0 {
            return Err(AppError::Validation("id must be positive".into()));
        }
        self.check_fields()?;

        Ok(format!(
            "{},{},{},{},{},{}",
            self.id,
            self.email,
            self.username,
            self.password,
            self.created_at.format(TIMESTAMP_FORMAT),
            self.last_login.format(TIMESTAMP_FORMAT),
        ))
    }

    /// The format has no escaping, so a text field holding the delimiter or a line
    /// break is refused rather than written.
    pub fn check_fields(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("email", &self.email),
            ("username", &self.username),
            ("password", &self.password),
        ] {
            if value.contains([DELIMITER, '\n', '\r']) {
                return Err(AppError::Validation(format!(
                    "{} must not contain commas or line breaks",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Parses one store line. `line_no` is 1-based and only used for error reporting.
    pub fn from_line(line: &str, line_no: usize) -> Result<Self, AppError> {
        let corrupt = |reason: String| AppError::CorruptRecord {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(corrupt(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let id = parse_id(fields[0]).map_err(corrupt)?;
        let created_at = parse_timestamp(fields[4]).map_err(corrupt)?;
        let last_login = parse_timestamp(fields[5]).map_err(corrupt)?;

        Ok(Self {
            id,
            email: fields[1].to_string(),
            username: fields[2].to_string(),
            password: fields[3].to_string(),
            created_at,
            last_login,
        })
    }
}

/// Reads only the leading id field of a line, for id allocation.
pub fn parse_id(field: &str) -> Result<u32, String> {
    let raw = field.split(DELIMITER).next().unwrap_or_default();
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("id must be positive".to_string()),
        Ok(id) => Ok(id),
        Err(e) => Err(format!("invalid id {:?}: {}", raw, e)),
    }
}

fn parse_timestamp(field: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .map_err(|e| format!("invalid timestamp {:?}: {}", field, e))
}

impl fmt::Display for UserRecord {
    /// Profile view with the password masked, one `*` per character.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  ID:              {}", self.id)?;
        writeln!(f, "  Email:           {}", self.email)?;
        writeln!(f, "  Username:        {}", self.username)?;
        writeln!(
            f,
            "  Password:        {} (hidden)",
            "*".repeat(self.password.chars().count())
        )?;
        writeln!(
            f,
            "  Account Created: {}",
            self.created_at.format(TIMESTAMP_FORMAT)
        )?;
        write!(
            f,
            "  Last Login:      {}",
            self.last_login.format(TIMESTAMP_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> UserRecord {
        let at = NaiveDateTime::parse_from_str("2025-01-31 08:15:00", TIMESTAMP_FORMAT).unwrap();
        UserRecord {
            id: 7,
            email: "a@b.co".to_string(),
            username: "alice".to_string(),
            password: "Abcdef1!".to_string(),
            created_at: at,
            last_login: at,
        }
    }

    #[test]
    fn test_line_format() {
        assert_eq!(
            sample().to_line().unwrap(),
            "7,a@b.co,alice,Abcdef1!,2025-01-31 08:15:00,2025-01-31 08:15:00"
        );
    }

    #[test]
    fn test_round_trip() {
        let record = sample();
        let line = record.to_line().unwrap();
        assert_eq!(UserRecord::from_line(&line, 1).unwrap(), record);

        // Freshly stamped records survive the second-precision format too.
        let mut fresh = UserRecord::new(NewUser {
            username: "bob".into(),
            email: "bob@x.io".into(),
            password: "Qwerty1?".into(),
        });
        fresh.id = 1;
        let parsed = UserRecord::from_line(&fresh.to_line().unwrap(), 1).unwrap();
        assert_eq!(parsed, fresh);
    }

    #[test]
    fn test_delimiter_refused() {
        let mut record = sample();
        record.password = "Abc,def1!".to_string();
        assert!(matches!(record.to_line(), Err(AppError::Validation(_))));

        let mut record = sample();
        record.email = "a@b.co\n8,x@y.z".to_string();
        assert!(matches!(record.to_line(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_unassigned_id_refused() {
        let fresh = UserRecord::new(NewUser {
            username: "bob".into(),
            email: "bob@x.io".into(),
            password: "Qwerty1?".into(),
        });
        assert_eq!(fresh.id, 0);
        assert!(fresh.check_fields().is_ok());
        match fresh.to_line() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("id")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_lines() {
        match UserRecord::from_line("1,a@b.co,alice,Abcdef1!", 4) {
            Err(AppError::CorruptRecord { line, reason }) => {
                assert_eq!(line, 4);
                assert!(reason.contains("expected 6 fields"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(UserRecord::from_line(
            "x,a@b.co,alice,Abcdef1!,2025-01-31 08:15:00,2025-01-31 08:15:00",
            1
        )
        .is_err());
        assert!(UserRecord::from_line(
            "0,a@b.co,alice,Abcdef1!,2025-01-31 08:15:00,2025-01-31 08:15:00",
            1
        )
        .is_err());
        assert!(UserRecord::from_line("1,a@b.co,alice,Abcdef1!,yesterday,today", 1).is_err());
    }

    #[test]
    fn test_display_masks_password() {
        let shown = sample().to_string();
        assert!(shown.contains("******** (hidden)"));
        assert!(!shown.contains("Abcdef1!"));
        assert!(shown.contains("Account Created: 2025-01-31 08:15:00"));
    }
}
