//! Byte-level access to the store file.
//!
//! The repository performs every file operation through `Storage`, so each call opens
//! and closes its own handle. `DiskStorage` is the real filesystem; tests wrap it to
//! inject failures.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub trait Storage {
    /// Whole file content, or `None` when the file does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<String>>;

    /// Appends `data`, creating the file (and its parent directory) if needed.
    fn append(&self, path: &Path, data: &str) -> io::Result<()>;

    /// Creates or truncates `path` and writes `data` to it, flushed to disk.
    fn write(&self, path: &Path, data: &str) -> io::Result<()>;

    /// Moves `from` onto `to`, replacing `to` in one step.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStorage;

impl DiskStorage {
    fn ensure_parent(path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

impl Storage for DiskStorage {
    fn read(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn append(&self, path: &Path, data: &str) -> io::Result<()> {
        Self::ensure_parent(path)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()
    }

    fn write(&self, path: &Path, data: &str) -> io::Result<()> {
        Self::ensure_parent(path)?;
        let mut file = fs::File::create(path)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage;
        assert_eq!(storage.read(&dir.path().join("absent.txt")).unwrap(), None);
    }

    #[test]
    fn test_append_creates_parent_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("users.txt");
        let storage = DiskStorage;

        storage.append(&path, "one\n").unwrap();
        storage.append(&path, "two\n").unwrap();

        assert_eq!(storage.read(&path).unwrap().as_deref(), Some("one\ntwo\n"));
    }

    #[test]
    fn test_rename_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("users.txt");
        let tmp = dir.path().join("users.txt.tmp");
        let storage = DiskStorage;

        storage.write(&target, "old\n").unwrap();
        storage.write(&tmp, "new\n").unwrap();
        storage.rename(&tmp, &target).unwrap();

        assert_eq!(storage.read(&target).unwrap().as_deref(), Some("new\n"));
        assert_eq!(storage.read(&tmp).unwrap(), None);
    }
}
