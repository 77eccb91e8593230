//! Capability interface over the file-system operations the app performs.
//!
//! Everything above this module talks to storage through opaque handles,
//! so the tree, viewer and `.snyk` flows run unchanged against the local
//! disk or an in-memory fake.

mod local;
#[cfg(test)]
pub mod memory;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub use local::LocalStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => f.write_str("directory"),
            EntryKind::File => f.write_str("file"),
        }
    }
}

/// Opaque reference to a directory issued by a [`Storage`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirHandle {
    path: PathBuf,
}

impl DirHandle {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Opaque reference to a file issued by a [`Storage`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryHandle {
    Directory(DirHandle),
    File(FileHandle),
}

/// One immediate child of an enumerated directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub handle: EntryHandle,
}

impl Entry {
    #[cfg(test)]
    pub fn kind(&self) -> EntryKind {
        match self.handle {
            EntryHandle::Directory(_) => EntryKind::Directory,
            EntryHandle::File(_) => EntryKind::File,
        }
    }
}

/// File-system capability consumed by the app.
///
/// Each call is treated as atomic; callers provide ordering, nothing else.
#[cfg_attr(test, mockall::automock)]
pub trait Storage: Send + Sync {
    /// Resolve a user-picked path to a directory handle.
    fn open_directory(&self, path: &Path) -> Result<DirHandle, StorageError>;

    /// List the immediate entries of `dir` in the storage's own order.
    fn entries(&self, dir: &DirHandle) -> Result<Vec<Entry>, StorageError>;

    /// Open the sub-directory `name` of `parent`, creating it when `create` is set.
    fn directory(
        &self,
        parent: &DirHandle,
        name: &str,
        create: bool,
    ) -> Result<DirHandle, StorageError>;

    /// Open the file `name` in `parent`, creating it empty when `create` is set.
    /// An existing file is never truncated.
    fn file(&self, parent: &DirHandle, name: &str, create: bool)
        -> Result<FileHandle, StorageError>;

    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, StorageError>;

    /// Replace the whole content of `file`.
    fn write(&self, file: &FileHandle, contents: &[u8]) -> Result<(), StorageError>;

    /// Delete the file or empty directory `name` from `parent`.
    fn remove_entry(&self, parent: &DirHandle, name: &str) -> Result<(), StorageError>;
}

/// Entry names are single path components.
pub(crate) fn validate_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_names_that_are_not_single_components() {
        for bad in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_name(bad), Err(StorageError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_name(".snyk").is_ok());
        assert!(validate_name("backup").is_ok());
    }

    #[test]
    fn entry_kind_follows_handle() {
        let dir = Entry {
            name: "src".into(),
            handle: EntryHandle::Directory(DirHandle::new("/p/src")),
        };
        let file = Entry {
            name: "main.rs".into(),
            handle: EntryHandle::File(FileHandle::new("/p/main.rs")),
        };
        assert_eq!(dir.kind(), EntryKind::Directory);
        assert_eq!(file.kind(), EntryKind::File);
    }
}
