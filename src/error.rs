use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage::EntryKind;

/// The storage call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Open,
    Enumerate,
    Create,
    Read,
    Write,
    Remove,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            StorageOp::Open => "open",
            StorageOp::Enumerate => "enumerate",
            StorageOp::Create => "create",
            StorageOp::Read => "read",
            StorageOp::Write => "write",
            StorageOp::Remove => "remove",
        };
        f.write_str(verb)
    }
}

/// Failures reported by a [`crate::storage::Storage`] implementation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{}: no such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("{}: permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: not a {expected}", .path.display())]
    WrongKind { path: PathBuf, expected: EntryKind },

    #[error("invalid entry name {0:?}")]
    InvalidName(String),

    #[error("failed to {op} {}: {source}", .path.display())]
    Io {
        op: StorageOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an I/O error raised while performing `op` on `path`.
    pub fn from_io(op: StorageOp, path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.to_path_buf()),
            _ => StorageError::Io {
                op,
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
