use tracing::info;

use crate::config::{BACKUP_DIR_NAME, CONFIG_FILE_NAME};
use crate::error::StorageError;
use crate::model::filebrowser::FileNode;
use crate::storage::{DirHandle, FileHandle, Storage};

/// How the root `.snyk` came to be empty and ready for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// No config existed; a new empty one was created.
    Created,
    /// The old config was copied to `backup/.snyk` and replaced.
    Replaced,
}

/// Find a top-level file named `.snyk`. Nested configs and folders with
/// that name do not count.
pub fn find_config(top_level: &[FileNode]) -> Option<&FileHandle> {
    top_level
        .iter()
        .filter(|node| node.name == CONFIG_FILE_NAME)
        .find_map(FileNode::file_handle)
}

/// Back up `existing` (if any) into `backup/`, delete it from the root and
/// create a fresh empty `.snyk`.
///
/// Steps run strictly in order and stop at the first failure. Nothing is
/// rolled back: a failed delete leaves the original next to its backup.
pub fn prepare_config(
    storage: &dyn Storage,
    root: &DirHandle,
    existing: Option<&FileHandle>,
) -> Result<PrepareOutcome, StorageError> {
    let outcome = match existing {
        Some(config) => {
            backup_config(storage, root, config)?;
            PrepareOutcome::Replaced
        }
        None => PrepareOutcome::Created,
    };
    let created = storage.file(root, CONFIG_FILE_NAME, true)?;
    info!(path = %created.path().display(), ?outcome, "created empty .snyk file");
    Ok(outcome)
}

fn backup_config(
    storage: &dyn Storage,
    root: &DirHandle,
    config: &FileHandle,
) -> Result<FileHandle, StorageError> {
    let backup_dir = storage.directory(root, BACKUP_DIR_NAME, true)?;
    let contents = storage.read(config)?;
    let backup = storage.file(&backup_dir, CONFIG_FILE_NAME, true)?;
    storage.write(&backup, &contents)?;
    storage.remove_entry(root, CONFIG_FILE_NAME)?;
    info!(backup = %backup.path().display(), bytes = contents.len(), ".snyk file backed up");
    Ok(backup)
}

/// Overwrite `.snyk` in `dir` with exactly `draft`, creating it if needed.
pub fn save_config(
    storage: &dyn Storage,
    dir: &DirHandle,
    draft: &str,
) -> Result<FileHandle, StorageError> {
    let handle = storage.file(dir, CONFIG_FILE_NAME, true)?;
    storage.write(&handle, draft.as_bytes())?;
    info!(path = %handle.path().display(), bytes = draft.len(), ".snyk file updated");
    Ok(handle)
}
