use crate::data::snyk::PrepareOutcome;
use crate::error::StorageError;
use crate::model::filebrowser::FileNode;
use crate::storage::{DirHandle, FileHandle};

/// All events the app loop handles.
///
/// Results of background work carry the generation they were started
/// under; the app drops any that a newer selection has superseded.
#[derive(Debug)]
pub enum AppEvent {
    /// A picked folder was opened and its tree read.
    FolderLoaded {
        generation: u64,
        result: Result<(DirHandle, Vec<FileNode>), StorageError>,
    },
    /// The `.snyk` backup/create flow for a folder selection finished.
    ConfigPrepared {
        generation: u64,
        result: Result<PrepareOutcome, StorageError>,
    },
    /// A re-read of the selected folder finished.
    TreeRefreshed {
        generation: u64,
        result: Result<Vec<FileNode>, StorageError>,
    },
    /// File content is ready. Read failures already carry the placeholder.
    FileRead {
        generation: u64,
        name: String,
        text: String,
    },
    /// Saving the config draft finished.
    ConfigSaved {
        generation: u64,
        result: Result<FileHandle, StorageError>,
    },
    /// The watched folder changed on disk.
    FolderChanged { generation: u64 },
}
