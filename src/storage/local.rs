use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use super::{validate_name, DirHandle, Entry, EntryHandle, EntryKind, FileHandle, Storage};
use crate::error::{StorageError, StorageOp};

/// [`Storage`] backed by the local filesystem.
///
/// Handles are absolute paths. Enumeration lists directories first, then
/// files, each group sorted case-insensitively. Symbolic links are reported
/// as files so a tree walk never follows a link cycle.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl Storage for LocalStorage {
    fn open_directory(&self, path: &Path) -> Result<DirHandle, StorageError> {
        let metadata =
            fs::metadata(path).map_err(|e| StorageError::from_io(StorageOp::Open, path, e))?;
        if !metadata.is_dir() {
            return Err(StorageError::WrongKind {
                path: path.to_path_buf(),
                expected: EntryKind::Directory,
            });
        }
        Ok(DirHandle::new(path))
    }

    fn entries(&self, dir: &DirHandle) -> Result<Vec<Entry>, StorageError> {
        let enumerate_err = |e: io::Error| StorageError::from_io(StorageOp::Enumerate, dir.path(), e);
        let read_dir = fs::read_dir(dir.path()).map_err(enumerate_err)?;

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in read_dir {
            let entry = entry.map_err(enumerate_err)?;
            let file_type = entry.file_type().map_err(enumerate_err)?;
            let name = entry.file_name().to_string_lossy().to_string();
            let path = entry.path();

            if file_type.is_dir() {
                dirs.push(Entry {
                    name,
                    handle: EntryHandle::Directory(DirHandle::new(path)),
                });
            } else {
                files.push(Entry {
                    name,
                    handle: EntryHandle::File(FileHandle::new(path)),
                });
            }
        }

        dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        dirs.extend(files);
        Ok(dirs)
    }

    fn directory(
        &self,
        parent: &DirHandle,
        name: &str,
        create: bool,
    ) -> Result<DirHandle, StorageError> {
        validate_name(name)?;
        let path = parent.path().join(name);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_dir() => Ok(DirHandle::new(path)),
            Ok(_) => Err(StorageError::WrongKind {
                path,
                expected: EntryKind::Directory,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound && create => {
                fs::create_dir(&path)
                    .map_err(|e| StorageError::from_io(StorageOp::Create, &path, e))?;
                Ok(DirHandle::new(path))
            }
            Err(e) => Err(StorageError::from_io(StorageOp::Open, &path, e)),
        }
    }

    fn file(
        &self,
        parent: &DirHandle,
        name: &str,
        create: bool,
    ) -> Result<FileHandle, StorageError> {
        validate_name(name)?;
        let path = parent.path().join(name);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Ok(FileHandle::new(path)),
            Ok(_) => Err(StorageError::WrongKind {
                path,
                expected: EntryKind::File,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound && create => {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&path)
                    .map_err(|e| StorageError::from_io(StorageOp::Create, &path, e))?;
                Ok(FileHandle::new(path))
            }
            Err(e) => Err(StorageError::from_io(StorageOp::Open, &path, e)),
        }
    }

    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, StorageError> {
        fs::read(file.path()).map_err(|e| StorageError::from_io(StorageOp::Read, file.path(), e))
    }

    fn write(&self, file: &FileHandle, contents: &[u8]) -> Result<(), StorageError> {
        fs::write(file.path(), contents)
            .map_err(|e| StorageError::from_io(StorageOp::Write, file.path(), e))
    }

    fn remove_entry(&self, parent: &DirHandle, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        let path = parent.path().join(name);
        let metadata = fs::symlink_metadata(&path)
            .map_err(|e| StorageError::from_io(StorageOp::Remove, &path, e))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| StorageError::from_io(StorageOp::Remove, &path, e))
    }
}
