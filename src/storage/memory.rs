//! In-memory [`Storage`] fake for tests.
//!
//! Paths are absolute and `/`-separated. Entries keep insertion order, which
//! lets tests check that callers preserve the storage's enumeration order.

use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use super::{validate_name, DirHandle, Entry, EntryHandle, EntryKind, FileHandle, Storage};
use crate::error::{StorageError, StorageOp};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir(Vec<(String, Node)>),
}

#[derive(Debug)]
pub struct MemoryStorage {
    root: Mutex<Node>,
    failing_reads: Mutex<HashSet<PathBuf>>,
    failing_removes: Mutex<HashSet<PathBuf>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().to_string()),
            _ => None,
        })
        .collect()
}

fn child<'a>(children: &'a [(String, Node)], name: &str) -> Option<&'a Node> {
    children.iter().find(|(n, _)| n == name).map(|(_, node)| node)
}

fn child_mut<'a>(children: &'a mut [(String, Node)], name: &str) -> Option<&'a mut Node> {
    children
        .iter_mut()
        .find(|(n, _)| n == name)
        .map(|(_, node)| node)
}

fn lookup<'a>(root: &'a Node, path: &Path) -> Option<&'a Node> {
    let mut node = root;
    for name in components(path) {
        match node {
            Node::Dir(children) => node = child(children, &name)?,
            Node::File(_) => return None,
        }
    }
    Some(node)
}

fn lookup_mut<'a>(root: &'a mut Node, path: &Path) -> Option<&'a mut Node> {
    let mut node = root;
    for name in components(path) {
        match node {
            Node::Dir(children) => node = child_mut(children, &name)?,
            Node::File(_) => return None,
        }
    }
    Some(node)
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Node::Dir(Vec::new())),
            failing_reads: Mutex::new(HashSet::new()),
            failing_removes: Mutex::new(HashSet::new()),
        }
    }

    /// Add a directory, creating missing parents.
    pub fn with_dir(self, path: &str) -> Self {
        {
            let mut root = self.root.lock().unwrap();
            let mut node = &mut *root;
            for name in components(Path::new(path)) {
                let Node::Dir(children) = node else {
                    panic!("{path}: parent is a file");
                };
                if child(children, &name).is_none() {
                    children.push((name.clone(), Node::Dir(Vec::new())));
                }
                node = child_mut(children, &name).unwrap();
            }
        }
        self
    }

    /// Add a file with `contents`, creating missing parents.
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        let path = Path::new(path);
        let parent = path.parent().unwrap_or(Path::new("/"));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let storage = self.with_dir(&parent.to_string_lossy());
        {
            let mut root = storage.root.lock().unwrap();
            let Some(Node::Dir(children)) = lookup_mut(&mut root, parent) else {
                panic!("{}: parent is not a directory", path.display());
            };
            children.push((name, Node::File(contents.as_bytes().to_vec())));
        }
        storage
    }

    /// Make every read of `path` fail.
    pub fn fail_read(&self, path: &str) {
        self.failing_reads.lock().unwrap().insert(PathBuf::from(path));
    }

    /// Make every removal of `path` fail.
    pub fn fail_remove(&self, path: &str) {
        self.failing_removes
            .lock()
            .unwrap()
            .insert(PathBuf::from(path));
    }

    pub fn contents(&self, path: &str) -> Option<String> {
        let root = self.root.lock().unwrap();
        match lookup(&root, Path::new(path))? {
            Node::File(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            Node::Dir(_) => None,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        let root = self.root.lock().unwrap();
        matches!(lookup(&root, Path::new(path)), Some(Node::Dir(_)))
    }

    pub fn exists(&self, path: &str) -> bool {
        let root = self.root.lock().unwrap();
        lookup(&root, Path::new(path)).is_some()
    }

    fn injected(op: StorageOp, path: &Path) -> StorageError {
        StorageError::Io {
            op,
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "injected failure"),
        }
    }

    fn open_child(
        &self,
        parent: &DirHandle,
        name: &str,
        create: bool,
        kind: EntryKind,
    ) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        let path = parent.path().join(name);
        let mut root = self.root.lock().unwrap();
        let Some(Node::Dir(children)) = lookup_mut(&mut root, parent.path()) else {
            return Err(StorageError::NotFound(parent.path().to_path_buf()));
        };
        let existing = child(children, name).map(|node| match node {
            Node::Dir(_) => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
        });
        match (existing, kind) {
            (Some(found), expected) if found == expected => Ok(path),
            (Some(_), expected) => Err(StorageError::WrongKind { path, expected }),
            (None, _) if !create => Err(StorageError::NotFound(path)),
            (None, EntryKind::Directory) => {
                children.push((name.to_string(), Node::Dir(Vec::new())));
                Ok(path)
            }
            (None, EntryKind::File) => {
                children.push((name.to_string(), Node::File(Vec::new())));
                Ok(path)
            }
        }
    }
}

impl Storage for MemoryStorage {
    fn open_directory(&self, path: &Path) -> Result<DirHandle, StorageError> {
        let root = self.root.lock().unwrap();
        match lookup(&root, path) {
            Some(Node::Dir(_)) => Ok(DirHandle::new(path)),
            Some(Node::File(_)) => Err(StorageError::WrongKind {
                path: path.to_path_buf(),
                expected: EntryKind::Directory,
            }),
            None => Err(StorageError::NotFound(path.to_path_buf())),
        }
    }

    fn entries(&self, dir: &DirHandle) -> Result<Vec<Entry>, StorageError> {
        let root = self.root.lock().unwrap();
        let Some(Node::Dir(children)) = lookup(&root, dir.path()) else {
            return Err(StorageError::NotFound(dir.path().to_path_buf()));
        };
        Ok(children
            .iter()
            .map(|(name, node)| {
                let path = dir.path().join(name);
                let handle = match node {
                    Node::Dir(_) => EntryHandle::Directory(DirHandle::new(path)),
                    Node::File(_) => EntryHandle::File(FileHandle::new(path)),
                };
                Entry {
                    name: name.clone(),
                    handle,
                }
            })
            .collect())
    }

    fn directory(
        &self,
        parent: &DirHandle,
        name: &str,
        create: bool,
    ) -> Result<DirHandle, StorageError> {
        self.open_child(parent, name, create, EntryKind::Directory)
            .map(DirHandle::new)
    }

    fn file(
        &self,
        parent: &DirHandle,
        name: &str,
        create: bool,
    ) -> Result<FileHandle, StorageError> {
        self.open_child(parent, name, create, EntryKind::File)
            .map(FileHandle::new)
    }

    fn read(&self, file: &FileHandle) -> Result<Vec<u8>, StorageError> {
        if self.failing_reads.lock().unwrap().contains(file.path()) {
            return Err(Self::injected(StorageOp::Read, file.path()));
        }
        let root = self.root.lock().unwrap();
        match lookup(&root, file.path()) {
            Some(Node::File(bytes)) => Ok(bytes.clone()),
            Some(Node::Dir(_)) => Err(StorageError::WrongKind {
                path: file.path().to_path_buf(),
                expected: EntryKind::File,
            }),
            None => Err(StorageError::NotFound(file.path().to_path_buf())),
        }
    }

    fn write(&self, file: &FileHandle, contents: &[u8]) -> Result<(), StorageError> {
        let mut root = self.root.lock().unwrap();
        match lookup_mut(&mut root, file.path()) {
            Some(Node::File(bytes)) => {
                *bytes = contents.to_vec();
                Ok(())
            }
            Some(Node::Dir(_)) => Err(StorageError::WrongKind {
                path: file.path().to_path_buf(),
                expected: EntryKind::File,
            }),
            None => Err(StorageError::NotFound(file.path().to_path_buf())),
        }
    }

    fn remove_entry(&self, parent: &DirHandle, name: &str) -> Result<(), StorageError> {
        validate_name(name)?;
        let path = parent.path().join(name);
        if self.failing_removes.lock().unwrap().contains(&path) {
            return Err(Self::injected(StorageOp::Remove, &path));
        }
        let mut root = self.root.lock().unwrap();
        let Some(Node::Dir(children)) = lookup_mut(&mut root, parent.path()) else {
            return Err(StorageError::NotFound(parent.path().to_path_buf()));
        };
        let Some(index) = children.iter().position(|(n, _)| n == name) else {
            return Err(StorageError::NotFound(path));
        };
        if matches!(&children[index].1, Node::Dir(grandchildren) if !grandchildren.is_empty()) {
            return Err(StorageError::Io {
                op: StorageOp::Remove,
                path,
                source: io::Error::new(io::ErrorKind::Other, "directory not empty"),
            });
        }
        children.remove(index);
        Ok(())
    }
}
