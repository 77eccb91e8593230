use tracing::{debug, warn};

use crate::config::READ_FAILED_PLACEHOLDER;
use crate::error::StorageError;
use crate::model::filebrowser::FileNode;
use crate::storage::{DirHandle, EntryHandle, FileHandle, Storage};

/// Build the full tree under `dir`, depth-first, keeping the order the
/// storage enumerates entries in. The first failing call aborts the walk.
pub fn read_directory(storage: &dyn Storage, dir: &DirHandle) -> Result<Vec<FileNode>, StorageError> {
    let mut nodes = Vec::new();
    for entry in storage.entries(dir)? {
        match entry.handle {
            EntryHandle::Directory(sub) => {
                let children = read_directory(storage, &sub)?;
                nodes.push(FileNode::folder(entry.name, children));
            }
            EntryHandle::File(handle) => nodes.push(FileNode::file(entry.name, handle)),
        }
    }
    Ok(nodes)
}

/// Read file content for display. Invalid UTF-8 is replaced rather than
/// rejected; a failed read yields [`READ_FAILED_PLACEHOLDER`].
pub fn read_file_text(storage: &dyn Storage, file: &FileHandle) -> String {
    match storage.read(file) {
        Ok(bytes) => {
            debug!(path = %file.path().display(), bytes = bytes.len(), "read file");
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Err(e) => {
            warn!(path = %file.path().display(), error = %e, "failed to read file");
            READ_FAILED_PLACEHOLDER.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::model::filebrowser::{count_nodes, NodeKind};
    use crate::storage::memory::MemoryStorage;
    use crate::storage::{LocalStorage, MockStorage};

    fn names(nodes: &[FileNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    fn children(node: &FileNode) -> &[FileNode] {
        match node.kind {
            NodeKind::Folder(ref children) => children,
            NodeKind::File(_) => panic!("{} is a file", node.name),
        }
    }

    #[test]
    fn reads_nested_tree_with_every_entry() {
        let storage = MemoryStorage::new()
            .with_file("/proj/README.md", "# proj")
            .with_file("/proj/src/main.rs", "fn main() {}")
            .with_file("/proj/src/util/mod.rs", "")
            .with_dir("/proj/empty");
        let root = storage.open_directory(Path::new("/proj")).unwrap();

        let tree = read_directory(&storage, &root).unwrap();

        assert_eq!(count_nodes(&tree), 6);
        assert_eq!(names(&tree), ["README.md", "src", "empty"]);
        assert!(tree[0].file_handle().is_some());
        assert_eq!(names(children(&tree[1])), ["main.rs", "util"]);
        assert_eq!(names(children(&children(&tree[1])[1])), ["mod.rs"]);
        assert!(children(&tree[2]).is_empty());
    }

    /// Add `fan_out` files and, below the last level, `fan_out` folders
    /// under `dir`. Returns the storage and the number of entries added.
    fn populate(storage: MemoryStorage, dir: &str, depth: usize, fan_out: usize) -> (MemoryStorage, usize) {
        let mut storage = storage;
        let mut added = 0;
        for i in 0..fan_out {
            storage = storage.with_file(&format!("{dir}/f{i}.txt"), "");
            added += 1;
            if depth > 1 {
                let sub = format!("{dir}/d{i}");
                let (next, below) = populate(storage.with_dir(&sub), &sub, depth - 1, fan_out);
                storage = next;
                added += 1 + below;
            }
        }
        (storage, added)
    }

    #[test]
    fn every_entry_of_generated_trees_is_read() {
        for depth in 1..=4 {
            for fan_out in 0..=3 {
                let (storage, expected) =
                    populate(MemoryStorage::new().with_dir("/proj"), "/proj", depth, fan_out);
                let root = storage.open_directory(Path::new("/proj")).unwrap();

                let tree = read_directory(&storage, &root).unwrap();

                assert_eq!(
                    count_nodes(&tree),
                    expected,
                    "depth {depth}, fan-out {fan_out}"
                );
            }
        }
    }

    #[test]
    fn keeps_storage_enumeration_order() {
        let storage = MemoryStorage::new()
            .with_file("/proj/zz.txt", "")
            .with_file("/proj/aa.txt", "")
            .with_file("/proj/mm.txt", "");
        let root = storage.open_directory(Path::new("/proj")).unwrap();

        let tree = read_directory(&storage, &root).unwrap();
        assert_eq!(names(&tree), ["zz.txt", "aa.txt", "mm.txt"]);
    }

    #[test]
    fn empty_directory_yields_no_nodes() {
        let storage = MemoryStorage::new().with_dir("/proj");
        let root = storage.open_directory(Path::new("/proj")).unwrap();
        assert!(read_directory(&storage, &root).unwrap().is_empty());
    }

    #[test]
    fn subdirectory_failure_aborts_the_walk() {
        let root = DirHandle::new("/proj");
        let sub = DirHandle::new("/proj/locked");

        let mut storage = MockStorage::new();
        let sub_entry = sub.clone();
        storage
            .expect_entries()
            .withf(|dir| dir.path() == Path::new("/proj"))
            .times(1)
            .returning(move |_| {
                Ok(vec![crate::storage::Entry {
                    name: "locked".into(),
                    handle: EntryHandle::Directory(sub_entry.clone()),
                }])
            });
        storage
            .expect_entries()
            .withf(|dir| dir.path() == Path::new("/proj/locked"))
            .times(1)
            .returning(|dir| Err(StorageError::PermissionDenied(dir.path().to_path_buf())));

        let err = read_directory(&storage, &root).unwrap_err();
        assert!(matches!(err, StorageError::PermissionDenied(p) if p == sub.path()));
    }

    #[test]
    fn reads_a_real_directory() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("src/bin")).unwrap();
        fs::write(dir.path().join("src/bin/tool.rs"), "").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();
        fs::write(dir.path().join(".snyk"), "version: v1").unwrap();

        let storage = LocalStorage;
        let root = storage.open_directory(dir.path()).unwrap();
        let tree = read_directory(&storage, &root).unwrap();

        assert_eq!(count_nodes(&tree), 5);
        assert_eq!(names(&tree), ["src", ".snyk", "Cargo.toml"]);
    }

    #[test]
    fn file_text_is_decoded() {
        let storage = MemoryStorage::new().with_file("/proj/hello.txt", "hello");
        let handle = FileHandle::new("/proj/hello.txt");
        assert_eq!(read_file_text(&storage, &handle), "hello");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("blob.bin"), [b'o', b'k', 0xff]).unwrap();

        let handle = FileHandle::new(dir.path().join("blob.bin"));
        assert_eq!(read_file_text(&LocalStorage, &handle), "ok\u{fffd}");
    }

    #[test]
    fn failed_read_yields_placeholder() {
        let storage = MemoryStorage::new().with_file("/proj/secret.txt", "top secret");
        storage.fail_read("/proj/secret.txt");

        let handle = FileHandle::new("/proj/secret.txt");
        assert_eq!(read_file_text(&storage, &handle), READ_FAILED_PLACEHOLDER);
    }
}
