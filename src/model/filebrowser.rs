use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::storage::FileHandle;

/// One entry of a selected folder. Folders own their children, files own
/// the handle used to read them, so a node can never carry both.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub name: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Folder(Vec<FileNode>),
    File(FileHandle),
}

impl FileNode {
    pub fn folder(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Folder(children),
        }
    }

    pub fn file(name: impl Into<String>, handle: FileHandle) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File(handle),
        }
    }

    pub fn file_handle(&self) -> Option<&FileHandle> {
        match self.kind {
            NodeKind::File(ref handle) => Some(handle),
            NodeKind::Folder(_) => None,
        }
    }
}

/// Number of nodes in `nodes`, descendants included.
pub fn count_nodes(nodes: &[FileNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node.kind {
            NodeKind::Folder(ref children) => 1 + count_nodes(children),
            NodeKind::File(_) => 1,
        })
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Folder { expanded: bool },
    File(FileHandle),
}

/// A line of the rendered tree. `path` is relative to the selected folder
/// and is the key used for expansion state.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    pub name: String,
    pub path: PathBuf,
    pub depth: usize,
    pub kind: RowKind,
}

/// Flatten `nodes` into the rows currently visible, descending only into
/// folders whose path is in `expanded`.
pub fn visible_rows(nodes: &[FileNode], expanded: &HashSet<PathBuf>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    collect_rows(nodes, Path::new(""), 0, expanded, &mut rows);
    rows
}

fn collect_rows(
    nodes: &[FileNode],
    parent: &Path,
    depth: usize,
    expanded: &HashSet<PathBuf>,
    rows: &mut Vec<TreeRow>,
) {
    for node in nodes {
        let path = parent.join(&node.name);
        match node.kind {
            NodeKind::Folder(ref children) => {
                let is_expanded = expanded.contains(&path);
                rows.push(TreeRow {
                    name: node.name.clone(),
                    path: path.clone(),
                    depth,
                    kind: RowKind::Folder {
                        expanded: is_expanded,
                    },
                });
                if is_expanded {
                    collect_rows(children, &path, depth + 1, expanded, rows);
                }
            }
            NodeKind::File(ref handle) => rows.push(TreeRow {
                name: node.name.clone(),
                path,
                depth,
                kind: RowKind::File(handle.clone()),
            }),
        }
    }
}

/// Flip the expansion of the folder at `path`, leaving every other folder as is.
pub fn toggle_expanded(expanded: &mut HashSet<PathBuf>, path: &Path) {
    if !expanded.remove(path) {
        expanded.insert(path.to_path_buf());
    }
}
