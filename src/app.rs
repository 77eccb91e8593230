use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use tracing::{debug, error, info, warn};
use tui_textarea::{CursorMove, TextArea};

use crate::config::{self, Settings};
use crate::data::{filebrowser, snyk};
use crate::error::StorageError;
use crate::event::AppEvent;
use crate::model::filebrowser::{count_nodes, toggle_expanded, visible_rows, FileNode, RowKind, TreeRow};
use crate::storage::{DirHandle, FileHandle, Storage};
use crate::watcher::{self, FolderWatcher};

#[derive(Debug, Clone, PartialEq)]
pub enum Pane {
    Tree,
    Content,
}

/// What a confirmed folder picker does with its path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerPurpose {
    SelectFolder,
    SaveConfig,
}

/// Single-line path prompt standing in for a directory picker dialog.
pub struct FolderPicker {
    pub purpose: PickerPurpose,
    pub input: TextArea<'static>,
}

impl FolderPicker {
    fn new(purpose: PickerPurpose, initial: &Path) -> Self {
        let mut input = TextArea::new(vec![initial.to_string_lossy().to_string()]);
        input.move_cursor(CursorMove::End);
        Self { purpose, input }
    }

    pub fn text(&self) -> String {
        self.input.lines().join("")
    }
}

fn new_draft_editor() -> TextArea<'static> {
    let mut editor = TextArea::default();
    editor.set_placeholder_text("Type the new .snyk content");
    editor
}

pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub dirty: bool,

    pub settings: Settings,
    storage: Arc<dyn Storage>,
    pub event_tx: Option<mpsc::Sender<AppEvent>>,

    /// Where the folder picker starts and relative paths resolve from.
    pub start_dir: PathBuf,

    // Selected folder
    pub root: Option<DirHandle>,
    pub tree: Vec<FileNode>,
    pub tree_rows: Vec<TreeRow>,
    pub tree_index: usize,
    pub expanded: HashSet<PathBuf>,
    pub load_generation: u64,
    pub loading: bool,
    watcher: Option<FolderWatcher>,

    // Content pane
    pub pane: Pane,
    pub content: Option<String>,
    pub content_name: Option<String>,
    pub content_scroll: usize,
    pub read_generation: u64,

    // Config popup
    pub popup_visible: bool,
    pub draft_editor: TextArea<'static>,
    pub save_pending: bool,

    // Folder picker
    pub picker: Option<FolderPicker>,
}

impl App {
    pub fn new(settings: Settings, storage: Arc<dyn Storage>, start_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            dirty: true,
            settings,
            storage,
            event_tx: None,
            start_dir,
            root: None,
            tree: Vec::new(),
            tree_rows: Vec::new(),
            tree_index: 0,
            expanded: HashSet::new(),
            load_generation: 0,
            loading: false,
            watcher: None,
            pane: Pane::Tree,
            content: None,
            content_name: None,
            content_scroll: 0,
            read_generation: 0,
            popup_visible: false,
            draft_editor: new_draft_editor(),
            save_pending: false,
            picker: None,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Current text of the config draft.
    pub fn draft(&self) -> String {
        self.draft_editor.lines().join("\n")
    }

    /// Run `task` on a worker thread with the storage and the event sender.
    fn spawn_storage_task<F>(&self, label: &'static str, task: F)
    where
        F: FnOnce(&dyn Storage, &mpsc::Sender<AppEvent>) + Send + 'static,
    {
        let Some(tx) = self.event_tx.clone() else {
            warn!(task = label, "no event channel, storage task dropped");
            return;
        };
        let storage = Arc::clone(&self.storage);
        thread::spawn(move || task(storage.as_ref(), &tx));
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FolderLoaded { generation, result } => {
                self.handle_folder_loaded(generation, result)
            }
            AppEvent::ConfigPrepared { generation, result } => {
                self.handle_config_prepared(generation, result)
            }
            AppEvent::TreeRefreshed { generation, result } => {
                self.handle_tree_refreshed(generation, result)
            }
            AppEvent::FileRead {
                generation,
                name,
                text,
            } => self.handle_file_read(generation, name, text),
            AppEvent::ConfigSaved { generation, result } => {
                self.handle_config_saved(generation, result)
            }
            AppEvent::FolderChanged { generation } => {
                if generation == self.load_generation {
                    self.refresh_tree();
                }
            }
        }
    }

    fn is_stale(&self, generation: u64, what: &str) -> bool {
        if generation != self.load_generation {
            debug!(generation, current = self.load_generation, what, "ignoring superseded result");
            return true;
        }
        false
    }

    // --- Folder selection ---

    /// Read the folder at `path`, then run the `.snyk` backup/create flow
    /// on it. Any earlier selection still in flight is superseded.
    pub fn select_folder(&mut self, path: PathBuf) {
        self.load_generation += 1;
        let generation = self.load_generation;
        self.loading = true;
        self.watcher = None;
        info!(path = %path.display(), generation, "folder selected");

        self.spawn_storage_task("select folder", move |storage, tx| {
            let loaded = storage.open_directory(&path).and_then(|root| {
                filebrowser::read_directory(storage, &root).map(|tree| (root, tree))
            });
            let (root, tree) = match loaded {
                Ok(loaded) => loaded,
                Err(e) => {
                    let _ = tx.send(AppEvent::FolderLoaded {
                        generation,
                        result: Err(e),
                    });
                    return;
                }
            };

            let existing = snyk::find_config(&tree).cloned();
            let _ = tx.send(AppEvent::FolderLoaded {
                generation,
                result: Ok((root.clone(), tree)),
            });

            let result = snyk::prepare_config(storage, &root, existing.as_ref());
            let _ = tx.send(AppEvent::ConfigPrepared { generation, result });
        });
    }

    fn handle_folder_loaded(
        &mut self,
        generation: u64,
        result: Result<(DirHandle, Vec<FileNode>), StorageError>,
    ) {
        if self.is_stale(generation, "folder load") {
            return;
        }
        match result {
            Ok((root, tree)) => {
                info!(root = %root.path().display(), entries = count_nodes(&tree), "folder loaded");
                self.start_watching(&root);
                self.root = Some(root);
                self.tree = tree;
                self.expanded.clear();
                self.tree_index = 0;
                self.pane = Pane::Tree;
            }
            Err(e) => {
                error!(error = %e, "failed to read folder");
                self.loading = false;
                self.root = None;
                self.tree.clear();
                self.expanded.clear();
                self.tree_index = 0;
            }
        }
        self.rebuild_rows();
    }

    fn handle_config_prepared(
        &mut self,
        generation: u64,
        result: Result<snyk::PrepareOutcome, StorageError>,
    ) {
        if self.is_stale(generation, "config flow") {
            return;
        }
        self.loading = false;
        match result {
            Ok(outcome) => {
                debug!(?outcome, "opening .snyk editor");
                self.draft_editor = new_draft_editor();
                self.popup_visible = true;
            }
            Err(e) => error!(error = %e, "failed to prepare .snyk file"),
        }
        // Pick up backup/ and the fresh .snyk.
        self.refresh_tree();
    }

    fn start_watching(&mut self, root: &DirHandle) {
        self.watcher = None;
        if !self.settings.watch_enabled() {
            return;
        }
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        match watcher::start_watcher(
            root.path(),
            self.load_generation,
            self.settings.debounce_ms(),
            vec![self.settings.log_file()],
            tx,
        ) {
            Ok(w) => self.watcher = Some(w),
            Err(e) => warn!(root = %root.path().display(), error = %e, "folder watcher not started"),
        }
    }

    /// Re-read the selected folder, keeping expansion state and cursor.
    pub fn refresh_tree(&mut self) {
        let Some(root) = self.root.clone() else {
            return;
        };
        let generation = self.load_generation;
        self.spawn_storage_task("refresh tree", move |storage, tx| {
            let result = filebrowser::read_directory(storage, &root);
            let _ = tx.send(AppEvent::TreeRefreshed { generation, result });
        });
    }

    fn handle_tree_refreshed(&mut self, generation: u64, result: Result<Vec<FileNode>, StorageError>) {
        if self.is_stale(generation, "tree refresh") {
            return;
        }
        match result {
            Ok(tree) => {
                debug!(entries = count_nodes(&tree), "tree refreshed");
                self.tree = tree;
                self.rebuild_rows();
            }
            Err(e) => warn!(error = %e, "failed to refresh tree, keeping previous one"),
        }
    }

    fn rebuild_rows(&mut self) {
        self.tree_rows = visible_rows(&self.tree, &self.expanded);
        if self.tree_index >= self.tree_rows.len() {
            self.tree_index = self.tree_rows.len().saturating_sub(1);
        }
    }

    // --- Tree navigation ---

    pub fn navigate_down(&mut self) {
        match self.pane {
            Pane::Tree => {
                if !self.tree_rows.is_empty() {
                    self.tree_index = (self.tree_index + 1).min(self.tree_rows.len() - 1);
                }
            }
            Pane::Content => {
                self.content_scroll = (self.content_scroll + 1).min(self.last_content_line());
            }
        }
    }

    pub fn navigate_up(&mut self) {
        match self.pane {
            Pane::Tree => {
                self.tree_index = self.tree_index.saturating_sub(1);
            }
            Pane::Content => {
                self.content_scroll = self.content_scroll.saturating_sub(1);
            }
        }
    }

    pub fn jump_top(&mut self) {
        match self.pane {
            Pane::Tree => self.tree_index = 0,
            Pane::Content => self.content_scroll = 0,
        }
    }

    pub fn jump_bottom(&mut self) {
        match self.pane {
            Pane::Tree => self.tree_index = self.tree_rows.len().saturating_sub(1),
            Pane::Content => self.content_scroll = self.last_content_line(),
        }
    }

    /// Index of the last line of the shown file, 0 when nothing is shown.
    fn last_content_line(&self) -> usize {
        self.content
            .as_deref()
            .map_or(0, |text| text.lines().count().saturating_sub(1))
    }

    pub fn switch_pane(&mut self) {
        self.pane = match self.pane {
            Pane::Tree => Pane::Content,
            Pane::Content => Pane::Tree,
        };
    }

    pub fn selected_row(&self) -> Option<&TreeRow> {
        self.tree_rows.get(self.tree_index)
    }

    /// Toggle the selected folder or open the selected file.
    pub fn activate_selected(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        match row.kind {
            RowKind::Folder { .. } => {
                toggle_expanded(&mut self.expanded, &row.path);
                self.rebuild_rows();
            }
            RowKind::File(handle) => self.open_file(handle, row.name),
        }
    }

    /// Collapse the selected folder, or move to the parent folder.
    pub fn collapse_or_parent(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if matches!(row.kind, RowKind::Folder { expanded: true }) {
            toggle_expanded(&mut self.expanded, &row.path);
            self.rebuild_rows();
            return;
        }
        if let Some(parent) = row.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Some(i) = self.tree_rows.iter().position(|r| r.path == parent) {
                self.tree_index = i;
            }
        }
    }

    // --- File content ---

    pub fn open_file(&mut self, handle: FileHandle, name: String) {
        self.read_generation += 1;
        let generation = self.read_generation;
        self.spawn_storage_task("read file", move |storage, tx| {
            let text = filebrowser::read_file_text(storage, &handle);
            let _ = tx.send(AppEvent::FileRead {
                generation,
                name,
                text,
            });
        });
    }

    fn handle_file_read(&mut self, generation: u64, name: String, text: String) {
        if generation != self.read_generation {
            debug!(generation, current = self.read_generation, "ignoring superseded file read");
            return;
        }
        self.content = Some(text);
        self.content_name = Some(name);
        self.content_scroll = 0;
        self.pane = Pane::Content;
    }

    // --- Folder picker ---

    pub fn open_folder_picker(&mut self) {
        let initial = self
            .root
            .as_ref()
            .map(|r| r.path().to_path_buf())
            .unwrap_or_else(|| self.start_dir.clone());
        self.picker = Some(FolderPicker::new(PickerPurpose::SelectFolder, &initial));
    }

    /// Ask where to save the draft, starting from the browsed folder.
    pub fn open_save_picker(&mut self) {
        if !self.popup_visible || self.save_pending {
            return;
        }
        let initial = self
            .root
            .as_ref()
            .map(|r| r.path().to_path_buf())
            .unwrap_or_else(|| self.start_dir.clone());
        self.picker = Some(FolderPicker::new(PickerPurpose::SaveConfig, &initial));
    }

    pub fn confirm_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let path = self.resolve_picker_path(&picker.text());
        match picker.purpose {
            PickerPurpose::SelectFolder => self.select_folder(path),
            PickerPurpose::SaveConfig => self.save_config_to(path),
        }
    }

    pub fn cancel_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        match picker.purpose {
            PickerPurpose::SelectFolder => warn!("folder selection cancelled"),
            PickerPurpose::SaveConfig => warn!("save cancelled, .snyk left unchanged"),
        }
    }

    /// `~` expands to the home directory; relative paths resolve from `start_dir`.
    pub fn resolve_picker_path(&self, input: &str) -> PathBuf {
        let input = input.trim();
        if input == "~" {
            return config::home_dir();
        }
        if let Some(rest) = input.strip_prefix("~/") {
            return config::home_dir().join(rest);
        }
        let path = PathBuf::from(input);
        if path.is_absolute() {
            path
        } else {
            self.start_dir.join(path)
        }
    }

    // --- Config popup ---

    fn save_config_to(&mut self, dir: PathBuf) {
        let draft = self.draft();
        let generation = self.load_generation;
        self.save_pending = true;
        self.spawn_storage_task("save config", move |storage, tx| {
            let result = storage
                .open_directory(&dir)
                .and_then(|handle| snyk::save_config(storage, &handle, &draft));
            let _ = tx.send(AppEvent::ConfigSaved { generation, result });
        });
    }

    fn handle_config_saved(&mut self, generation: u64, result: Result<FileHandle, StorageError>) {
        self.save_pending = false;
        match result {
            Ok(handle) => {
                // A newer selection reopened the popup with a fresh draft.
                if generation == self.load_generation {
                    self.popup_visible = false;
                }
                if self
                    .root
                    .as_ref()
                    .is_some_and(|root| handle.path().starts_with(root.path()))
                {
                    self.refresh_tree();
                }
            }
            Err(e) => error!(error = %e, "failed to save .snyk file"),
        }
    }

    /// Hide the popup and throw the draft away. Nothing is written.
    pub fn cancel_popup(&mut self) {
        if !self.popup_visible {
            return;
        }
        info!("discarded .snyk draft");
        self.popup_visible = false;
        self.draft_editor = new_draft_editor();
    }
}
