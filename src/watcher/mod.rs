use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tracing::{debug, warn};

use crate::event::AppEvent;

pub type FolderWatcher = notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>;

/// Watch `root` recursively and send `FolderChanged` for `generation`
/// after each debounced burst of changes.
///
/// Changes to `ignored` paths are dropped. The log file goes here so that
/// selecting a folder containing it does not refresh on every log line.
pub fn start_watcher(
    root: &Path,
    generation: u64,
    debounce_ms: u64,
    ignored: Vec<PathBuf>,
    tx: mpsc::Sender<AppEvent>,
) -> Result<FolderWatcher> {
    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        move |res: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
            let events = match res {
                Ok(events) => events,
                Err(e) => {
                    warn!(error = %e, "folder watcher error");
                    return;
                }
            };

            let changed = events
                .iter()
                .filter(|event| event.kind == DebouncedEventKind::Any)
                .filter(|event| !ignored.iter().any(|p| *p == event.path))
                .count();
            if changed > 0 {
                debug!(generation, changed, "watched folder changed");
                let _ = tx.send(AppEvent::FolderChanged { generation });
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(root, notify::RecursiveMode::Recursive)?;

    Ok(debouncer)
}
