mod app;
mod config;
mod data;
mod error;
mod event;
mod model;
mod storage;
mod ui;
mod watcher;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self as ct_event, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Pane};
use crate::config::Settings;
use crate::event::AppEvent;
use crate::storage::LocalStorage;

#[derive(Parser)]
#[command(
    name = "snyk-tree",
    version,
    about = "Snyk Tree - browse a folder and manage its .snyk config",
    override_help = HELP_TEXT,
)]
struct Cli {
    /// Starting directory for the folder picker (defaults to current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Select the starting directory right away instead of opening the picker
    #[arg(long)]
    select: bool,

    /// Settings file [default: ~/.snyk-tree.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file, overriding the settings file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

const HELP_TEXT: &str = "\
Snyk Tree - browse a folder and manage its .snyk config

USAGE:
  snyk-tree [OPTIONS]

Selecting a folder shows its full tree. If the folder has a .snyk file at
its root, that file is moved to backup/.snyk first. A new empty .snyk is
then created and an editor opens so its content can be written and saved.

OPTIONS:
  --cwd <DIR>         Starting directory for the folder picker [default: current dir]
  --select            Select the starting directory on startup
  --config <FILE>     Settings file [default: ~/.snyk-tree.toml]
  --log-file <FILE>   Log file [default: ~/.snyk-tree/snyk-tree.log]
  -h, --help          Print this help
  -V, --version       Print version

TUI KEYBINDINGS:
  o                  Select folder
  j/k  Up/Down       Navigate tree / scroll content
  Enter / l / Right  Open file / expand or collapse folder
  h / Left / Bksp    Collapse folder / go to parent
  Tab                Switch tree and content panes
  g / G              Jump to top / bottom
  r                  Re-read the selected folder
  Ctrl+S / Esc       Save / cancel the .snyk editor
  ? / Ctrl+H         Toggle help overlay
  q / Ctrl+C         Quit

EXAMPLES:
  snyk-tree --cwd ~/dev/myproject
  snyk-tree --cwd ~/dev/myproject --select";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let start_dir = resolve_cwd(cli.cwd)?;

    let settings_path = cli.config.unwrap_or_else(config::default_settings_path);
    let (mut settings, settings_error) = match config::load_settings(&settings_path) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    let log_file = cli.log_file.unwrap_or_else(|| settings.log_file());
    let log_file = init_logging(&log_file, settings.log_level())?;
    // The folder watcher skips the log file by this path.
    settings.log.get_or_insert_with(Default::default).file = Some(log_file);
    if let Some(e) = settings_error {
        warn!(path = %settings_path.display(), error = %format!("{e:#}"), "using default settings");
    }
    info!(start_dir = %start_dir.display(), "starting");

    run_tui(settings, start_dir, cli.select)
}

fn resolve_cwd(cwd: Option<PathBuf>) -> Result<PathBuf> {
    match cwd {
        Some(p) => {
            let canonical = std::fs::canonicalize(&p)
                .with_context(|| format!("cannot open {}", p.display()))?;
            // On Windows, canonicalize returns \\?\C:\... extended-length paths.
            let s = canonical.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                Ok(PathBuf::from(stripped))
            } else {
                Ok(canonical)
            }
        }
        None => Ok(std::env::current_dir()?),
    }
}

/// Send tracing output to `path` and return its canonical form. The
/// terminal belongs to the TUI, so nothing is logged to stdout/stderr.
/// `RUST_LOG` overrides `level`.
fn init_logging(path: &Path, level: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
}

fn run_tui(settings: Settings, start_dir: PathBuf, select: bool) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, settings, start_dir, select);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "exiting on error");
        eprintln!("Error: {}", e);
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: Settings,
    start_dir: PathBuf,
    select: bool,
) -> Result<()> {
    let tick_rate = Duration::from_millis(settings.tick_rate());
    let mut app = App::new(settings, Arc::new(LocalStorage), start_dir);

    // Create event channel before the first selection so workers can report back
    let (tx, rx) = mpsc::channel::<AppEvent>();
    app.event_tx = Some(tx);

    if select {
        app.select_folder(app.start_dir.clone());
    }

    loop {
        // Draw only when dirty
        if app.dirty {
            terminal.draw(|f| ui::draw(f, &app))?;
            app.dirty = false;
        }

        // Poll at the tick rate so worker results are picked up promptly
        if ct_event::poll(tick_rate)? {
            match ct_event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut app, key);
                    app.mark_dirty();
                }
                Event::Resize(..) => app.mark_dirty(),
                _ => {}
            }
        }

        // Results from storage workers and the folder watcher
        while let Ok(evt) = rx.try_recv() {
            app.handle_event(evt);
            app.mark_dirty();
        }

        if app.should_quit {
            info!("quitting");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let typing = app.picker.is_some() || app.popup_visible;

    // Global keybindings (always active)
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !typing => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        _ => {}
    }

    // Don't process other keys when help is showing
    if app.show_help {
        return;
    }

    // The picker sits above the popup, so it gets keys first
    if app.picker.is_some() {
        handle_picker_key(app, key);
        return;
    }

    if app.popup_visible {
        handle_popup_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('o') => app.open_folder_picker(),
        KeyCode::Char('r') => app.refresh_tree(),
        KeyCode::Tab => app.switch_pane(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => app.navigate_down(),
        KeyCode::Char('k') | KeyCode::Up => app.navigate_up(),
        KeyCode::Char('g') => app.jump_top(),
        KeyCode::Char('G') => app.jump_bottom(),

        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right if app.pane == Pane::Tree => {
            app.activate_selected()
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => match app.pane {
            Pane::Tree => app.collapse_or_parent(),
            Pane::Content => app.switch_pane(),
        },

        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.confirm_picker(),
        KeyCode::Esc => app.cancel_picker(),
        _ => {
            if let Some(ref mut picker) = app.picker {
                picker.input.input(key);
            }
        }
    }
}

fn handle_popup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.open_save_picker();
        }
        KeyCode::Esc => app.cancel_popup(),
        // All other keys go to the TextArea editor
        _ => {
            app.draft_editor.input(key);
        }
    }
}
