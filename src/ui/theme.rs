use ratatui::style::{Color, Modifier, Style};

// Title bar
pub const TITLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);
pub const TITLE_PATH: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

// Status bar
pub const STATUS_BAR: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

// List items
pub const LIST_SELECTED: Style = Style::new()
    .fg(Color::White)
    .bg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);
pub const LIST_NORMAL: Style = Style::new().fg(Color::White);

// Borders
pub const BORDER_ACTIVE: Style = Style::new().fg(Color::Cyan);
pub const BORDER_INACTIVE: Style = Style::new().fg(Color::DarkGray);

// Help overlay
pub const HELP_TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const HELP_KEY: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const HELP_DESC: Style = Style::new().fg(Color::White);

// Footer hints
pub const HINT_KEY: Style = Style::new().fg(Color::Yellow).bg(Color::DarkGray);
pub const HINT_DESC: Style = Style::new().fg(Color::Gray).bg(Color::DarkGray);

// Mode badges
pub const BADGE_BUSY: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Green)
    .add_modifier(Modifier::BOLD);
pub const BADGE_EDIT: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

// Empty state
pub const EMPTY_STATE: Style = Style::new().fg(Color::DarkGray);

// File browser
pub const FB_DIR: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const FB_FILE: Style = Style::new().fg(Color::White);
pub const FB_LINE_NUMBER: Style = Style::new().fg(Color::DarkGray);

// Config popup
pub const POPUP_BORDER: Style = Style::new().fg(Color::Yellow);
pub const POPUP_CURSOR_LINE: Style = Style::new();
pub const POPUP_EDITOR_TEXT: Style = Style::new().fg(Color::White);

// Folder picker
pub const PICKER_BORDER: Style = Style::new().fg(Color::Magenta);
pub const PICKER_INPUT: Style = Style::new().fg(Color::Yellow);

pub struct TreeIcons {
    pub folder_closed: &'static str,
    pub folder_open: &'static str,
    pub file: &'static str,
}

pub const EMOJI_ICONS: TreeIcons = TreeIcons {
    folder_closed: "📁 ",
    folder_open: "📂 ",
    file: "📄 ",
};

pub const ASCII_ICONS: TreeIcons = TreeIcons {
    folder_closed: "> ",
    folder_open: "v ",
    file: "  ",
};

pub fn tree_icons(ascii: bool) -> &'static TreeIcons {
    if ascii {
        &ASCII_ICONS
    } else {
        &EMOJI_ICONS
    }
}
