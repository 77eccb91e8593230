use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme;
use super::util::centered_rect;

pub fn draw_help(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(area, 56, 20);

    // Clear background
    f.render_widget(Clear, popup_area);

    let bindings = [
        ("o", "Select folder"),
        ("j/k or Up/Down", "Navigate tree / scroll content"),
        ("Enter / l", "Open file / expand or collapse folder"),
        ("h / Left / Bksp", "Collapse folder / go to parent"),
        ("Tab", "Switch tree and content panes"),
        ("g / G", "Jump to top / bottom"),
        ("r", "Re-read the selected folder"),
        ("Ctrl+S", "Save .snyk (asks for a folder)"),
        ("Esc", "Cancel .snyk edit / close picker"),
        ("? / Ctrl+H", "Toggle this help"),
        ("q / Ctrl+C", "Quit"),
    ];

    let mut lines = vec![
        Line::from(Span::styled(" Keybindings", theme::HELP_TITLE)),
        Line::from(""),
    ];

    for (key, desc) in &bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:18}", key), theme::HELP_KEY),
            Span::styled(*desc, theme::HELP_DESC),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(theme::BORDER_ACTIVE);

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, popup_area);
}
