use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme;
use super::util::centered_rect;
use crate::app::App;

/// Draw the `.snyk` editor overlay.
pub fn draw_config_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(area, 80, 20);

    // Clear background
    f.render_widget(Clear, popup_area);

    // Split into title bar, editor area, and hint bar
    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Min(3),    // editor
            Constraint::Length(2), // hints
        ])
        .split(popup_area);

    let title_block = Block::default()
        .title(" Edit .snyk Content ")
        .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
        .border_style(theme::POPUP_BORDER);
    f.render_widget(Paragraph::new("").block(title_block), inner_chunks[0]);

    let editor_block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT)
        .border_style(theme::POPUP_BORDER);

    let mut editor = app.draft_editor.clone();
    editor.set_block(editor_block);
    editor.set_cursor_line_style(theme::POPUP_CURSOR_LINE);
    editor.set_style(theme::POPUP_EDITOR_TEXT);
    f.render_widget(&editor, inner_chunks[1]);

    let save_label = if app.save_pending { ": Saving...  " } else { ": Save  " };
    let hints = Line::from(vec![
        Span::styled(" Ctrl+S", theme::HELP_KEY),
        Span::styled(save_label, theme::HELP_DESC),
        Span::styled("Esc", theme::HELP_KEY),
        Span::styled(": Cancel ", theme::HELP_DESC),
    ]);
    let hint_block = Block::default()
        .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
        .border_style(theme::POPUP_BORDER);
    f.render_widget(Paragraph::new(hints).block(hint_block), inner_chunks[2]);
}
