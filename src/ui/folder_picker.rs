use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme;
use super::util::centered_rect;
use crate::app::{FolderPicker, PickerPurpose};

pub fn draw_folder_picker(f: &mut Frame, area: Rect, picker: &FolderPicker) {
    let popup_area = centered_rect(area, 70, 5);
    f.render_widget(Clear, popup_area);

    let title = match picker.purpose {
        PickerPurpose::SelectFolder => " Select Folder ",
        PickerPurpose::SaveConfig => " Save .snyk To Folder ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme::PICKER_BORDER);
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // path input
            Constraint::Length(1), // spacer
            Constraint::Length(1), // hints
        ])
        .split(inner);

    let mut input = picker.input.clone();
    input.set_style(theme::PICKER_INPUT);
    input.set_cursor_line_style(ratatui::style::Style::new());
    f.render_widget(&input, rows[0]);

    let hints = Line::from(vec![
        Span::styled("Enter", theme::HELP_KEY),
        Span::styled(": Choose  ", theme::HELP_DESC),
        Span::styled("Esc", theme::HELP_KEY),
        Span::styled(": Cancel", theme::HELP_DESC),
    ]);
    f.render_widget(Paragraph::new(hints), rows[2]);
}
