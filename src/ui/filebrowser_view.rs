use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::theme;
use super::util::truncate_width;
use crate::app::{App, Pane};
use crate::model::filebrowser::RowKind;

pub fn draw_filebrowser(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    draw_tree_pane(f, chunks[0], app);
    draw_content_pane(f, chunks[1], app);
}

fn pane_border(active: bool) -> ratatui::style::Style {
    if active {
        theme::BORDER_ACTIVE
    } else {
        theme::BORDER_INACTIVE
    }
}

fn draw_tree_pane(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Files ")
        .borders(Borders::ALL)
        .border_style(pane_border(app.pane == Pane::Tree));

    if app.tree_rows.is_empty() {
        let message = if app.loading {
            "Reading folder..."
        } else if app.root.is_some() {
            "Empty folder"
        } else {
            "Press o to select a folder"
        };
        let p = Paragraph::new(message)
            .style(theme::EMPTY_STATE)
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let icons = theme::tree_icons(app.settings.ascii_icons());
    let items: Vec<ListItem> = app
        .tree_rows
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let (icon, style) = match row.kind {
                RowKind::Folder { expanded: true } => (icons.folder_open, theme::FB_DIR),
                RowKind::Folder { expanded: false } => (icons.folder_closed, theme::FB_DIR),
                RowKind::File(_) => (icons.file, theme::FB_FILE),
            };

            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::styled(icon, style),
                Span::styled(row.name.as_str(), style),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.tree_index));

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::LIST_SELECTED);

    f.render_stateful_widget(list, area, &mut state);
}

fn draw_content_pane(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.content_name {
        Some(ref name) => format!(" {} ", name),
        None => " File Content ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(pane_border(app.pane == Pane::Content));

    let Some(ref text) = app.content else {
        let p = Paragraph::new("Select a file to view")
            .style(theme::EMPTY_STATE)
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<&str> = text.lines().collect();
    let inner_height = inner.height as usize;
    let total = lines.len();
    let scroll_offset = app.content_scroll.min(total.saturating_sub(inner_height));
    let visible_end = (scroll_offset + inner_height).min(total);

    // Reserve space for line numbers (digits + 1 space)
    let num_width = total.max(1).to_string().len();
    let text_width = (inner.width as usize).saturating_sub(num_width + 1);

    let rendered: Vec<Line> = lines[scroll_offset..visible_end]
        .iter()
        .enumerate()
        .map(|(i, line_text)| {
            let num_str = format!("{:>width$} ", scroll_offset + i + 1, width = num_width);
            Line::from(vec![
                Span::styled(num_str, theme::FB_LINE_NUMBER),
                Span::styled(truncate_width(line_text, text_width), theme::LIST_NORMAL),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(rendered), inner);
}
