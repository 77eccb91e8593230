use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{config_popup, filebrowser_view, folder_picker, help_overlay, theme};
use crate::app::{App, Pane};

pub fn draw_layout(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(3),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_title_bar(f, chunks[0], app);
    filebrowser_view::draw_filebrowser(f, chunks[1], app);
    draw_status_bar(f, chunks[2], app);

    if app.popup_visible {
        config_popup::draw_config_popup(f, f.area(), app);
    }

    // The picker opens on top of the popup when saving.
    if let Some(ref picker) = app.picker {
        folder_picker::draw_folder_picker(f, f.area(), picker);
    }

    // Help overlay (on top of everything)
    if app.show_help {
        help_overlay::draw_help(f, f.area());
    }
}

fn draw_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let folder = match app.root {
        Some(ref root) => format!(" {} ", root.path().display()),
        None => " no folder selected ".to_string(),
    };
    let spans = vec![
        Span::styled(" File Structure Viewer ", theme::TITLE),
        Span::styled(folder, theme::TITLE_PATH),
    ];
    let used: usize = spans.iter().map(|s| s.width()).sum();

    let mut line = spans;
    line.push(Span::styled(
        " ".repeat((area.width as usize).saturating_sub(used)),
        theme::STATUS_BAR,
    ));
    f.render_widget(Paragraph::new(Line::from(line)), area);
}

fn hint_text(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.picker.is_some() {
        return vec![("Enter", "choose"), ("Esc", "cancel")];
    }
    if app.popup_visible {
        return vec![("^S", "save"), ("Esc", "cancel")];
    }
    let mut hints = vec![("o", "open folder")];
    match app.pane {
        Pane::Tree => hints.extend([("j/k", "nav"), ("Enter", "open"), ("Bksp", "up")]),
        Pane::Content => hints.extend([("j/k", "scroll")]),
    }
    hints.extend([("Tab", "pane"), ("r", "refresh"), ("^H", "help")]);
    hints
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut left_spans: Vec<Span> = Vec::new();

    if app.loading {
        left_spans.push(Span::styled(" LOADING ", theme::BADGE_BUSY));
    }
    if app.save_pending {
        left_spans.push(Span::styled(" SAVING ", theme::BADGE_BUSY));
    }
    if app.popup_visible {
        left_spans.push(Span::styled(" EDIT .snyk ", theme::BADGE_EDIT));
    }

    // Build right-aligned hint spans
    let hints = hint_text(app);
    let mut hint_spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            hint_spans.push(Span::styled("  ", theme::STATUS_BAR));
        }
        hint_spans.push(Span::styled(*key, theme::HINT_KEY));
        hint_spans.push(Span::styled(":", theme::HINT_DESC));
        hint_spans.push(Span::styled(*desc, theme::HINT_DESC));
    }
    hint_spans.push(Span::styled(" ", theme::STATUS_BAR));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let hint_width: usize = hint_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + hint_width);

    let mut spans = left_spans;
    spans.push(Span::styled(" ".repeat(gap), theme::STATUS_BAR));
    spans.extend(hint_spans);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
