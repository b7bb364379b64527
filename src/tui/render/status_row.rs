use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::api::Api;
use crate::tui::app::{App, Mode, SyncState};

/// Render the status row (bottom of screen)
pub fn render_status_row<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // Left side: transient message, or mode hints
    let left = match &app.status_message {
        Some(message) => Span::styled(
            format!(" {message}"),
            Style::default()
                .fg(if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.green
                })
                .bg(bg),
        ),
        None => {
            let hint = match app.mode {
                Mode::Navigate => "c complete  d delete  m move  p priority  v select  u undo  ? help",
                Mode::Select => "space toggle  a all  c complete  d delete  m move  esc cancel",
                Mode::MovePick => "j/k choose destination  enter confirm  esc cancel",
            };
            Span::styled(format!(" {hint}"), Style::default().fg(app.theme.dim).bg(bg))
        }
    };

    // Right side: selection count, task count, grouping, sync indicator
    let mut parts: Vec<String> = Vec::new();
    if !app.cursor.selected.is_empty() {
        parts.push(format!("{} selected", app.cursor.selected.len()));
    }
    let count = app.store.view().len();
    parts.push(format!("{count} task{}", if count == 1 { "" } else { "s" }));
    parts.push(app.group_mode.label().to_string());
    if app.sync_state == SyncState::Syncing {
        parts.push("syncing…".to_string());
    }
    let right_text = format!("{} ", parts.join("  ·  "));
    let right = Span::styled(right_text, Style::default().fg(app.theme.dim).bg(bg));

    let mut spans = vec![left];
    let used = spans[0].content.width() + right.content.width();
    if used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(bg),
        ));
        spans.push(right);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
