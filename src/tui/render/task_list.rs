use chrono::{Local, NaiveDate};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::api::Api;
use crate::model::Task;
use crate::store::ViewFilter;
use crate::tui::app::App;
use crate::tui::projection::Slot;

/// Render the ordered display sequence.
pub fn render_task_list<A: Api>(frame: &mut Frame, app: &mut App<A>, area: Rect) {
    let height = area.height as usize;
    app.list_height = height;
    clamp_scroll(app, height);

    if !app.projection.has_task_slots() {
        let line = Line::from(Span::styled(
            "  No tasks here — all clear",
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let today = Local::now().date_naive();
    let show_project = !matches!(app.filter(), ViewFilter::Project(_));
    let scroll = app.cursor.scroll;
    let mut lines: Vec<Line> = Vec::with_capacity(height);
    for (pos, slot) in app
        .projection
        .slots
        .iter()
        .enumerate()
        .skip(scroll)
        .take(height)
    {
        lines.push(match slot {
            Slot::Task { view_idx } => match app.store.view_task(*view_idx) {
                Some(task) => task_line(app, task, pos == app.cursor.cursor, show_project, today, area.width),
                None => Line::default(),
            },
            Slot::Header { title, .. } => header_line(app, title, area.width),
            Slot::Blank => Line::default(),
        });
    }
    frame.render_widget(Paragraph::new(lines), area);
}

/// Keep the cursor inside the visible window.
fn clamp_scroll<A: Api>(app: &mut App<A>, height: usize) {
    if height == 0 {
        return;
    }
    let scroll = &mut app.cursor.scroll;
    *scroll = (*scroll).min(app.projection.len().saturating_sub(1));
    if app.cursor.cursor < *scroll {
        *scroll = app.cursor.cursor;
    } else if app.cursor.cursor >= *scroll + height {
        *scroll = app.cursor.cursor + 1 - height;
    }
}

fn header_line<'a, A: Api>(app: &App<A>, title: &'a str, width: u16) -> Line<'a> {
    let bg = app.theme.background;
    let mut spans = vec![Span::styled(
        format!(" {title} "),
        Style::default()
            .fg(app.theme.header)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    let used = title.width() + 2;
    let rule_width = (width as usize).saturating_sub(used + 1);
    if rule_width > 0 {
        spans.push(Span::styled(
            "─".repeat(rule_width),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    Line::from(spans)
}

fn task_line<'a, A: Api>(
    app: &App<A>,
    task: &'a Task,
    is_cursor: bool,
    show_project: bool,
    today: NaiveDate,
    width: u16,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let text_fg = if is_cursor {
        app.theme.text_bright
    } else {
        app.theme.text
    };
    let mut spans: Vec<Span> = Vec::new();

    // Selection marker
    let selected = app.cursor.selected.contains(&task.id);
    spans.push(Span::styled(
        if selected { " ●" } else { "  " },
        Style::default().fg(app.theme.highlight).bg(bg),
    ));
    spans.push(Span::styled("[ ] ", Style::default().fg(app.theme.dim).bg(bg)));

    // Priority badge for anything above the default
    if task.priority.0 > 1 {
        spans.push(Span::styled(
            format!("{} ", task.priority.label()),
            Style::default()
                .fg(app.theme.priority_color(task.priority.0))
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        task.content.as_str(),
        Style::default().fg(text_fg).bg(bg),
    ));

    for label in &task.labels {
        spans.push(Span::styled(
            format!(" @{label}"),
            Style::default().fg(app.theme.purple).bg(bg),
        ));
    }

    if let Some(due) = &task.due {
        let (text, color) = due_text(due.date, due.recurring, today, app);
        spans.push(Span::styled(
            format!("  {text}"),
            Style::default().fg(color).bg(bg),
        ));
    }

    if show_project {
        spans.push(Span::styled(
            format!("  #{}", app.store.catalog.project_name(&task.project_id)),
            Style::default().fg(app.theme.cyan).bg(bg),
        ));
    }

    // Pad the cursor row so the highlight spans the full width
    if is_cursor {
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let pad = (width as usize).saturating_sub(used);
        if pad > 0 {
            spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        }
    }

    Line::from(spans)
}

/// Human-readable due text and its color.
fn due_text<A: Api>(
    date: NaiveDate,
    recurring: bool,
    today: NaiveDate,
    app: &App<A>,
) -> (String, ratatui::style::Color) {
    let days = (date - today).num_days();
    let mut text = match days {
        ..0 => {
            let overdue = -days;
            if overdue == 1 {
                "yesterday".to_string()
            } else {
                format!("{overdue}d overdue")
            }
        }
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        2..=7 => format!("in {days}d"),
        _ => date.format("%b %-d").to_string(),
    };
    if recurring {
        text.push_str(" ⟳");
    }
    let color = match days {
        ..0 => app.theme.red,
        0 => app.theme.yellow,
        _ => app.theme.green,
    };
    (text, color)
}
