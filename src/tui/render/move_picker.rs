use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::api::Api;
use crate::tui::app::App;

use super::centered_rect;

/// Render the move-target picker popup.
pub fn render_move_picker<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let Some(picker) = &app.move_picker else {
        return;
    };

    let width = picker
        .choices
        .iter()
        .map(|c| c.label.len())
        .max()
        .unwrap_or(20)
        .max(20) as u16
        + 6;
    let height = (picker.choices.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect(area, width, height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Move to ")
        .style(Style::default().bg(app.theme.background).fg(app.theme.text));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let visible = inner.height as usize;
    let scroll = picker.cursor.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = picker
        .choices
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(i, choice)| {
            let style = if i == picker.cursor {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text).bg(app.theme.background)
            };
            Line::from(Span::styled(format!(" {} ", choice.label), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
