use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::api::Api;
use crate::tui::app::App;

use super::centered_rect;

const KEYS: &[(&str, &str)] = &[
    ("j / k", "move down / up"),
    ("g / G", "first / last task"),
    ("tab / shift-tab", "next / previous tab"),
    ("s", "cycle grouping (flat / status / section)"),
    ("c", "complete task or selection"),
    ("d d", "delete task or selection"),
    ("m", "move to project or section"),
    ("p", "cycle priority"),
    ("v", "select mode (space toggles, a selects all)"),
    ("u", "undo last complete"),
    ("r", "resync from service"),
    ("q", "quit"),
];

/// Render the help overlay.
pub fn render_help_overlay<A: Api>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let height = (KEYS.len() as u16 + 4).min(area.height);
    let popup = centered_rect(area, 56.min(area.width), height);

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Keys ")
        .style(Style::default().bg(app.theme.background).fg(app.theme.text));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::default()];
    for (key, action) in KEYS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {key:>14}  "),
                Style::default()
                    .fg(app.theme.cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*action, Style::default().fg(app.theme.text)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
