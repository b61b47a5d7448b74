//! Notification toasts, stacked in the top-right corner of the content.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::notify::{Notifications, Severity};
use crate::ui::theme::severity_color;

const MAX_WIDTH: u16 = 60;

fn tag(s: Severity) -> &'static str {
    match s {
        Severity::Info => "INFO",
        Severity::Warning => "WARN",
        Severity::Error => "ERROR",
    }
}

pub fn toast_area(area: Rect, count: usize) -> Option<Rect> {
    if count == 0 || area.width < 10 || area.height < 3 {
        return None;
    }
    let width = area.width.min(MAX_WIDTH);
    let height = (count as u16 * 2 + 2).min(area.height);
    Some(Rect::new(area.x + area.width - width, area.y, width, height))
}

pub fn draw_toasts(f: &mut ratatui::Frame<'_>, area: Rect, notes: &Notifications) {
    let Some(rect) = toast_area(area, notes.len()) else { return };
    let lines: Vec<Line> = notes
        .iter()
        .map(|n| {
            let color = severity_color(n.severity);
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", tag(n.severity)),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(n.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect();
    f.render_widget(Clear, rect);
    let p = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Notifications (x to dismiss)"),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(p, rect);
}
