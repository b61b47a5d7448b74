//! Home (root) view and the placeholder pages.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::router::Page;

pub fn draw_home(f: &mut ratatui::Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("sysdash", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Press 1 (or click Dashboard) to open the system dashboard."),
        Line::from("2 Firewall, 3 Settings, 0 returns here."),
        Line::from(""),
        Line::from("Tab cycles panels, Enter activates, n opens the task form, x dismisses notifications."),
    ];
    let p = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Home"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

pub fn draw_placeholder(f: &mut ratatui::Frame<'_>, area: Rect, page: Page) {
    let text = page.placeholder().unwrap_or_default();
    let p = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(page.title()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
