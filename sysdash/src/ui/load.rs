//! Load averages, uptime and host facts.

use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::types::MetricsSnapshot;
use crate::ui::util::format_uptime;

pub fn draw_load(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let block = Block::default().borders(Borders::ALL).title("System");
    let lines = match m {
        Some(mm) => vec![
            Line::from(format!(
                "Load: {:.2} {:.2} {:.2}",
                mm.load.load1, mm.load.load5, mm.load.load15
            )),
            Line::from(format!("Uptime: {}", format_uptime(mm.host.uptime))),
            Line::from(format!("OS: {}", mm.host.os)),
        ],
        None => vec![Line::from("Loading...")],
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}
