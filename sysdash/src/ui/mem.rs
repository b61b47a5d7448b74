//! Memory gauge.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

use crate::types::MetricsSnapshot;
use crate::ui::util::format_bytes;

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let (pct, label) = match m {
        Some(mm) => {
            let pct = mm.memory.used_percent.clamp(0.0, 100.0);
            let label = if mm.memory.total > 0 {
                format!(
                    "{pct:.2}%  ({} / {})",
                    format_bytes(mm.memory.used),
                    format_bytes(mm.memory.total)
                )
            } else {
                format!("{pct:.2}%")
            };
            (pct, label)
        }
        None => (0.0, String::new()),
    };
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Memory Usage"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(pct.round() as u16)
        .label(label);
    f.render_widget(g, area);
}
