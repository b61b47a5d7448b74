//! Disk usage gauge for the root filesystem.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};

use crate::types::MetricsSnapshot;
use crate::ui::theme::level_color;
use crate::ui::util::format_bytes;

pub fn draw_disk(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&MetricsSnapshot>) {
    let block = Block::default().borders(Borders::ALL).title("Disk Usage");
    let Some(mm) = m else {
        f.render_widget(block, area);
        return;
    };
    let d = &mm.disk;
    let pct = d.used_percent.clamp(0.0, 100.0);
    let label = if d.total > 0 {
        format!(
            "{pct:.2}%  ({} used, {} free)",
            format_bytes(d.used),
            format_bytes(d.free)
        )
    } else {
        format!("{pct:.2}%")
    };
    let g = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(level_color(pct)))
        .percent(pct.round() as u16)
        .label(label);
    f.render_widget(g, area);
}
