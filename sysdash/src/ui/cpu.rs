//! CPU usage sparkline.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};
use std::collections::VecDeque;

use crate::types::MetricsSnapshot;

pub fn draw_cpu(f: &mut ratatui::Frame<'_>, area: Rect, hist: &VecDeque<u64>, m: Option<&MetricsSnapshot>) {
    let title = match m {
        Some(mm) => format!("CPU Usage: {:.2}%", mm.cpu.usage),
        None => "CPU Usage".into(),
    };
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(spark, area);
}
