//! Network totals and throughput sparklines.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
};
use std::collections::VecDeque;

use crate::types::MetricsSnapshot;
use crate::ui::util::format_bytes;

pub fn draw_net(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: Option<&MetricsSnapshot>,
    rx_hist: &VecDeque<u64>,
    tx_hist: &VecDeque<u64>,
) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let (recv, sent) = match m {
        Some(mm) => (
            format_bytes(mm.network.bytes_recv),
            format_bytes(mm.network.bytes_sent),
        ),
        None => ("-".into(), "-".into()),
    };
    let rx_now = rx_hist.back().copied().unwrap_or(0);
    let tx_now = tx_hist.back().copied().unwrap_or(0);
    draw_net_spark(
        f,
        halves[0],
        &format!("Bytes Received: {recv}  ({rx_now} KB/s)"),
        rx_hist,
        Color::Green,
    );
    draw_net_spark(
        f,
        halves[1],
        &format!("Bytes Sent: {sent}  ({tx_now} KB/s)"),
        tx_hist,
        Color::Blue,
    );
}

fn draw_net_spark(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, hist: &VecDeque<u64>, color: Color) {
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();

    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .data(&data)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}
