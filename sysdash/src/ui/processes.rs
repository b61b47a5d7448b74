//! Processes table with per-cell coloring, sorting, and a scrollbar.

use ratatui::style::Modifier;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};
use std::cmp::Ordering;

use crate::types::{MetricsSnapshot, ProcessEntry};
use crate::ui::scroll::draw_scrollbar;
use crate::ui::theme::panel_border;
use crate::ui::util::inner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcSortBy {
    /// Keep the order the server sent.
    #[default]
    Payload,
    CpuDesc,
    MemDesc,
}

// Shared by drawing and hit-testing so header clicks line up.
const COLS: [Constraint; 5] = [
    Constraint::Length(8),      // PID
    Constraint::Length(12),     // User
    Constraint::Percentage(40), // Name
    Constraint::Length(8),      // CPU %
    Constraint::Length(8),      // Mem %
];

/// Table area inside the border, leaving two columns for the scrollbar.
fn content_area(area: Rect) -> Rect {
    let inner = inner(area);
    Rect {
        width: inner.width.saturating_sub(2),
        ..inner
    }
}

/// Body rows visible below the header.
pub fn viewport_rows(area: Rect) -> usize {
    content_area(area).height.saturating_sub(1) as usize
}

/// Row order for display.
pub fn sorted(procs: &[ProcessEntry], sort_by: ProcSortBy) -> Vec<&ProcessEntry> {
    let mut v: Vec<&ProcessEntry> = procs.iter().collect();
    match sort_by {
        ProcSortBy::Payload => {}
        ProcSortBy::CpuDesc => {
            v.sort_by(|a, b| b.cpu_usage.partial_cmp(&a.cpu_usage).unwrap_or(Ordering::Equal))
        }
        ProcSortBy::MemDesc => {
            v.sort_by(|a, b| b.mem_usage.partial_cmp(&a.mem_usage).unwrap_or(Ordering::Equal))
        }
    }
    v
}

pub fn draw_processes(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    m: Option<&MetricsSnapshot>,
    scroll_offset: usize,
    sort_by: ProcSortBy,
    focused: bool,
) {
    let total = m.map_or(0, |mm| mm.processes.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title(format!("Processes ({total} total)"));
    f.render_widget(block, area);
    let Some(mm) = m else { return };

    let inner = inner(area);
    if inner.height < 1 || inner.width < 3 {
        return;
    }
    let content = content_area(area);

    let rows = sorted(&mm.processes, sort_by);
    let viewport = viewport_rows(area);
    let offset = scroll_offset.min(rows.len().saturating_sub(viewport));
    let peak_cpu = mm.processes.iter().map(|p| p.cpu_usage).fold(0.0_f64, f64::max);

    let body = rows.iter().skip(offset).take(viewport).map(|p| {
        let cpu_fg = match p.cpu_usage {
            x if x < 25.0 => Color::Green,
            x if x < 60.0 => Color::Yellow,
            _ => Color::Red,
        };
        let mem_fg = match p.mem_usage {
            x if x < 5.0 => Color::Blue,
            x if x < 20.0 => Color::Magenta,
            _ => Color::Red,
        };
        let emphasis = if peak_cpu > 0.0 && (p.cpu_usage - peak_cpu).abs() < f64::EPSILON {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(p.pid.to_string()).style(Style::default().fg(Color::DarkGray)),
            Cell::from(p.username.clone()),
            Cell::from(p.name.clone()),
            Cell::from(format!("{:>5.2}", p.cpu_usage)).style(Style::default().fg(cpu_fg)),
            Cell::from(format!("{:>5.2}", p.mem_usage)).style(Style::default().fg(mem_fg)),
        ])
        .style(emphasis)
    });

    let cpu_hdr = match sort_by {
        ProcSortBy::CpuDesc => "CPU % •",
        _ => "CPU %",
    };
    let mem_hdr = match sort_by {
        ProcSortBy::MemDesc => "Mem % •",
        _ => "Mem %",
    };
    let header = Row::new(vec!["PID", "User", "Name", cpu_hdr, mem_hdr])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let table = Table::new(body, COLS.to_vec()).header(header).column_spacing(1);
    f.render_widget(table, content);

    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    draw_scrollbar(f, scroll_area, offset, viewport, rows.len());
}

/// Sort order selected by a click on the "CPU %" or "Mem %" header.
pub fn sort_hit(area: Rect, column: u16, row: u16) -> Option<ProcSortBy> {
    let content = content_area(area);
    if content.width == 0 || row != content.y {
        return None;
    }
    let header = Rect {
        height: 1,
        ..content
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(COLS.to_vec())
        .spacing(1)
        .split(header);
    let within = |r: Rect| column >= r.x && column < r.x + r.width;
    if within(cols[3]) {
        Some(ProcSortBy::CpuDesc)
    } else if within(cols[4]) {
        Some(ProcSortBy::MemDesc)
    } else {
        None
    }
}
