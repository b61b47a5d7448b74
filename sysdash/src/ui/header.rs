//! Top header: title line and the navigation tabs.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::dashboard::View;

/// Nav entries in display order: label, target marker, shortcut key.
/// Home carries no marker and therefore routes to the root view.
pub const NAV: [(&str, Option<&str>, char); 4] = [
    ("Home", None, '0'),
    ("Dashboard", Some("dashboard"), '1'),
    ("Firewall", Some("firewall"), '2'),
    ("Settings", Some("settings"), '3'),
];

fn is_current(view: View, marker: Option<&str>) -> bool {
    match (view, marker) {
        (View::Home, None) => true,
        (View::Page(p), Some(m)) => p.marker() == m,
        _ => false,
    }
}

/// Screen positions of the tabs, for hit-testing.
pub fn nav_rects(area: Rect) -> Vec<(Rect, Option<&'static str>)> {
    let y = area.y + 1;
    let mut x = area.x + 1;
    NAV.iter()
        .map(|(label, marker, _)| {
            let w = (label.len() + 4) as u16;
            let r = Rect::new(x, y, w.min((area.x + area.width).saturating_sub(x)), 1);
            x = x.saturating_add(w + 1);
            (r, *marker)
        })
        .collect()
}

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, view: View, host: Option<&str>, base_url: &str) {
    let title = match host {
        Some(h) if !h.is_empty() => format!("sysdash | host: {h} | {base_url}  (press 'q' to quit)"),
        _ => format!("sysdash | {base_url}  (press 'q' to quit)"),
    };
    let block = Block::default().title(title);
    f.render_widget(block, area);

    let mut spans = Vec::new();
    for (label, marker, key) in NAV {
        let style = if is_current(view, marker) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {key} {label} "), style));
        spans.push(Span::raw(" "));
    }
    let tabs = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(1),
        height: 1,
    };
    if area.height >= 2 {
        f.render_widget(Paragraph::new(Line::from(spans)), tabs);
    }
}
