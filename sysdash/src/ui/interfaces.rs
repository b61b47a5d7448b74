//! Network interfaces list.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::types::NetworkInterfaces;

pub fn interface_lines(ifaces: &NetworkInterfaces) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for i in &ifaces.interfaces {
        lines.push(Line::from(Span::styled(
            format!("Interface: {}", i.name),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  Mac Address: {}", i.mac_address)));
        for ip in &i.ips {
            lines.push(Line::from(format!("  {ip}")));
        }
    }
    lines
}

pub fn draw_interfaces(f: &mut ratatui::Frame<'_>, area: Rect, ifaces: Option<&NetworkInterfaces>) {
    let block = Block::default().borders(Borders::ALL).title("Network Interfaces");
    let lines = match ifaces {
        Some(n) => interface_lines(n),
        None => vec![Line::from("Loading...")],
    };
    f.render_widget(Paragraph::new(lines).block(block), area);
}
