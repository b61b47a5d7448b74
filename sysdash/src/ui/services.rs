//! Services panel: one card per service with its action buttons.
//!
//! Rows keep the service's name; the dashboard resolves a pressed
//! button to `(row, action)` through [`button_hit`] or the keyboard
//! selection, so individual buttons carry no handlers of their own.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::dashboard::ServicesPanel;
use crate::types::{ServiceAction, ServicesPayload};
use crate::ui::theme::{panel_border, selected_row, BUTTON};
use crate::ui::util::inner;

const ROW_HEIGHT: u16 = 3;
const BUTTON_INDENT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub label: &'static str,
    pub action: ServiceAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRow {
    pub name: String,
    pub status: String,
    pub buttons: [ActionButton; 5],
}

pub fn service_rows(payload: &ServicesPayload) -> Vec<ServiceRow> {
    payload
        .values()
        .map(|svc| ServiceRow {
            name: svc.name.clone(),
            status: svc.status.clone(),
            buttons: ServiceAction::ALL.map(|action| ActionButton {
                label: action.label(),
                action,
            }),
        })
        .collect()
}

/// First row shown so that `selected` stays visible.
fn first_visible(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    (selected + 1).saturating_sub(visible)
}

/// Horizontal span `[start, end)` of each button, relative to the row.
fn button_spans(buttons: &[ActionButton]) -> Vec<(u16, u16)> {
    let mut x = BUTTON_INDENT;
    buttons
        .iter()
        .map(|b| {
            let w = b.label.len() as u16 + 2;
            let span = (x, x + w);
            x += w + 1;
            span
        })
        .collect()
}

pub fn draw_services(f: &mut ratatui::Frame<'_>, area: Rect, panel: &ServicesPanel, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title("Service Management");
    f.render_widget(block, area);
    let inner = inner(area);
    let Some(rows) = panel.rows.as_ref() else {
        f.render_widget(Paragraph::new("Loading..."), inner);
        return;
    };
    if rows.is_empty() {
        f.render_widget(Paragraph::new("No services"), inner);
        return;
    }
    let visible = (inner.height / ROW_HEIGHT) as usize;
    let first = first_visible(panel.selected, visible);

    let mut lines: Vec<Line> = Vec::new();
    for (i, row) in rows.iter().enumerate().skip(first).take(visible) {
        let is_sel = focused && i == panel.selected;
        let title_style = if is_sel {
            selected_row()
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(format!("Service: {}", row.name), title_style)));
        lines.push(Line::from(format!("Status: {}", row.status)));

        let mut spans = vec![Span::raw(" ".repeat(BUTTON_INDENT as usize))];
        for (bi, b) in row.buttons.iter().enumerate() {
            let mut style = Style::default().fg(BUTTON);
            if is_sel && bi == panel.action {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!("[{}]", b.label), style));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

/// Resolve a click at (`column`, `row`) to the button under it.
pub fn button_hit(area: Rect, panel: &ServicesPanel, column: u16, row: u16) -> Option<(usize, ServiceAction)> {
    let inner = inner(area);
    let rows = panel.rows.as_ref()?;
    if row < inner.y || row >= inner.y + inner.height || column < inner.x {
        return None;
    }
    let visible = (inner.height / ROW_HEIGHT) as usize;
    let line = row - inner.y;
    if line % ROW_HEIGHT != ROW_HEIGHT - 1 {
        return None;
    }
    let idx = first_visible(panel.selected, visible) + (line / ROW_HEIGHT) as usize;
    let svc = rows.get(idx)?;
    let rel = column - inner.x;
    button_spans(&svc.buttons)
        .into_iter()
        .zip(svc.buttons.iter())
        .find(|((start, end), _)| rel >= *start && rel < *end)
        .map(|(_, b)| (idx, b.action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServiceEntry;

    fn panel() -> ServicesPanel {
        let mut p = ServicesPayload::new();
        p.insert(
            "svc-1".into(),
            ServiceEntry {
                name: "nginx".into(),
                status: "STARTED".into(),
            },
        );
        p.insert(
            "svc-2".into(),
            ServiceEntry {
                name: "redis".into(),
                status: "STOPPED".into(),
            },
        );
        ServicesPanel {
            rows: Some(service_rows(&p)),
            ..Default::default()
        }
    }

    #[test]
    fn rows_follow_payload_key_order() {
        let p = panel();
        let names: Vec<_> = p.rows.unwrap().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, ["nginx", "redis"]);
    }

    #[test]
    fn clicks_on_button_line_resolve_row_and_action() {
        let p = panel();
        let area = Rect::new(0, 0, 60, 10);
        // second card's button line: border + 3 + 2
        let y = 1 + ROW_HEIGHT + 2;
        // "[Install] " spans columns 3..12 (border + indent)
        assert_eq!(button_hit(area, &p, 3, y), Some((1, ServiceAction::Install)));
        // "[Start]" follows after one space
        assert_eq!(button_hit(area, &p, 13, y), Some((1, ServiceAction::Start)));
        // the gap between buttons
        assert_eq!(button_hit(area, &p, 12, y), None);
        // status line is not clickable
        assert_eq!(button_hit(area, &p, 3, y - 1), None);
    }

    #[test]
    fn selection_stays_visible() {
        assert_eq!(first_visible(0, 3), 0);
        assert_eq!(first_visible(2, 3), 0);
        assert_eq!(first_visible(5, 3), 3);
    }
}
