//! Tasks panel and the "Schedule New Task" form.

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::dashboard::{ClickTarget, TasksPanel};
use crate::form::{FormField, TaskForm};
use crate::types::TasksPayload;
use crate::ui::theme::{panel_border, selected_row, BUTTON, DANGER};
use crate::ui::util::{inner, truncate_middle};

const DELETE_LABEL: &str = "[X]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: u64,
    pub description: String,
    pub is_finished: bool,
    pub run_time: Option<DateTime<Utc>>,
}

/// Rows ordered by task id.
pub fn task_rows(payload: &TasksPayload) -> Vec<TaskRow> {
    let mut rows: Vec<TaskRow> = payload
        .values()
        .map(|t| TaskRow {
            id: t.id,
            description: t.description.clone(),
            is_finished: t.is_finished,
            run_time: t.run_time,
        })
        .collect();
    rows.sort_by_key(|r| r.id);
    rows
}

fn first_visible(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    (selected + 1).saturating_sub(visible)
}

pub fn draw_tasks(f: &mut ratatui::Frame<'_>, area: Rect, panel: &TasksPanel, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title("Scheduled Tasks");
    f.render_widget(block, area);
    let inner = inner(area);
    let Some(rows) = panel.rows.as_ref() else {
        f.render_widget(Paragraph::new("Loading..."), inner);
        return;
    };
    if rows.is_empty() {
        f.render_widget(Paragraph::new("No tasks scheduled"), inner);
        return;
    }
    let visible = inner.height as usize;
    let first = first_visible(panel.selected, visible);
    let text_width = inner.width.saturating_sub(DELETE_LABEL.len() as u16 + 1) as usize;

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(i, t)| {
            let when = t
                .run_time
                .map(|rt| rt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".into());
            let text = format!(
                "Description: {}  Finished? {}  Runs: {when}",
                t.description, t.is_finished
            );
            let text = truncate_middle(&text, text_width);
            let pad = text_width.saturating_sub(text.chars().count());
            let style = if focused && i == panel.selected {
                selected_row()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(text, style),
                Span::raw(" ".repeat(pad + 1)),
                Span::styled(DELETE_LABEL, Style::default().fg(DANGER)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Row whose delete button sits under (`column`, `row`).
pub fn delete_hit(area: Rect, panel: &TasksPanel, column: u16, row: u16) -> Option<usize> {
    let inner = inner(area);
    let rows = panel.rows.as_ref()?;
    if row < inner.y || row >= inner.y + inner.height {
        return None;
    }
    let right = inner.x + inner.width;
    let start = right.saturating_sub(DELETE_LABEL.len() as u16);
    if column < start || column >= right {
        return None;
    }
    let idx = first_visible(panel.selected, inner.height as usize) + (row - inner.y) as usize;
    (idx < rows.len()).then_some(idx)
}

/// Description input, schedule input and the Schedule button.
fn form_cells(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(30),
            Constraint::Length(12),
        ])
        .split(inner(area))
}

pub fn draw_task_form(f: &mut ratatui::Frame<'_>, area: Rect, form: &TaskForm, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(panel_border(focused))
        .title("Schedule New Task");
    f.render_widget(block, area);
    let cells = form_cells(area);

    let input = |label: &str, value: &str, field: FormField| {
        let active = focused && form.field == field;
        let value_style = if active {
            Style::default().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("{value}{cursor}"), value_style),
        ])
    };
    f.render_widget(
        Paragraph::new(input("Description", &form.description, FormField::Description)),
        cells[0],
    );
    let schedule_hint = if form.schedule.is_empty() && !(focused && form.field == FormField::Schedule) {
        "YYYY-MM-DDTHH:MM"
    } else {
        form.schedule.as_str()
    };
    f.render_widget(
        Paragraph::new(input("Schedule", schedule_hint, FormField::Schedule)),
        cells[1],
    );
    f.render_widget(
        Paragraph::new(Span::styled("[Schedule]", Style::default().fg(BUTTON))),
        cells[2],
    );
}

pub fn form_hit(area: Rect, column: u16, row: u16) -> Option<ClickTarget> {
    let cells = form_cells(area);
    let within = |r: Rect| column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height;
    if within(cells[0]) {
        Some(ClickTarget::FormInput(FormField::Description))
    } else if within(cells[1]) {
        Some(ClickTarget::FormInput(FormField::Schedule))
    } else if within(cells[2]) {
        Some(ClickTarget::ScheduleButton)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskEntry;

    fn payload() -> TasksPayload {
        let mut p = TasksPayload::new();
        // map order ("10" < "9") differs from id order
        for id in [10u64, 9] {
            p.insert(
                id.to_string(),
                TaskEntry {
                    id,
                    description: format!("task {id}"),
                    is_finished: id == 9,
                    run_time: None,
                },
            );
        }
        p
    }

    #[test]
    fn rows_sorted_by_numeric_id() {
        let ids: Vec<u64> = task_rows(&payload()).iter().map(|r| r.id).collect();
        assert_eq!(ids, [9, 10]);
    }

    #[test]
    fn delete_hit_only_on_the_x() {
        let panel = TasksPanel {
            rows: Some(task_rows(&payload())),
            selected: 0,
        };
        let area = Rect::new(0, 0, 50, 6);
        // inner spans x 1..49, so [X] covers 46..49
        assert_eq!(delete_hit(area, &panel, 46, 2), Some(1));
        assert_eq!(delete_hit(area, &panel, 48, 1), Some(0));
        assert_eq!(delete_hit(area, &panel, 30, 1), None);
        // past the last row
        assert_eq!(delete_hit(area, &panel, 46, 3), None);
    }

    #[test]
    fn form_regions() {
        let area = Rect::new(0, 0, 100, 3);
        assert_eq!(form_hit(area, 2, 1), Some(ClickTarget::FormInput(FormField::Description)));
        assert_eq!(form_hit(area, 95, 1), Some(ClickTarget::ScheduleButton));
        assert_eq!(form_hit(area, 2, 0), None);
    }
}
