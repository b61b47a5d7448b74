//! Scroll offset handling shared by scrollable panels, plus the scrollbar.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::{SB_ARROW, SB_THUMB, SB_TRACK};

const WHEEL_STEP: usize = 3;

pub fn clamp_offset(offset: &mut usize, total: usize, viewport: usize) {
    *offset = (*offset).min(total.saturating_sub(viewport));
}

/// Up/Down/PageUp/PageDown/Home/End.
pub fn scroll_handle_key(offset: &mut usize, key: KeyEvent, page: usize, total: usize) {
    match key.code {
        KeyCode::Up => *offset = offset.saturating_sub(1),
        KeyCode::Down => *offset += 1,
        KeyCode::PageUp => *offset = offset.saturating_sub(page),
        KeyCode::PageDown => *offset += page,
        KeyCode::Home => *offset = 0,
        KeyCode::End => *offset = total,
        _ => return,
    }
    clamp_offset(offset, total, page);
}

/// Mouse wheel inside `area`. Returns true when the event was consumed.
pub fn scroll_handle_mouse(
    offset: &mut usize,
    mouse: MouseEvent,
    area: Rect,
    viewport: usize,
    total: usize,
) -> bool {
    let inside = crate::ui::util::contains(area, mouse.column, mouse.row);
    if !inside {
        return false;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => *offset = offset.saturating_sub(WHEEL_STEP),
        MouseEventKind::ScrollDown => *offset += WHEEL_STEP,
        _ => return false,
    }
    clamp_offset(offset, total, viewport);
    true
}

/// One-column scrollbar: arrows at both ends, thumb sized to the viewport.
pub fn draw_scrollbar(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    offset: usize,
    viewport: usize,
    total: usize,
) {
    if area.height < 3 {
        return;
    }
    let track = (area.height - 2) as usize;
    let total = total.max(1);
    let view = viewport.clamp(1, total);
    let max_off = total.saturating_sub(view);
    let offset = offset.min(max_off);

    let thumb_len = (track * view).div_ceil(total).max(1).min(track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        if i >= thumb_top && i < thumb_top + thumb_len {
            lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
        } else {
            lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
        }
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}
