//! Small UI helpers: human-readable sizes and durations, truncation.

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// `1536 -> "1.5 KB"`. Two decimals at most, trailing zeros dropped.
pub fn format_bytes(n: u64) -> String {
    if n == 0 {
        return "0 Bytes".into();
    }
    let mut idx = 0;
    let mut scale = 1u64;
    while idx < UNITS.len() - 1 && n / scale >= 1024 {
        scale *= 1024;
        idx += 1;
    }
    let v = n as f64 / scale as f64;
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{s} {}", UNITS[idx])
}

pub fn format_uptime(secs: u64) -> String {
    let d = secs / 86_400;
    let h = secs % 86_400 / 3_600;
    let m = secs % 3_600 / 60;
    let s = secs % 60;
    format!("{d}d {h}h {m}m {s}s")
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

/// Area inside a one-cell border.
pub fn inner(area: ratatui::layout::Rect) -> ratatui::layout::Rect {
    ratatui::layout::Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

pub fn contains(r: ratatui::layout::Rect, col: u16, row: u16) -> bool {
    col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_pick_the_largest_whole_unit() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_234_567_890), "1.15 GB");
    }

    #[test]
    fn bytes_cap_at_terabytes() {
        let pb = 1024u64.pow(5);
        assert_eq!(format_bytes(pb), "1024 TB");
    }

    #[test]
    fn uptime_has_no_padding() {
        assert_eq!(format_uptime(90_061), "1d 1h 1m 1s");
        assert_eq!(format_uptime(0), "0d 0h 0m 0s");
        assert_eq!(format_uptime(3_599), "0d 0h 59m 59s");
    }

    #[test]
    fn truncate_keeps_both_ends() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("abcdefghij", 7), "ab...ij");
        assert_eq!(truncate_middle("abcdef", 2), "...");
    }
}
