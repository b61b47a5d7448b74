//! Small utilities to manage bounded history buffers for charts.

use std::collections::VecDeque;
use std::time::Instant;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// Turns cumulative byte counters into KB/s samples.
#[derive(Debug, Default)]
pub struct RateTracker {
    last: Option<(u64, Instant)>,
}

impl RateTracker {
    /// First sample (or a counter reset) yields 0.
    pub fn sample(&mut self, total: u64, now: Instant) -> u64 {
        let rate = match self.last {
            Some((prev, at)) => {
                let dt = now.duration_since(at).as_secs_f64().max(1e-6);
                (total.saturating_sub(prev) as f64 / dt / 1024.0).round() as u64
            }
            None => 0,
        };
        self.last = Some((total, now));
        rate
    }
}
