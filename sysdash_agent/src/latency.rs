//! Simulated operation durations for the service and task stores.

use std::time::Duration;

use rand::Rng;

/// Inclusive bounds for one simulated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub min: Duration,
    pub max: Duration,
}

impl Span {
    pub const fn secs(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min),
            max: Duration::from_secs(max),
        }
    }

    pub const fn fixed(d: Duration) -> Self {
        Self { min: d, max: d }
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let ms = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(ms as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub install: Span,
    pub start: Span,
    pub stop: Span,
    pub reload: Span,
    pub uninstall: Span,
    pub task: Span,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            install: Span::secs(1, 5),
            start: Span::secs(1, 3),
            stop: Span::secs(1, 2),
            reload: Span::secs(1, 5),
            uninstall: Span::secs(1, 10),
            task: Span::secs(1, 10),
        }
    }
}

impl Latency {
    /// Every operation takes exactly `d`.
    pub fn fixed(d: Duration) -> Self {
        let s = Span::fixed(d);
        Self {
            install: s,
            start: s,
            stop: s,
            reload: s,
            uninstall: s,
            task: s,
        }
    }

    pub fn instant() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// `SYSDASH_AGENT_INSTANT=1` collapses every delay to zero.
    pub fn from_env() -> Self {
        match std::env::var("SYSDASH_AGENT_INSTANT") {
            Ok(v) if v != "0" => Self::instant(),
            _ => Self::default(),
        }
    }
}
