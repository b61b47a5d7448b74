//! Background sampler: periodically collects metrics into the shared cache
//! so `/api/metrics` just clones the last snapshot.

use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use crate::metrics::collect_metrics;
use crate::state::AppState;

pub const DEFAULT_SAMPLE_MS: u64 = 5_000;

/// `SYSDASH_AGENT_SAMPLE_MS`, falling back to 5s.
pub fn period_from_env() -> Duration {
    let ms = std::env::var("SYSDASH_AGENT_SAMPLE_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_SAMPLE_MS);
    Duration::from_millis(ms)
}

pub fn spawn_sampler(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let m = collect_metrics(&state).await;
            debug!(processes = m.processes.len(), cpu = m.cpu.usage, "sampled");
            *state.last_metrics.write().await = Some(m);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::Latency;

    #[tokio::test]
    async fn first_tick_fills_the_cache() {
        let state = AppState::new(Latency::instant());
        let handle = spawn_sampler(state.clone(), Duration::from_secs(60));
        for _ in 0..250 {
            if state.last_metrics.read().await.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        handle.abort();
        assert!(state.last_metrics.read().await.is_some());
    }
}
