//! Optional file logging. The terminal belongs to the UI, so nothing is
//! logged unless `SYSDASH_LOG` names a filter (e.g. `SYSDASH_LOG=debug`);
//! output then goes to `<config dir>/sysdash.log`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::profiles::config_dir;

pub const LOG_ENV: &str = "SYSDASH_LOG";

pub fn log_path() -> PathBuf {
    config_dir().join("sysdash.log")
}

/// Returns the log file path when logging was enabled.
pub fn init_logging() -> anyhow::Result<Option<PathBuf>> {
    let Some(filter) = std::env::var(LOG_ENV).ok().filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter)?)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set up logging: {e}"))?;
    Ok(Some(path))
}
