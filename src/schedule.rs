//! Run throttling.
//!
//! The last successful start time is kept as unix seconds in
//! `<state_dir>/<api_name>_last_run`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn last_run_path(state_dir: &Path, api_name: &str) -> PathBuf {
    state_dir.join(format!("{api_name}_last_run"))
}

/// Whether at least `interval_secs` have passed since the last run. When it
/// returns `true` the timestamp file is rewritten with `now`.
///
/// A missing or unreadable timestamp counts as "never ran".
pub fn should_run(
    state_dir: &Path,
    api_name: &str,
    interval_secs: u64,
    now: DateTime<Utc>,
) -> Result<bool, ScheduleError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ScheduleError::Io { path, source }
    };
    fs::create_dir_all(state_dir).map_err(io_err(state_dir))?;
    let path = last_run_path(state_dir, api_name);

    let elapsed = match fs::read_to_string(&path) {
        Ok(contents) => match contents.trim().parse::<i64>() {
            Ok(last) => Some(now.timestamp().saturating_sub(last)),
            Err(_) => {
                warn!("unable to read timestamp file: {}", path.display());
                None
            }
        },
        Err(_) => None,
    };

    let due = match elapsed {
        Some(elapsed) => elapsed >= 0 && elapsed as u64 >= interval_secs,
        None => true,
    };
    if due {
        fs::write(&path, now.timestamp().to_string()).map_err(io_err(&path))?;
    }
    Ok(due)
}
