//! File logging
//!
//! Log lines go to `~/.tagpick/logs/latest.log` so they never interleave
//! with the interactive prompt. The filter is read from `TAGPICK_LOG`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{TagPickError, TagPickResult};

pub const LOG_ENV: &str = "TAGPICK_LOG";

pub fn log_file_path(home: &Path) -> PathBuf {
    home.join("logs").join("latest.log")
}

/// Install the global subscriber. `debug` raises the default level.
pub fn init_global_logger(home: &Path, debug: bool) -> TagPickResult<PathBuf> {
    let path = log_file_path(home);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;

    let default_level = if debug { "tagpick=debug" } else { "tagpick=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| TagPickError::Config(format!("logger already initialized: {e}")))?;

    Ok(path)
}
