use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// `RUST_LOG` wins; otherwise this crate logs at `level` and everything else at warn
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,sabio={level}")))
}

fn open(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber writing plain-text lines to `path`.
/// The terminal is owned by the UI, so nothing goes to stdout or stderr.
pub fn init(path: &Path, level: &str) -> Result<()> {
    let file = open(path)?;

    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
