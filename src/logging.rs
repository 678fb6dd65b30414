//! File-backed `tracing` setup. The terminal belongs to the UI, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `tripdesk=debug`.
pub const LOG_ENV: &str = "TRIPDESK_LOG";

const DEFAULT_DIRECTIVE: &str = "tripdesk=info";

/// Installs the global subscriber, appending to `log_path`.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing(log_path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
