//! File logging.
//!
//! The terminal belongs to the animation, so log output goes to a file and
//! only when `NODEGARDEN_LOG` is set, e.g. `NODEGARDEN_LOG=debug`.

use std::fs::{self, File};
use std::sync::Mutex;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NODEGARDEN_LOG";

/// Install the global subscriber if logging is enabled.
pub fn init() -> color_eyre::Result<()> {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return Ok(());
    };

    let path = nodegarden_config::log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    let file =
        File::create(&path).wrap_err_with(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
