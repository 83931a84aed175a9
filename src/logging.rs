//! Logging setup for the binary.
//!
//! The game owns the terminal, so logs never go to stdout/stderr. When a log
//! path is configured everything is written to that file; otherwise no
//! subscriber is installed and the `tracing` macros are no-ops.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "tui_pacman=info,tui_pacman_term=info,tui_pacman_core=info,warn";

/// Install a file subscriber for `log_path`.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_logging(log_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = log_path else {
        return Ok(None);
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log path {} has no file name", path.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(Some(guard))
}
