//! Logging setup: stdout plus an append-only file next to the settings.
//!
//! The default level is `debug` in debug builds and `info` in release
//! builds. `RUST_LOG` overrides it.

use std::path::Path;

use tracing::{info, warn, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::model::constants::LOG_FILE_NAME;

fn default_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level()))
}

fn stdout_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
}

fn init_stdout_only() {
    let _ = tracing_subscriber::registry()
        .with(stdout_layer())
        .with(filter())
        .try_init();
}

/// Initialise logging.
///
/// With a `log_dir`, log lines also go to `<log_dir>/overlay.log`. The
/// returned guard must live until shutdown so buffered lines are flushed.
/// Falls back to stdout only when the directory cannot be created. Calling
/// this twice is harmless; the second subscriber is dropped.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let Some(dir) = log_dir else {
        init_stdout_only();
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(dir) {
        init_stdout_only();
        warn!(dir = %dir.display(), error = %e, "cannot create log directory, using stdout only");
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer())
        .with(filter())
        .try_init()
        .is_ok();

    if installed {
        info!(log_file = ?dir.join(LOG_FILE_NAME), "logging initialized");
    }
    Some(guard)
}
