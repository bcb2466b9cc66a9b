use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a stdout layer and an optional rolling file layer.
///
/// - Stdout: compact, human-readable, with target and source location
/// - File: daily rolling `journal.log` under `log_dir` when one is given
/// - Default level: INFO (DEBUG for this crate), override via RUST_LOG env
///
/// The returned guard must be held for the life of the process or buffered
/// file output is lost.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dating_journal=debug"));

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "journal.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // try_init: tests and embedding hosts may already own the global subscriber.
    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(file_logging = guard.is_some(), "Tracing initialized");
    }
    guard
}
