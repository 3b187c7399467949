use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory holding the rolling log files: `~/.pigment/logs`
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pigment")
        .join("logs")
}

/// Logs `component` to `~/.pigment/logs`, see [`init_logging_in`].
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_logging_in(&log_dir(), component, to_stderr)
}

/// Installs the global subscriber: a daily file under `dir` named after `component`, and
/// optionally stderr. Level comes from `RUST_LOG`, `info` by default.
///
/// Only the first call in a process installs a subscriber. Later calls keep the existing
/// one and return a guard for an appender nothing writes to.
pub fn init_logging_in(dir: &Path, component: &str, to_stderr: bool) -> WorkerGuard {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Cannot create log directory {}: {}", dir.display(), e);
    }

    let appender = tracing_appender::rolling::daily(dir, component);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if let Err(e) = installed {
        debug!("Keeping the existing subscriber for {}: {}", component, e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        let _first = init_logging_in(dir.path(), "first", false);
        let _second = init_logging_in(dir.path(), "second", true);
        assert!(dir.path().is_dir());
        assert!(log_dir().ends_with(".pigment/logs"));
    }
}
