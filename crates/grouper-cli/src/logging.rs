use std::env;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/grouper.log";

/// Install the process-wide subscriber: pretty stdout plus an append-only,
/// timestamped run log. Keep the returned guard alive until exit so the
/// file writer flushes.
pub fn init_logger() -> WorkerGuard {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_file = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (file_writer, guard) = run_log_writer(Path::new(&log_file));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_target(false)
                .with_ansi(false),
        )
        .with(EnvFilter::new(filter))
        .init();

    info!("Logging to stdout and {}", log_file);

    guard
}

/// The run log must hold every scan entry, response, retry and move, so the
/// writer blocks instead of dropping lines when its buffer fills.
fn run_log_writer(path: &Path) -> (NonBlocking, WorkerGuard) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "grouper.log".into());

    let appender = tracing_appender::rolling::never(directory, file_name);
    NonBlockingBuilder::default().lossy(false).finish(appender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_run_log_keeps_every_line_under_load() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested/run.log");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let lines = 300_000;

        let (mut writer, guard) = run_log_writer(&path);
        for i in 0..lines {
            writer
                .write_all(format!("found file {}\n", i).as_bytes())
                .unwrap();
        }
        drop(guard);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), lines);
        assert!(written.ends_with(&format!("found file {}\n", lines - 1)));
    }

    #[test]
    fn test_bare_file_name_logs_to_working_directory() {
        let (_writer, _guard) = run_log_writer(Path::new("grouper-test-bare.log"));
        assert!(Path::new("./grouper-test-bare.log").exists());
        let _ = fs::remove_file("./grouper-test-bare.log");
    }
}
