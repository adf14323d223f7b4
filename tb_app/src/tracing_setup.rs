use std::io;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Install the global subscriber: hourly log files under `log_dir`, plus a
/// coloured stdout copy when `stdout` is set
///
/// `RUST_LOG` overrides `default_level`. The returned guard flushes the file
/// writer on drop and must outlive all logging.
pub fn init(app_name: &str, log_dir: impl AsRef<Path>, default_level: Level, stdout: bool) -> io::Result<WorkerGuard> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)?;

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::hourly(log_dir, format!("{app_name}.log")));

    let env_filter = EnvFilter::builder().with_default_directive(default_level.into()).from_env_lossy();
    let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false).with_line_number(true).compact();
    let stdout_layer = stdout.then(|| fmt::layer().with_writer(io::stdout).with_target(false));

    tracing_subscriber::registry().with(env_filter).with(file_layer).with(stdout_layer).try_init().map_err(io::Error::other)?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("tb_app_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_unwritable_log_dir_is_reported() {
        let dir = scratch_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();

        let result = init("tb_test", blocker.join("logs"), Level::INFO, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_creates_log_dir() {
        let dir = scratch_dir("logs").join("nested");

        let guard = init("tb_test", &dir, Level::DEBUG, false).unwrap();
        tracing::info!("tracing initialised");
        drop(guard);

        assert!(dir.is_dir());
    }
}
