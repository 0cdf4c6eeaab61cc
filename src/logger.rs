use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::LevelFilter;

/// Initializes the logging system.
///
/// Console output level is controlled via the `RUST_LOG` environment
/// variable (default `info`). When `log_file` is given, all output goes
/// there instead of stdout, so the client can run detached and still leave
/// a trail.
pub fn init_logger(log_file: Option<&Path>) -> Result<()> {
    let default_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let mut builder = env_logger::Builder::from_default_env();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(default_level);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    // A second init (test runs) keeps the first logger.
    builder.try_init().ok();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_init_logger_succeeds() {
        assert!(init_logger(None).is_ok());
    }

    #[test]
    #[serial]
    fn test_init_logger_is_idempotent() {
        assert!(init_logger(None).is_ok());
        assert!(init_logger(None).is_ok());
    }

    #[test]
    #[serial]
    fn test_init_logger_creates_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shellsync.log");

        init_logger(Some(&path)).unwrap();

        assert!(path.exists());
    }

    #[test]
    #[serial]
    fn test_init_logger_unwritable_log_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("shellsync.log");

        assert!(init_logger(Some(&path)).is_err());
    }
}
