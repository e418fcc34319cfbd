// Conditional logging macros - only active in debug builds

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{}};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{}};
}

const DEFAULT_FILTER: &str = "warn";
const SILENT_FILTER: &str = "off";

/// Default level filter when `RUST_LOG` is unset.
///
/// Silent when the TUI owns the terminal and no log file is given.
#[must_use]
pub fn default_filter(log_file: Option<&Path>, tui: bool) -> &'static str {
    if tui && log_file.is_none() {
        SILENT_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` overrides the default filter from [`default_filter`]. With
/// `log_file` set, output goes to that file instead of stderr.
pub fn init_logging(log_file: Option<&Path>, tui: bool) -> io::Result<()> {
    let filter = default_filter(log_file, tui);
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    // A second init (tests, embedding) keeps the first logger.
    if builder.try_init().is_err() {
        debug_log!("logger already initialised");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_to_file_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leword.log");
        init_logging(Some(&path), false).unwrap();
        init_logging(Some(&path), true).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_init_logging_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("leword.log");
        assert!(init_logging(Some(&path), false).is_err());
    }

    #[test]
    fn test_tui_without_log_file_is_silent() {
        assert_eq!(default_filter(None, true), "off");
        assert_eq!(default_filter(None, false), "warn");
        assert_eq!(default_filter(Some(Path::new("leword.log")), true), "warn");
    }
}
