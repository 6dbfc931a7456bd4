//! Logging configuration for Playlist2Disc
//!
//! Logs are written to both the terminal and a file at:
//! `<local data dir>/Playlist2Disc/logs/playlist2disc.log`
//!
//! The file always captures debug output so a failed batch can be diagnosed
//! after the fact.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = "playlist2disc.log";

/// Rotate once the log grows past 10 MB
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Get the log directory path
pub fn get_log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("Playlist2Disc").join("logs"))
}

/// Get the current log file path
pub fn get_log_file_path() -> Option<PathBuf> {
    get_log_directory().map(|d| d.join(LOG_FILE_NAME))
}

/// Move `log_path` to `<name>.old` when it is larger than `max_bytes`
///
/// Returns true if the file was rotated.
fn rotate_if_large(log_path: &Path, max_bytes: u64) -> bool {
    let Ok(metadata) = fs::metadata(log_path) else {
        return false;
    };
    if metadata.len() <= max_bytes {
        return false;
    }

    let backup_path = log_path.with_extension("log.old");
    fs::rename(log_path, backup_path).is_ok()
}

fn log_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off) // Don't show thread IDs
        .set_target_level(LevelFilter::Off) // Don't show module targets
        .build()
}

/// Terminal verbosity for the `--verbose` flag
pub fn terminal_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Initialize the logging system
///
/// Sets up combined logging to:
/// - Terminal (with colors; debug and above when `verbose`)
/// - File (debug and above)
///
/// Returns the path to the log file on success
pub fn init_logging(verbose: bool) -> Option<PathBuf> {
    let term_level = terminal_level(verbose);

    let log_dir = match get_log_directory() {
        Some(d) => d,
        None => {
            eprintln!("Warning: Could not determine log directory");
            init_terminal_only(term_level);
            return None;
        }
    };

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        init_terminal_only(term_level);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE_NAME);
    rotate_if_large(&log_path, MAX_LOG_BYTES);

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            init_terminal_only(term_level);
            return None;
        }
    };

    let config = log_config();
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(term_level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::Debug, config, log_file),
    ];

    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!("=== Playlist2Disc session started ===");
    log::debug!("Log file: {}", log_path.display());

    Some(log_path)
}

/// Initialize terminal-only logging (fallback if file logging fails)
fn init_terminal_only(level: LevelFilter) {
    let term_logger = TermLogger::new(level, log_config(), TerminalMode::Mixed, ColorChoice::Auto);
    let _ = CombinedLogger::init(vec![term_logger]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_log_file_path_returns_path() {
        let Some(path) = get_log_file_path() else {
            // No local data dir in this environment
            return;
        };
        assert!(path.ends_with("Playlist2Disc/logs/playlist2disc.log"));
        assert!(path.starts_with(get_log_directory().unwrap()));
    }

    #[test]
    fn test_terminal_level() {
        assert_eq!(terminal_level(false), LevelFilter::Info);
        assert_eq!(terminal_level(true), LevelFilter::Debug);
    }

    #[test]
    fn test_rotate_large_log() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        fs::write(&log_path, vec![b'x'; 64]).unwrap();

        assert!(rotate_if_large(&log_path, 32));
        assert!(!log_path.exists());
        assert!(dir.path().join("playlist2disc.log.old").exists());
    }

    #[test]
    fn test_small_or_missing_log_is_kept() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join(LOG_FILE_NAME);
        assert!(!rotate_if_large(&log_path, 32));

        fs::write(&log_path, b"short").unwrap();
        assert!(!rotate_if_large(&log_path, 32));
        assert!(log_path.exists());
    }
}
