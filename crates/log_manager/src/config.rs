use crate::file_size::{FileSize, SizeUnit};
use file_watcher::CheckPoint;
use logger::{LogLevel, LogMode};
use regex::Regex;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename pattern of rotated log files (`YYYY-MM-DD.log.N`).
///
/// Deliberately excludes the plain `YYYY-MM-DD.log`, so a retention sweep can
/// never delete the file currently open as the active sink.
pub const LOG_FILE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}\.log\.\d+$";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file: {0}")]
    Io(#[from] io::Error),
}

/// Resolved, immutable configuration snapshot.
///
/// Produced by [`LoggerConfiguration::load`] or built up through the
/// `LogManager` mutators; consumed once per `initialize` call.
#[derive(Debug, Clone)]
pub struct LoggerConfiguration {
    /// Default: process working directory.
    pub log_directory_path: PathBuf,
    /// Default: 50 MB per log file.
    pub max_log_file_size: FileSize,
    /// Retention age in milliseconds. Default: 0, retention disabled.
    pub remove_logs_older_than: u64,
    /// Default: everything is logged.
    pub log_level: LogLevel,
    /// Default: records go to the console.
    pub log_mode: LogMode,
    /// Default: no daily rotation checkpoint.
    pub check_point: Option<CheckPoint>,
    /// Default: disabled.
    pub enable_file_watcher: bool,
    /// Default: disabled.
    pub enable_auto_remove: bool,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        LoggerConfiguration {
            log_directory_path: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            max_log_file_size: FileSize::new(50, SizeUnit::MB),
            remove_logs_older_than: 0,
            log_level: LogLevel::Debug,
            log_mode: LogMode::Console,
            check_point: None,
            enable_file_watcher: false,
            enable_auto_remove: false,
        }
    }
}

impl fmt::Display for LoggerConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check_point = self
            .check_point
            .map(|cp| cp.to_string())
            .unwrap_or_else(|| "undefined".to_string());

        write!(
            f,
            "logfile settings\
             \n\tLogDirectoryPath: {}\
             \n\tMaxLogFileSize: {}\
             \n\tRemoveLogsOlderThan: {}ms\
             \n\tLogLevel: {}\
             \n\tLogMode: {:?}\
             \n\tCheckPoint: {}\
             \n\tEnableFileWatcher: {}\
             \n\tEnableAutoRemove: {}",
            self.log_directory_path.display(),
            self.max_log_file_size,
            self.remove_logs_older_than,
            self.log_level,
            self.log_mode,
            check_point,
            self.enable_file_watcher,
            self.enable_auto_remove,
        )
    }
}

impl LoggerConfiguration {
    /// Loads a configuration file with one `KEY VALUE` pair per line.
    ///
    /// Expected shape:
    ///
    /// ```text
    /// LogDirectoryPath /home/user/logs
    /// MaxLogFileSize 100MiB
    /// RemoveLogsOlderThan 1d
    /// LogLevel Info
    /// LogMode File
    /// CheckPoint 11:45
    /// EnableFileWatcher true
    /// EnableAutoRemove true
    /// ```
    ///
    /// Unrecognized keys are ignored. A malformed value is reported on
    /// stderr and the default for that key is kept; only a missing or
    /// unreadable file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let mut config = Self::default();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = match line.split_once(char::is_whitespace) {
                Some((key, value)) => (key, value.trim()),
                None => {
                    warn_value(line, "");
                    continue;
                }
            };

            match key {
                "LogDirectoryPath" => config.log_directory_path = PathBuf::from(value),
                "MaxLogFileSize" => match value.parse::<FileSize>() {
                    Ok(size) => config.max_log_file_size = size,
                    Err(_) => warn_value(key, value),
                },
                "RemoveLogsOlderThan" => match parse_retention_millis(value) {
                    Some(millis) => config.remove_logs_older_than = millis,
                    None => warn_value(key, value),
                },
                "LogLevel" => match value.parse::<LogLevel>() {
                    Ok(level) => config.log_level = level,
                    Err(_) => warn_value(key, value),
                },
                "LogMode" => match value.parse::<LogMode>() {
                    Ok(mode) => config.log_mode = mode,
                    Err(_) => warn_value(key, value),
                },
                "CheckPoint" => match value.parse::<CheckPoint>() {
                    Ok(check_point) => config.check_point = Some(check_point),
                    Err(_) => warn_value(key, value),
                },
                "EnableFileWatcher" => match parse_bool(value) {
                    Some(enabled) => config.enable_file_watcher = enabled,
                    None => warn_value(key, value),
                },
                "EnableAutoRemove" => match parse_bool(value) {
                    Some(enabled) => config.enable_auto_remove = enabled,
                    None => warn_value(key, value),
                },
                _ => {}
            }
        }

        Ok(config)
    }
}

fn warn_value(key: &str, value: &str) {
    eprintln!(
        "logfile: unexpected configuration value for {}: {}",
        key, value
    );
}

/// Accepts only literal `true`/`false`, case-insensitively. Numeric forms
/// are rejected.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parses the retention grammar `<int><unit>` into milliseconds.
///
/// Units: S seconds, M minutes, H hours, d days, w weeks, m months, y years.
pub fn parse_retention_millis(value: &str) -> Option<u64> {
    let grammar = Regex::new(r"^(\d+)(S|M|H|d|w|m|y)$").ok()?;
    let captures = grammar.captures(value)?;

    let count: u64 = captures.get(1)?.as_str().parse().ok()?;
    let unit_millis: u64 = match captures.get(2)?.as_str() {
        "S" => 1_000,
        "M" => 60_000,
        "H" => 3_600_000,
        "d" => 86_400_000,
        "w" => 604_800_000,
        "m" => 2_629_746_000,
        "y" => 31_556_952_000,
        _ => return None,
    };

    count.checked_mul(unit_millis)
}
