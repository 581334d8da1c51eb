use crate::config::{ConfigError, LoggerConfiguration, LOG_FILE_PATTERN};
use crate::file_size::FileSize;
use directory_watcher::DirectoryWatcher;
use file_watcher::{FileWatcher, WatcherSettings};
use logger::{LogLevel, LogMode, Logger};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Composition root of the logging facility.
///
/// Owns the configuration snapshot, the delivery engine and both watchers,
/// and wires the watcher callbacks to the engine's rotation entry point. One
/// explicitly owned instance per process; call sites log through the shared
/// [`Logger`] handle.
pub struct LogManager {
    configuration: LoggerConfiguration,
    logger: Arc<Logger>,
    file_watcher: FileWatcher,
    directory_watcher: DirectoryWatcher,
}

impl LogManager {
    pub fn new(configuration: LoggerConfiguration) -> Self {
        LogManager {
            configuration,
            logger: Arc::new(Logger::new()),
            file_watcher: FileWatcher::new(),
            directory_watcher: DirectoryWatcher::new(),
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(LoggerConfiguration::load(path)?))
    }

    /// Shared handle for submitting records.
    pub fn logger(&self) -> Arc<Logger> {
        Arc::clone(&self.logger)
    }

    pub fn configuration(&self) -> &LoggerConfiguration {
        &self.configuration
    }

    pub fn file_watcher_running(&self) -> bool {
        self.file_watcher.is_running()
    }

    pub fn directory_watcher_running(&self) -> bool {
        self.directory_watcher.is_running()
    }

    // Mutators update the snapshot only; they take effect on the next
    // `initialize` call.

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.configuration.log_level = level;
    }

    pub fn set_log_mode(&mut self, mode: LogMode) {
        self.configuration.log_mode = mode;
    }

    pub fn set_log_directory<P: Into<PathBuf>>(&mut self, directory: P) {
        self.configuration.log_directory_path = directory.into();
    }

    pub fn set_max_file_size(&mut self, size: FileSize) {
        self.configuration.max_log_file_size = size;
    }

    /// String form of [`set_max_file_size`](Self::set_max_file_size), e.g.
    /// `"100MiB"`. A malformed value is reported and the previous size kept.
    pub fn set_max_file_size_str(&mut self, size: &str) {
        match size.parse::<FileSize>() {
            Ok(size) => self.configuration.max_log_file_size = size,
            Err(err) => eprintln!("logfile: {}", err),
        }
    }

    pub fn set_log_file_remove_interval(&mut self, millis: u64) {
        self.configuration.remove_logs_older_than = millis;
    }

    /// Brings the pipeline up from the current configuration snapshot.
    ///
    /// Pushes level and mode into the engine, opens today's file (file mode)
    /// or the console stream, then starts whichever watchers the snapshot
    /// enables.
    pub fn initialize(&mut self) {
        self.logger.set_level(self.configuration.log_level);
        self.logger.set_mode(self.configuration.log_mode);

        match self.configuration.log_mode {
            LogMode::File => self.logger.reopen(&self.configuration.log_directory_path),
            LogMode::Console => self.logger.start_console(),
        }

        if self.configuration.enable_file_watcher {
            self.refresh_file_watcher_settings();
            self.enable_file_watcher();
        }

        if self.configuration.enable_auto_remove {
            self.enable_directory_watcher();
        }
    }

    /// Starts the rotation watcher. Silent no-op when the watcher is not
    /// enabled in the snapshot, the mode is not file, or it already runs.
    pub fn enable_file_watcher(&mut self) {
        if !self.configuration.enable_file_watcher
            || self.configuration.log_mode != LogMode::File
        {
            return;
        }

        let logger = Arc::clone(&self.logger);
        let directory = self.configuration.log_directory_path.clone();
        let settings = self.file_watcher.settings();

        self.file_watcher.start(
            move || {
                logger.reopen(&directory);

                // Point the watcher at the file the rotation just opened.
                if let Some(path) = logger.current_file() {
                    settings
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .path = path;
                }
            },
            FileWatcher::DEFAULT_INTERVAL,
        );
    }

    pub fn disable_file_watcher(&mut self) {
        self.file_watcher.stop();
    }

    /// Starts the retention watcher. Silent no-op when retention is zero,
    /// auto-remove is not enabled, the mode is not file, or it already runs.
    pub fn enable_directory_watcher(&mut self) {
        if self.configuration.remove_logs_older_than == 0
            || !self.configuration.enable_auto_remove
            || self.configuration.log_mode != LogMode::File
        {
            return;
        }

        let pattern = match Regex::new(LOG_FILE_PATTERN) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                eprintln!("logfile: invalid retention pattern: {}", err);
                None
            }
        };

        self.directory_watcher.start(
            self.configuration.log_directory_path.clone(),
            Duration::from_millis(self.configuration.remove_logs_older_than),
            pattern,
            DirectoryWatcher::DEFAULT_INTERVAL,
        );
    }

    pub fn disable_directory_watcher(&mut self) {
        self.directory_watcher.stop();
    }

    /// Stops both watchers before the drain thread, so no rotation callback
    /// can race the terminating writer.
    pub fn shutdown(&mut self) {
        self.disable_file_watcher();
        self.disable_directory_watcher();
        self.logger.stop();
    }

    fn refresh_file_watcher_settings(&self) {
        self.file_watcher.update_settings(WatcherSettings {
            path: self.logger.current_file().unwrap_or_default(),
            max_size_bytes: self.configuration.max_log_file_size.bytes(),
            check_point: self.configuration.check_point,
        });
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
