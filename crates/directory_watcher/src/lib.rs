use interval_timer::IntervalTimer;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retention sweeper: periodically deletes regular files in a directory tree
/// that are older than a configured age and, when a pattern is given, whose
/// filename matches it.
///
/// The first sweep runs immediately on `start`; afterwards one sweep per
/// interval (default one hour).
pub struct DirectoryWatcher {
    timer: IntervalTimer,
}

impl DirectoryWatcher {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

    pub fn new() -> Self {
        DirectoryWatcher {
            timer: IntervalTimer::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Starts sweeping `directory`. Already running watchers are left alone.
    pub fn start(
        &mut self,
        directory: PathBuf,
        expiration: Duration,
        pattern: Option<Regex>,
        interval: Duration,
    ) {
        if self.timer.is_running() {
            return;
        }

        self.timer.start(interval, move || {
            remove_old_files(&directory, expiration, pattern.as_ref());
        });
    }

    /// Stops the sweep timer. No-op when not running.
    pub fn stop(&mut self) {
        self.timer.stop();
    }
}

impl Default for DirectoryWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// One retention sweep. Every error is reported and skipped so a single bad
/// file never aborts the rest of the sweep.
pub fn remove_old_files(directory: &Path, expiration: Duration, pattern: Option<&Regex>) {
    let mut expired = Vec::new();
    collect_expired(directory, expiration, pattern, &mut expired);

    for file in expired {
        if let Err(err) = fs::remove_file(&file) {
            eprintln!("logfile: cannot delete {}: {}", file.display(), err);
        }
    }
}

/// Recursively gathers regular files matching the pattern whose modification
/// age exceeds `expiration`.
fn collect_expired(
    directory: &Path,
    expiration: Duration,
    pattern: Option<&Regex>,
    expired: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("logfile: cannot read {}: {}", directory.display(), err);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("logfile: cannot read entry in {}: {}", directory.display(), err);
                continue;
            }
        };

        let path = entry.path();

        if path.is_dir() {
            collect_expired(&path, expiration, pattern, expired);
            continue;
        }

        if !path.is_file() {
            continue;
        }

        if let Some(pattern) = pattern {
            let file_name = entry.file_name();
            if !pattern.is_match(&file_name.to_string_lossy()) {
                continue;
            }
        }

        match is_older_than(&path, expiration) {
            Ok(true) => expired.push(path),
            Ok(false) => {}
            Err(err) => {
                eprintln!("logfile: cannot stat {}: {}", path.display(), err);
            }
        }
    }
}

/// Compares the file's last modification time against `limit`.
fn is_older_than(path: &Path, limit: Duration) -> io::Result<bool> {
    let modified = fs::metadata(path)?.modified()?;

    match modified.elapsed() {
        Ok(age) => Ok(age > limit),
        // Modified in the future (clock skew): treat as fresh.
        Err(_) => Ok(false),
    }
}
