use chrono::{Local, Timelike};
use interval_timer::IntervalTimer;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

/// Fixed time of day that forces a rotation regardless of file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPoint {
    pub hour: u32,
    pub minute: u32,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid checkpoint, expected HH:MM with hour < 24 and minute < 60: {0}")]
pub struct ParseCheckPointError(pub String);

impl FromStr for CheckPoint {
    type Err = ParseCheckPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCheckPointError(s.to_string());

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = minute.trim().parse().map_err(|_| invalid())?;

        if hour >= 24 || minute >= 60 {
            return Err(invalid());
        }

        Ok(CheckPoint { hour, minute })
    }
}

impl fmt::Display for CheckPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// What one watcher tick looks at: the live log file, the size threshold and
/// the optional checkpoint. Refreshed by the owner after every rotation so
/// the watcher keeps observing the file actually being written.
#[derive(Debug, Clone, Default)]
pub struct WatcherSettings {
    pub path: PathBuf,
    pub max_size_bytes: u64,
    pub check_point: Option<CheckPoint>,
}

/// Polls the active log file and fires a rotation callback when its size
/// exceeds the threshold or the daily checkpoint is reached. At most one
/// trigger per tick.
pub struct FileWatcher {
    timer: IntervalTimer,
    settings: Arc<Mutex<WatcherSettings>>,
}

impl FileWatcher {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

    pub fn new() -> Self {
        FileWatcher {
            timer: IntervalTimer::new(),
            settings: Arc::new(Mutex::new(WatcherSettings::default())),
        }
    }

    /// Shared handle to the settings, for refreshing the observed path after
    /// a rotation while the watcher keeps running.
    pub fn settings(&self) -> Arc<Mutex<WatcherSettings>> {
        Arc::clone(&self.settings)
    }

    pub fn update_settings(&self, settings: WatcherSettings) {
        *lock_settings(&self.settings) = settings;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Starts ticking every `interval`. Already running watchers are left
    /// alone.
    pub fn start<F>(&mut self, callback: F, interval: Duration)
    where
        F: Fn() + Send + 'static,
    {
        if self.timer.is_running() {
            return;
        }

        let settings = Arc::clone(&self.settings);
        self.timer.start(interval, move || tick(&settings, &callback));
    }

    /// Stops the watcher timer. No-op when not running.
    pub fn stop(&mut self) {
        self.timer.stop();
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// One poll: checkpoint first, size second, never both.
fn tick<F: Fn()>(settings: &Arc<Mutex<WatcherSettings>>, callback: &F) {
    // Copy the settings out so the callback may refresh them without
    // deadlocking against this tick.
    let WatcherSettings {
        path,
        max_size_bytes,
        check_point,
    } = lock_settings(settings).clone();

    if let Some(check_point) = check_point {
        let now = Local::now();
        if checkpoint_due(check_point, now.hour(), now.minute()) {
            callback();
            return;
        }
    }

    match fs::metadata(&path) {
        Ok(metadata) => {
            if metadata.len() > max_size_bytes {
                callback();
            }
        }
        Err(err) => {
            eprintln!(
                "logfile: file watcher cannot stat {}: {}",
                path.display(),
                err
            );
        }
    }
}

/// True when the wall clock hour and minute equal the checkpoint. Seconds are
/// ignored; the tick interval is expected to be one minute.
pub fn checkpoint_due(check_point: CheckPoint, hour: u32, minute: u32) -> bool {
    check_point.hour == hour && check_point.minute == minute
}

fn lock_settings(settings: &Arc<Mutex<WatcherSettings>>) -> MutexGuard<'_, WatcherSettings> {
    settings
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
