use crate::level::{LogLevel, LogMode};
use crate::msg_fmt::{daily_file_name, format_line, join_parts};
use crate::targets::{ConsoleLogTarget, FileLogTarget, LogTarget, NoopLogTarget};
use concurrent_queue::ConcurrentQueue;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// How long the drain thread sleeps when the queue is empty.
const DRAIN_IDLE_SLEEP: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file operation failed: {0}")]
    Io(#[from] io::Error),
}

/// The active sink plus the path of the file it writes to (file mode only).
///
/// Every open, write, close and rename goes through the mutex wrapping this
/// struct, so a rotation can never interleave with an in-flight write.
struct Sink {
    target: Box<dyn LogTarget + Send>,
    current_file: Option<PathBuf>,
}

/// Asynchronous delivery pipeline: level filter, line formatter, record
/// queue, one background drain thread, and the rotation protocol for the
/// active sink.
///
/// `log` never blocks the caller on I/O; it formats and enqueues. The drain
/// thread consumes the queue and writes to whatever sink is installed.
pub struct Logger {
    level: AtomicU8,
    mode: AtomicU8,
    running: Arc<AtomicBool>,
    queue: Arc<ConcurrentQueue<String>>,
    sink: Arc<Mutex<Sink>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Logger {
    pub fn new() -> Self {
        Logger {
            level: AtomicU8::new(LogLevel::Debug as u8),
            mode: AtomicU8::new(LogMode::Console as u8),
            running: Arc::new(AtomicBool::new(false)),
            queue: Arc::new(ConcurrentQueue::new()),
            sink: Arc::new(Mutex::new(Sink {
                target: Box::new(NoopLogTarget),
                current_file: None,
            })),
            worker: Mutex::new(None),
        }
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Release);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, mode: LogMode) {
        self.mode.store(mode as u8, Ordering::Release);
    }

    pub fn mode(&self) -> LogMode {
        LogMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Path of the file currently open as the sink, if any.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.lock_sink().current_file.clone()
    }

    /// Filters, formats and enqueues one record. Never blocks on I/O and
    /// never reports an error to the caller.
    pub fn log<S: Into<String>>(&self, level: LogLevel, message: S) {
        if level < self.level() {
            return;
        }

        self.queue.enqueue(format_line(level, &message.into()));
    }

    /// Space-joins `parts` and logs the result at `level`.
    pub fn log_parts(&self, level: LogLevel, parts: &[&dyn Display]) {
        if level < self.level() {
            return;
        }

        self.log(level, join_parts(parts));
    }

    pub fn debug<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Error, message);
    }

    pub fn fatal<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Fatal, message);
    }

    /// Installs a sink and forgets any recorded file path. Used by console
    /// startup and by tests that capture output.
    pub fn set_target(&self, target: Box<dyn LogTarget + Send>) {
        let mut sink = self.lock_sink();
        sink.target = target;
        sink.current_file = None;
    }

    /// Starts the drain thread if it is not running yet.
    pub fn start(&self) {
        self.ensure_worker();
    }

    /// Console mode startup: installs the console sink and starts the drain
    /// thread.
    pub fn start_console(&self) {
        self.set_target(Box::new(ConsoleLogTarget));
        self.ensure_worker();
    }

    /// File mode startup: creates the directory tree if absent, opens
    /// `filename` inside it for appending, records it as the current file
    /// and starts the drain thread. No-op in console mode.
    pub fn initialize(&self, directory: &Path, filename: &str) -> Result<(), LoggerError> {
        if self.mode() != LogMode::File {
            return Ok(());
        }

        fs::create_dir_all(directory)?;
        let target = FileLogTarget::open(&directory.join(filename))?;

        {
            let mut sink = self.lock_sink();
            sink.current_file = Some(target.path().to_path_buf());
            sink.target = Box::new(target);
        }

        self.ensure_worker();
        Ok(())
    }

    /// Rotates to a fresh `YYYY-MM-DD.log` inside `directory`.
    ///
    /// When a file for today already exists, it is renamed to
    /// `YYYY-MM-DD.log.N` first, N being the first unused suffix at or above
    /// the count of same-day files seen so far. No-op in console mode;
    /// filesystem failures are reported and the pipeline keeps running.
    pub fn reopen(&self, directory: &Path) {
        if self.mode() != LogMode::File {
            return;
        }

        if let Err(err) = self.rotate(directory) {
            eprintln!(
                "logfile: log rotation in {} failed: {}",
                directory.display(),
                err
            );
        }
    }

    /// Stops the drain thread after it has flushed the queued backlog, then
    /// closes the sink. Idempotent.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);

        let handle = self.lock_worker().take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }

        let mut sink = self.lock_sink();
        sink.target = Box::new(NoopLogTarget);
        sink.current_file = None;
    }

    fn rotate(&self, directory: &Path) -> Result<(), LoggerError> {
        fs::create_dir_all(directory)?;

        let filename = daily_file_name();
        let collisions = count_matching_files(directory, &filename)?;
        let full_path = directory.join(&filename);

        let mut sink = self.lock_sink();

        // Close the previous handle before renaming anything on disk.
        sink.target = Box::new(NoopLogTarget);
        sink.current_file = None;

        if collisions > 0 && full_path.exists() {
            let rotated = free_rotation_path(directory, &filename, collisions);
            fs::rename(&full_path, &rotated)?;
        }

        let target = FileLogTarget::open(&full_path)?;
        sink.current_file = Some(target.path().to_path_buf());
        sink.target = Box::new(target);
        drop(sink);

        self.ensure_worker();
        Ok(())
    }

    fn ensure_worker(&self) {
        let mut worker = self.lock_worker();
        if worker.is_some() {
            return;
        }

        self.running.store(true, Ordering::Release);

        let running = Arc::clone(&self.running);
        let queue = Arc::clone(&self.queue);
        let sink = Arc::clone(&self.sink);

        let handle = thread::Builder::new()
            .name("logfile-drain".to_string())
            .spawn(move || {
                // Keep draining after stop until the backlog is written out.
                while running.load(Ordering::Acquire) || !queue.empty() {
                    if queue.empty() {
                        thread::sleep(DRAIN_IDLE_SLEEP);
                        continue;
                    }

                    let line = queue.dequeue();
                    let mut sink = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    sink.target.log(&line);
                }
            });

        match handle {
            Ok(handle) => *worker = Some(handle),
            Err(err) => {
                self.running.store(false, Ordering::Release);
                eprintln!("logfile: failed to spawn drain thread: {}", err);
            }
        }
    }

    fn lock_sink(&self) -> MutexGuard<'_, Sink> {
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<thread::JoinHandle<()>>> {
        self.worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.stop();
    }
}

/// First `<name>.N` path not yet present in `directory`, searching upward
/// from `candidate`. A retention sweep may leave gaps in the numbering, so
/// the count alone cannot be trusted as a free suffix; `fs::rename` would
/// silently overwrite a survivor.
fn free_rotation_path(directory: &Path, name: &str, candidate: usize) -> PathBuf {
    let mut n = candidate;
    loop {
        let path = directory.join(format!("{}.{}", name, n));
        if !path.exists() {
            return path;
        }
        n += 1;
    }
}

/// Counts directory entries whose name contains `name`. A plain
/// `YYYY-MM-DD.log` and its rotated `.N` siblings all count.
fn count_matching_files(directory: &Path, name: &str) -> io::Result<usize> {
    let mut count = 0;

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().contains(name) {
            count += 1;
        }
    }

    Ok(count)
}
