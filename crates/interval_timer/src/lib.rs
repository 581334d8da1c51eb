use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Recurring timer that runs a callback on its own thread.
///
/// The callback fires once immediately on `start` and then again after every
/// interval. Cancellation goes through a channel: `stop` sends a signal and
/// joins the thread, so shutdown is deterministic instead of waiting for a
/// cooperative flag to be noticed.
pub struct IntervalTimer {
    stop_sender: Option<Sender<()>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        IntervalTimer {
            stop_sender: None,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Starts the timer. A timer that is already running is stopped first.
    ///
    /// The callback runs synchronously on the timer thread; the interval is
    /// measured from the end of one invocation to the start of the next.
    pub fn start<F>(&mut self, interval: Duration, callback: F)
    where
        F: Fn() + Send + 'static,
    {
        if self.is_running() {
            self.stop();
        }

        let (stop_sender, stop_receiver) = bounded::<()>(1);

        let worker = thread::Builder::new()
            .name("interval-timer".to_string())
            .spawn(move || loop {
                callback();

                match stop_receiver.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match worker {
            Ok(handle) => {
                self.stop_sender = Some(stop_sender);
                self.worker = Some(handle);
            }
            Err(err) => eprintln!("interval_timer: failed to spawn timer thread: {}", err),
        }
    }

    /// Signals the timer thread and waits for it to finish. No-op when the
    /// timer is not running.
    pub fn stop(&mut self) {
        if let Some(sender) = self.stop_sender.take() {
            let _ = sender.send(());
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
