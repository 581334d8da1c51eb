use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Thread safe FIFO queue built on a mutex protected `VecDeque` and a
/// condition variable. Producers never block beyond the short lock in
/// `enqueue`; `dequeue` parks the caller until an item is available.
///
/// There is no capacity bound. If consumers fall behind, memory grows.
pub struct ConcurrentQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> ConcurrentQueue<T> {
    pub fn new() -> Self {
        ConcurrentQueue {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends an item to the tail and wakes one blocked consumer.
    pub fn enqueue(&self, item: T) {
        let mut items = self.lock_items();
        items.push_back(item);
        self.available.notify_one();
    }

    /// Removes and returns the head item, blocking until one is available.
    pub fn dequeue(&self) -> T {
        let mut items = self.lock_items();
        loop {
            match items.pop_front() {
                Some(item) => return item,
                None => {
                    items = self
                        .available
                        .wait(items)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
            }
        }
    }

    /// Removes every queued item.
    pub fn clear(&self) {
        self.lock_items().clear();
    }

    pub fn length(&self) -> usize {
        self.lock_items().len()
    }

    pub fn empty(&self) -> bool {
        self.lock_items().is_empty()
    }

    fn lock_items(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> ConcurrentQueue<T> {
    /// Returns a copy of the current head without removing it.
    ///
    /// Advisory only: a concurrent `dequeue` may remove the head right after
    /// this returns, so the value must not be treated as a consistency
    /// guarantee.
    pub fn take(&self) -> Option<T> {
        self.lock_items().front().cloned()
    }
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
