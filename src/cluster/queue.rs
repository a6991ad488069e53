//! # Disposable concurrent FIFO for pending retry tasks.
//!
//! [`RetryQueue`] holds [`RetryTask`]s in arrival order under multiple
//! simultaneous producers (the invoke path and concurrent retry units) and
//! a single consumer (the retry loop's scan).
//!
//! ## Dual-signal polling
//! `peek` and `dequeue` return [`Polled`], a tagged result distinguishing
//! `Empty` from `Disposed`, so the scanner can branch on category without
//! unwinding control flow:
//! ```text
//! Polled::Item(t)   → head available
//! Polled::Empty     → nothing pending, wait for the next tick
//! Polled::Disposed  → terminal; the retry loop shuts down
//! ```
//!
//! ## Ordering invariant
//! Every re-enqueue stamps a fresh `last_attempt` strictly greater than the
//! previous and always appends to the tail, so insertion order is also
//! monotonic by `last_attempt`: the head is always the least-recently
//! attempted task.
//!
//! ## Disposal
//! `dispose()` is a one-way transition. Once entered, all pending and
//! future operations resolve immediately with the disposed signal; queued
//! tasks are dropped.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ClusterError;

use super::task::RetryTask;

/// Tri-state result of a queue poll.
#[derive(Debug)]
pub enum Polled<T> {
    /// The head task (or a projection of it).
    Item(T),
    /// The queue is live but holds nothing.
    Empty,
    /// The queue has been disposed; terminal.
    Disposed,
}

impl<T> Polled<T> {
    /// True for [`Polled::Disposed`].
    pub fn is_disposed(&self) -> bool {
        matches!(self, Polled::Disposed)
    }
}

struct Inner {
    items: VecDeque<RetryTask>,
    disposed: bool,
}

/// Bounded-intent, internally disposable, thread-safe FIFO of retry tasks.
///
/// The capacity passed to [`RetryQueue::new`] is a hint for allocation; the
/// admission bound itself is enforced by the invoker, and re-enqueues may
/// exceed it transiently.
pub struct RetryQueue {
    inner: Mutex<Inner>,
}

impl RetryQueue {
    /// Creates a live queue sized for `capacity_hint` tasks.
    pub fn new(capacity_hint: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity_hint),
                disposed: false,
            }),
        }
    }

    // A poisoned mutex only means a panic elsewhere while holding the lock;
    // the queue state itself stays coherent, so keep serving.
    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Non-destructively inspects the head task through a projection.
    ///
    /// The closure runs under the queue lock; keep it cheap.
    pub fn peek<R>(&self, f: impl FnOnce(&RetryTask) -> R) -> Polled<R> {
        let inner = self.locked();
        if inner.disposed {
            return Polled::Disposed;
        }
        match inner.items.front() {
            Some(task) => Polled::Item(f(task)),
            None => Polled::Empty,
        }
    }

    /// Removes and returns the head task, transferring ownership to the
    /// caller.
    pub fn dequeue(&self) -> Polled<RetryTask> {
        let mut inner = self.locked();
        if inner.disposed {
            return Polled::Disposed;
        }
        match inner.items.pop_front() {
            Some(task) => Polled::Item(task),
            None => Polled::Empty,
        }
    }

    /// Appends a task to the tail.
    ///
    /// Fails with [`ClusterError::QueueDisposed`] after disposal; the task
    /// is dropped in that case.
    pub fn append(&self, task: RetryTask) -> Result<(), ClusterError> {
        let mut inner = self.locked();
        if inner.disposed {
            return Err(ClusterError::QueueDisposed);
        }
        inner.items.push_back(task);
        Ok(())
    }

    /// Current task count. Best-effort under concurrency; used only for the
    /// approximate admission check. Reports 0 after disposal.
    pub fn len(&self) -> usize {
        self.locked().items.len()
    }

    /// True if no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-way transition to the terminal disposed state. Idempotent.
    ///
    /// Pending tasks are dropped; all future operations resolve with the
    /// disposed signal.
    pub fn dispose(&self) {
        let mut inner = self.locked();
        inner.disposed = true;
        inner.items.clear();
    }

    /// True once [`RetryQueue::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.locked().disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::testutil::mock_task;

    #[test]
    fn test_append_then_dequeue_is_fifo() {
        let queue = RetryQueue::new(4);
        queue.append(mock_task("tcp://a")).unwrap();
        queue.append(mock_task("tcp://b")).unwrap();
        assert_eq!(queue.len(), 2);

        match queue.dequeue() {
            Polled::Item(task) => assert_eq!(task.last_endpoint_url(), "tcp://a"),
            other => panic!("expected head item, got {other:?}"),
        }
        match queue.dequeue() {
            Polled::Item(task) => assert_eq!(task.last_endpoint_url(), "tcp://b"),
            other => panic!("expected second item, got {other:?}"),
        }
        assert!(matches!(queue.dequeue(), Polled::Empty));
    }

    #[test]
    fn test_peek_does_not_remove() {
        let queue = RetryQueue::new(4);
        queue.append(mock_task("tcp://a")).unwrap();

        let url = match queue.peek(|t| t.last_endpoint_url().to_string()) {
            Polled::Item(url) => url,
            other => panic!("expected item, got {other:?}"),
        };
        assert_eq!(url, "tcp://a");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_empty_signals() {
        let queue = RetryQueue::new(4);
        assert!(matches!(queue.peek(|_| ()), Polled::Empty));
        assert!(matches!(queue.dequeue(), Polled::Empty));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dispose_is_terminal_and_idempotent() {
        let queue = RetryQueue::new(4);
        queue.append(mock_task("tcp://a")).unwrap();

        queue.dispose();
        queue.dispose();

        assert!(queue.is_disposed());
        assert_eq!(queue.len(), 0);
        assert!(queue.peek(|_| ()).is_disposed());
        assert!(queue.dequeue().is_disposed());
        assert!(matches!(
            queue.append(mock_task("tcp://b")),
            Err(ClusterError::QueueDisposed)
        ));
    }

    #[test]
    fn test_concurrent_appends_all_land() {
        use std::sync::Arc;

        let queue = Arc::new(RetryQueue::new(64));
        let mut handles = Vec::new();
        for i in 0..8 {
            let q = Arc::clone(&queue);
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    q.append(mock_task(if i % 2 == 0 { "tcp://a" } else { "tcp://b" }))
                        .unwrap();
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(queue.len(), 80);
    }
}
