//! # RetryLoop: periodic scan and fire-and-forget retry dispatch.
//!
//! A single [`RetryLoop`] instance per invoker scans the retry queue on a
//! fixed 1-second tick and dispatches every ready task to its own spawned
//! retry unit. Dispatch never blocks the scan, so an arbitrary backlog of
//! ready tasks drains within one tick without serializing on slow remote
//! calls.
//!
//! ## Tick anatomy
//! ```text
//! tick ─► loop {
//!   ├─► peek head
//!   │     ├─ Disposed      → publish SchedulerStopped, exit loop
//!   │     ├─ Empty         → end scan (wait for next tick)
//!   │     └─ head younger than 5s → end scan
//!   │         (queue is monotonic by last_attempt: nothing behind the
//!   │          head can be ready either)
//!   ├─► dequeue head (takes ownership)
//!   └─► tokio::spawn(retry unit), continue scanning
//! }
//! ```
//!
//! ## Timing constants
//! The 1s tick and 5s readiness threshold are deliberate fixed constants,
//! not configuration: failback latency stays predictable across
//! deployments.
//!
//! ## Rules
//! - Exactly one loop ever scans a given queue (no double-dispatch).
//! - A spawned retry unit owns its task exclusively until it drops it or
//!   re-enqueues it.
//! - Queue disposal is graceful shutdown, not an error.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::error::CallError;
use crate::events::{Bus, Event, EventKind};

use super::queue::{Polled, RetryQueue};
use super::task::RetryTask;

/// Fixed scan interval.
pub(crate) const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed minimum age of a task's `last_attempt` before it is retried.
pub(crate) const READY_AFTER: Duration = Duration::from_secs(5);

/// The background retry loop. One per invoker, started lazily on the first
/// failure and stopped by queue disposal or cancellation.
pub(crate) struct RetryLoop {
    queue: Arc<RetryQueue>,
    bus: Bus,
    max_retries: u32,
}

impl RetryLoop {
    pub(crate) fn new(queue: Arc<RetryQueue>, bus: Bus, max_retries: u32) -> Self {
        Self {
            queue,
            bus,
            max_retries,
        }
    }

    /// Runs until the queue is disposed or the token is cancelled.
    pub(crate) async fn run(self, cancel: CancellationToken) {
        let mut ticker = time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if !self.scan() {
                break;
            }
        }
        self.bus.publish(Event::now(EventKind::SchedulerStopped));
    }

    /// One bounded inner scan. Returns `false` when disposal was observed
    /// and the loop must terminate.
    fn scan(&self) -> bool {
        loop {
            match self.queue.peek(|task| task.last_attempt) {
                Polled::Disposed => return false,
                Polled::Empty => return true,
                Polled::Item(last_attempt) => {
                    if last_attempt.elapsed() < READY_AFTER {
                        return true;
                    }
                }
            }

            match self.queue.dequeue() {
                Polled::Disposed => return false,
                Polled::Empty => {
                    // Peek saw a ready head but dequeue found nothing; only
                    // this loop removes, so this is a queue bug, not a race.
                    self.bus.publish(Event::now(EventKind::DequeueFailed));
                    return true;
                }
                Polled::Item(task) => {
                    let queue = Arc::clone(&self.queue);
                    let bus = self.bus.clone();
                    let max_retries = self.max_retries;
                    tokio::spawn(async move {
                        retry_once(task, &queue, &bus, max_retries).await;
                    });
                }
            }
        }
    }
}

/// One background retry attempt. Exclusively owns `task` for its duration.
async fn retry_once(mut task: RetryTask, queue: &RetryQueue, bus: &Bus, max_retries: u32) {
    let excluded = [Arc::clone(&task.last_endpoint)];
    let selected = task
        .balance
        .select(&task.invocation, &task.candidates, &excluded);

    let endpoint = match selected {
        Some(endpoint) => endpoint,
        None => {
            // Candidate pool unusable; account it like a failed attempt.
            let err = CallError::Network {
                error: "no selectable endpoint in candidate pool".to_string(),
            };
            check_retry(task, &err, queue, bus, max_retries);
            return;
        }
    };

    match endpoint.call(&task.invocation).await {
        Ok(_) => {
            bus.publish(
                Event::now(EventKind::RetrySucceeded)
                    .with_service(task.invocation.service())
                    .with_method(task.invocation.method())
                    .with_endpoint(endpoint.url())
                    .with_attempt(task.retries),
            );
        }
        Err(err) => {
            task.last_endpoint = endpoint;
            check_retry(task, &err, queue, bus, max_retries);
        }
    }
}

/// Retry accounting: publish the failure, bump the counter, then either
/// re-enqueue or abandon.
///
/// Abandonment triggers once `retries` reaches `max_retries`, which bounds
/// each failed call to `max_retries + 1` total attempts (one foreground,
/// `max_retries` background). Re-enqueue bypasses the admission capacity
/// check: tasks already in flight are never rejected, only brand-new
/// failures are.
fn check_retry(mut task: RetryTask, err: &CallError, queue: &RetryQueue, bus: &Bus, max_retries: u32) {
    bus.publish(
        Event::now(EventKind::RetryFailed)
            .with_service(task.invocation.service())
            .with_method(task.invocation.method())
            .with_endpoint(task.last_endpoint.url())
            .with_error(err.to_string())
            .with_attempt(task.retries),
    );

    task.retries += 1;
    task.last_attempt = Instant::now();

    if task.retries >= max_retries {
        bus.publish(
            Event::now(EventKind::RetryAbandoned)
                .with_service(task.invocation.service())
                .with_method(task.invocation.method())
                .with_error(err.to_string())
                .with_attempt(task.retries)
                .with_detail(format!("{:?}", task.invocation)),
        );
        return;
    }

    if queue.append(task).is_err() {
        // Shutdown race: the queue was disposed while this retry was in
        // flight. The task is dropped; nothing to escalate.
        bus.publish(Event::now(EventKind::QueueDisposed));
    }
}
