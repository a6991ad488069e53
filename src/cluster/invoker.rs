//! # FailbackInvoker: the public entry point of the strategy.
//!
//! Performs the call once in the foreground; on failure it acknowledges the
//! caller immediately and hands the work to the background retry machinery.
//!
//! ## Contract
//! [`FailbackInvoker::invoke`] never blocks on the eventual success of a
//! retried call and never surfaces an error: once the strategy decides to
//! failback, all failure information is observable only through the event
//! bus.
//!
//! ## Invoke path
//! ```text
//! invoke(invocation)
//!   ├─► Directory::list ── empty ──► DirectoryEmpty event, Reply::ack()
//!   ├─► resolve balance (method override → service default)
//!   ├─► select endpoint (no exclusions), call it
//!   ├─ success ──► Reply (unchanged)
//!   └─ failure
//!        ├─► lazily create queue + spawn RetryLoop   (exactly once)
//!        ├─► queue full? ──► QueueSaturated event, Reply::ack()
//!        └─► append RetryTask, FailbackScheduled event, Reply::ack()
//! ```
//!
//! ## Lazy one-time initialization
//! The retry queue and the retry loop are created on the first failure,
//! guarded by a `OnceLock`: arbitrarily many concurrent first failures
//! execute the initialization exactly once, and every caller observes the
//! fully-initialized state afterward.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::balance;
use crate::config::FailbackConfig;
use crate::error::ClusterError;
use crate::events::{Bus, Event, EventKind};
use crate::rpc::{Directory, EndpointRef, Invocation, Reply};

use super::builder::FailbackInvokerBuilder;
use super::queue::RetryQueue;
use super::scheduler::RetryLoop;
use super::task::RetryTask;

/// Lazily-created background retry state.
struct RetryHandle {
    queue: Arc<RetryQueue>,
    cancel: CancellationToken,
}

/// Best-effort cluster invoker: one foreground attempt, background retries
/// for failures.
///
/// ## Example
/// ```no_run
/// use std::sync::Arc;
/// use failback::{FailbackConfig, FailbackInvoker, Invocation, StaticDirectory};
///
/// # async fn run(endpoints: Vec<failback::EndpointRef>) {
/// let invoker = FailbackInvoker::new(
///     StaticDirectory::shared(endpoints),
///     FailbackConfig::default(),
/// );
///
/// let invocation = Arc::new(Invocation::new("greeter", "say_hello", b"hi".to_vec()));
/// // Returns promptly: the real reply on success, an empty ack otherwise.
/// let reply = invoker.invoke(invocation).await;
/// # let _ = reply;
/// # }
/// ```
pub struct FailbackInvoker {
    cfg: FailbackConfig,
    directory: Arc<dyn Directory>,
    bus: Bus,
    retry: OnceLock<RetryHandle>,
    destroyed: AtomicBool,
}

impl FailbackInvoker {
    /// Creates an invoker with its own event bus and no subscribers.
    ///
    /// Use [`FailbackInvoker::builder`] to attach subscribers.
    pub fn new(directory: Arc<dyn Directory>, cfg: FailbackConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::with_bus(cfg, directory, bus)
    }

    /// Returns a builder for wiring subscribers onto the event bus.
    pub fn builder(directory: Arc<dyn Directory>, cfg: FailbackConfig) -> FailbackInvokerBuilder {
        FailbackInvokerBuilder::new(directory, cfg)
    }

    pub(crate) fn with_bus(cfg: FailbackConfig, directory: Arc<dyn Directory>, bus: Bus) -> Self {
        Self {
            cfg,
            directory,
            bus,
            retry: OnceLock::new(),
            destroyed: AtomicBool::new(false),
        }
    }

    /// Performs the call, falling back to a background retry on failure.
    ///
    /// Returns promptly in all cases:
    /// - success → the endpoint's reply, unchanged;
    /// - no reachable endpoints → [`Reply::ack`], nothing scheduled;
    /// - failure with queue capacity → [`Reply::ack`], retry scheduled;
    /// - failure at capacity → [`Reply::ack`], failure dropped;
    /// - after [`destroy`](Self::destroy) → [`Reply::ack`].
    pub async fn invoke(&self, invocation: Arc<Invocation>) -> Reply {
        if self.is_destroyed() {
            return Reply::ack();
        }

        let endpoints = self.directory.list(&invocation);
        if let Err(err) = check_endpoints(&endpoints, &invocation) {
            self.bus.publish(
                Event::now(EventKind::DirectoryEmpty)
                    .with_service(invocation.service())
                    .with_method(invocation.method())
                    .with_error(err.to_string()),
            );
            return Reply::ack();
        }

        let strategy = balance::named(self.cfg.balance_for(invocation.method()));
        let endpoint = match strategy.select(&invocation, &endpoints, &[]) {
            Some(endpoint) => endpoint,
            // Unreachable with a non-empty list; acknowledged defensively.
            None => return Reply::ack(),
        };

        match endpoint.call(&invocation).await {
            Ok(reply) => reply,
            Err(err) => {
                let handle = self.retry_handle();

                let pending = handle.queue.len();
                if pending >= self.cfg.max_pending() {
                    self.bus.publish(
                        Event::now(EventKind::QueueSaturated)
                            .with_service(invocation.service())
                            .with_method(invocation.method())
                            .with_error(err.to_string())
                            .with_pending(pending),
                    );
                    return Reply::ack();
                }

                let task = RetryTask::new(
                    strategy,
                    Arc::clone(&invocation),
                    endpoints,
                    Arc::clone(&endpoint),
                );
                if handle.queue.append(task).is_err() {
                    // Destroyed between the call and the append; the
                    // failure is dropped like any post-shutdown work.
                    self.bus.publish(
                        Event::now(EventKind::QueueDisposed)
                            .with_service(invocation.service())
                            .with_method(invocation.method()),
                    );
                    return Reply::ack();
                }

                self.bus.publish(
                    Event::now(EventKind::FailbackScheduled)
                        .with_service(invocation.service())
                        .with_method(invocation.method())
                        .with_endpoint(endpoint.url())
                        .with_error(err.to_string())
                        .with_pending(handle.queue.len()),
                );
                Reply::ack()
            }
        }
    }

    /// Number of retry tasks currently pending. Best-effort; 0 before the
    /// first failure and after disposal.
    pub fn pending_retries(&self) -> usize {
        self.retry.get().map_or(0, |h| h.queue.len())
    }

    /// The event bus carrying this invoker's failback decisions.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// True once [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Stops the retry machinery. Idempotent.
    ///
    /// No new ticks fire and the queue is disposed; the retry loop observes
    /// disposal on its next head inspection and terminates. A retry already
    /// in flight completes its call and then fails its re-enqueue against
    /// the disposed queue (logged, not fatal). Remaining teardown (directory
    /// detachment, connection shutdown) belongs to the surrounding stack.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.retry.get() {
            handle.cancel.cancel();
            handle.queue.dispose();
        }
    }

    /// Exactly-once creation of the queue and the retry loop.
    fn retry_handle(&self) -> &RetryHandle {
        let handle = self.retry.get_or_init(|| {
            let queue = Arc::new(RetryQueue::new(self.cfg.max_pending()));
            let cancel = CancellationToken::new();
            let retry_loop =
                RetryLoop::new(Arc::clone(&queue), self.bus.clone(), self.cfg.max_retries());
            tokio::spawn(retry_loop.run(cancel.clone()));
            RetryHandle { queue, cancel }
        });
        // destroy() may have run between invoke's entry check and this
        // init; a loop created that late must still be torn down.
        if self.is_destroyed() && !handle.queue.is_disposed() {
            handle.cancel.cancel();
            handle.queue.dispose();
        }
        handle
    }

    #[cfg(test)]
    pub(crate) fn queue(&self) -> Option<&Arc<RetryQueue>> {
        self.retry.get().map(|h| &h.queue)
    }
}

impl Drop for FailbackInvoker {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Validity check over the endpoint list, shared with other cluster
/// strategies: fails fast before any call is attempted.
fn check_endpoints(endpoints: &[EndpointRef], invocation: &Invocation) -> Result<(), ClusterError> {
    if endpoints.is_empty() {
        return Err(ClusterError::NoEndpoints {
            service: invocation.service().to_string(),
            method: invocation.method().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::queue::Polled;
    use crate::cluster::testutil::{mock_invocation, MockEndpoint};
    use crate::rpc::StaticDirectory;
    use std::time::Duration;
    use tokio::time;

    fn invoker_over(
        endpoint: Arc<MockEndpoint>,
        cfg: FailbackConfig,
    ) -> (FailbackInvoker, Arc<MockEndpoint>) {
        let directory = StaticDirectory::shared(vec![endpoint.clone() as _]);
        (FailbackInvoker::new(directory, cfg), endpoint)
    }

    /// Lets spawned tasks run without advancing the paused clock.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_reply_unchanged() {
        let (invoker, endpoint) = invoker_over(
            MockEndpoint::new("tcp://a", 0),
            FailbackConfig::default(),
        );

        let reply = invoker.invoke(mock_invocation()).await;

        assert_eq!(reply.payload(), b"pong");
        assert_eq!(endpoint.calls(), 1);
        assert_eq!(invoker.pending_retries(), 0);
        assert!(invoker.queue().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_enqueues_task() {
        let (invoker, endpoint) = invoker_over(
            MockEndpoint::failing("tcp://a"),
            FailbackConfig::default(),
        );
        let mut rx = invoker.bus().subscribe();

        let reply = invoker.invoke(mock_invocation()).await;

        assert!(reply.is_ack());
        assert_eq!(endpoint.calls(), 1);
        assert_eq!(invoker.pending_retries(), 1);

        let queue = invoker.queue().unwrap();
        match queue.peek(|t| (t.retries(), t.last_endpoint_url().to_string())) {
            Polled::Item((retries, url)) => {
                assert_eq!(retries, 0);
                assert_eq!(url, "tcp://a");
            }
            other => panic!("expected queued task, got {other:?}"),
        }

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::FailbackScheduled);
        assert_eq!(ev.endpoint.as_deref(), Some("tcp://a"));
        assert_eq!(ev.pending, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_directory_acks_without_scheduling() {
        let invoker =
            FailbackInvoker::new(StaticDirectory::shared(Vec::new()), FailbackConfig::default());
        let mut rx = invoker.bus().subscribe();

        let reply = invoker.invoke(mock_invocation()).await;

        assert!(reply.is_ack());
        assert_eq!(invoker.pending_retries(), 0);
        assert!(invoker.queue().is_none());
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::DirectoryEmpty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saturated_queue_drops_new_failure() {
        let cfg = FailbackConfig {
            max_pending: 1,
            ..FailbackConfig::default()
        };
        let (invoker, endpoint) = invoker_over(MockEndpoint::failing("tcp://a"), cfg);
        let mut rx = invoker.bus().subscribe();

        let first = invoker.invoke(mock_invocation()).await;
        let second = invoker.invoke(mock_invocation()).await;

        assert!(first.is_ack());
        assert!(second.is_ack());
        assert_eq!(endpoint.calls(), 2);
        assert_eq!(invoker.pending_retries(), 1);

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::FailbackScheduled);
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::QueueSaturated);
        assert_eq!(ev.pending, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_failures_admit_one_at_capacity_one() {
        let cfg = FailbackConfig {
            max_pending: 1,
            ..FailbackConfig::default()
        };
        let (invoker, _endpoint) = invoker_over(MockEndpoint::failing("tcp://a"), cfg);
        let mut rx = invoker.bus().subscribe();

        let (a, b) = tokio::join!(
            invoker.invoke(mock_invocation()),
            invoker.invoke(mock_invocation())
        );

        assert!(a.is_ack());
        assert!(b.is_ack());
        assert_eq!(invoker.pending_retries(), 1);

        settle().await;
        let mut scheduled = 0;
        let mut saturated = 0;
        while let Ok(ev) = rx.try_recv() {
            match ev.kind {
                EventKind::FailbackScheduled => scheduled += 1,
                EventKind::QueueSaturated => saturated += 1,
                _ => {}
            }
        }
        assert_eq!(scheduled, 1);
        assert_eq!(saturated, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_dispatch_before_readiness_threshold() {
        let (invoker, endpoint) = invoker_over(
            MockEndpoint::failing("tcp://a"),
            FailbackConfig::default(),
        );

        invoker.invoke(mock_invocation()).await;
        assert_eq!(endpoint.calls(), 1);

        // Under 5s old: ticks fire but the head is never dispatched.
        for _ in 0..4 {
            time::advance(Duration::from_secs(1)).await;
            settle().await;
        }
        assert_eq!(endpoint.calls(), 1);
        assert_eq!(invoker.pending_retries(), 1);

        // Past the threshold the next tick dispatches it.
        time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(endpoint.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_discards_task() {
        // Fails the foreground attempt and the first retry, then recovers.
        let (invoker, endpoint) = invoker_over(
            MockEndpoint::new("tcp://a", 2),
            FailbackConfig::default(),
        );
        let mut rx = invoker.bus().subscribe();

        invoker.invoke(mock_invocation()).await;

        let mut failed = 0;
        loop {
            let ev = rx.recv().await.unwrap();
            match ev.kind {
                EventKind::RetryFailed => failed += 1,
                EventKind::RetrySucceeded => break,
                EventKind::RetryAbandoned => panic!("task abandoned instead of succeeding"),
                _ => {}
            }
        }

        assert_eq!(failed, 1);
        assert_eq!(endpoint.calls(), 3);
        settle().await;
        assert_eq!(invoker.pending_retries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_after_retry_budget() {
        let cfg = FailbackConfig {
            retries: 2,
            ..FailbackConfig::default()
        };
        let (invoker, endpoint) = invoker_over(MockEndpoint::failing("tcp://a"), cfg);
        let mut rx = invoker.bus().subscribe();

        invoker.invoke(mock_invocation()).await;

        let mut failed_attempts = Vec::new();
        let abandoned = loop {
            let ev = rx.recv().await.unwrap();
            match ev.kind {
                EventKind::RetryFailed => failed_attempts.push(ev.attempt),
                EventKind::RetryAbandoned => break ev,
                _ => {}
            }
        };

        // 1 foreground + 2 background attempts, then dropped for good.
        assert_eq!(failed_attempts, vec![Some(0), Some(1)]);
        assert_eq!(abandoned.attempt, Some(2));
        assert_eq!(endpoint.calls(), 3);

        time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(endpoint.calls(), 3);
        assert_eq!(invoker.pending_retries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_stops_retry_loop() {
        let (invoker, endpoint) = invoker_over(
            MockEndpoint::failing("tcp://a"),
            FailbackConfig::default(),
        );
        let mut rx = invoker.bus().subscribe();

        invoker.invoke(mock_invocation()).await;
        assert_eq!(invoker.pending_retries(), 1);

        invoker.destroy();
        invoker.destroy();

        loop {
            let ev = rx.recv().await.unwrap();
            if ev.kind == EventKind::SchedulerStopped {
                break;
            }
        }
        assert!(invoker.queue().unwrap().is_disposed());
        assert_eq!(invoker.pending_retries(), 0);

        // No retries were ever dispatched, and new calls are acked blind.
        let reply = invoker.invoke(mock_invocation()).await;
        assert!(reply.is_ack());
        assert_eq!(endpoint.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_first_failures_start_one_loop() {
        let (invoker, _endpoint) = invoker_over(
            MockEndpoint::failing("tcp://a"),
            FailbackConfig::default(),
        );
        let mut rx = invoker.bus().subscribe();

        tokio::join!(
            invoker.invoke(mock_invocation()),
            invoker.invoke(mock_invocation()),
            invoker.invoke(mock_invocation())
        );
        assert_eq!(invoker.pending_retries(), 3);

        invoker.destroy();
        let mut stopped = 0;
        loop {
            let ev = rx.recv().await.unwrap();
            if ev.kind == EventKind::SchedulerStopped {
                stopped += 1;
                break;
            }
        }
        // A second loop would report a second stop.
        time::advance(Duration::from_secs(5)).await;
        settle().await;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::SchedulerStopped {
                stopped += 1;
            }
        }
        assert_eq!(stopped, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_before_any_failure_is_harmless() {
        let (invoker, endpoint) = invoker_over(
            MockEndpoint::new("tcp://a", 0),
            FailbackConfig::default(),
        );

        invoker.destroy();
        assert!(invoker.is_destroyed());

        let reply = invoker.invoke(mock_invocation()).await;
        assert!(reply.is_ack());
        assert_eq!(endpoint.calls(), 0);
        assert!(invoker.queue().is_none());
    }
}
