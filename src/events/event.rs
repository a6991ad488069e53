//! # Events emitted by the failback strategy.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Invoke-path events**: decisions made while handling a foreground call
//!   (empty directory, failback admitted, capacity drop)
//! - **Retry events**: outcomes of background retry attempts
//! - **Lifecycle events**: retry loop shutdown and queue disposal
//!
//! The [`Event`] struct carries metadata such as timestamps, the target
//! service/method, the endpoint tried, error text, and queue depth.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use failback::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::RetryFailed)
//!     .with_service("greeter")
//!     .with_method("say_hello")
//!     .with_error("connection refused")
//!     .with_attempt(2);
//!
//! assert_eq!(ev.kind, EventKind::RetryFailed);
//! assert_eq!(ev.attempt, Some(2));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of failback strategy events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Invoke-path events ===
    /// The directory returned no reachable endpoints; the call was
    /// acknowledged without scheduling a retry.
    ///
    /// Sets: `service`, `method`, `error`.
    DirectoryEmpty,

    /// A foreground call failed and a retry task was admitted to the queue.
    ///
    /// Sets: `service`, `method`, `endpoint`, `error`, `pending`.
    FailbackScheduled,

    /// A foreground call failed but the queue was at capacity; the failure
    /// was dropped.
    ///
    /// Sets: `service`, `method`, `error`, `pending`.
    QueueSaturated,

    // === Retry events ===
    /// A background retry attempt failed.
    ///
    /// Sets: `service`, `method`, `endpoint`, `error`, `attempt`
    /// (retry count *before* this failure was accounted).
    RetryFailed,

    /// A background retry attempt succeeded; the task is discarded.
    ///
    /// Sets: `service`, `method`, `endpoint`, `attempt`.
    RetrySucceeded,

    /// A task exceeded the retry budget and was dropped permanently.
    ///
    /// Sets: `service`, `method`, `error`, `attempt`, `detail`
    /// (full invocation rendering for diagnostics).
    RetryAbandoned,

    // === Lifecycle events ===
    /// An append hit the disposed queue (shutdown race); the task was
    /// dropped. Informational, not fatal.
    ///
    /// Sets: `service`, `method`.
    QueueDisposed,

    /// A dequeue returned nothing even though the head looked ready.
    /// Defensive; should not occur under correct queue semantics.
    DequeueFailed,

    /// The retry loop observed disposal (or cancellation) and terminated.
    SchedulerStopped,
}

/// One strategy event with optional metadata.
///
/// Fields are populated per [`EventKind`]; absent fields stay `None`.
#[derive(Debug, Clone)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Wall-clock timestamp at creation.
    pub at: SystemTime,
    /// Globally monotonic sequence number.
    pub seq: u64,
    /// Target service name.
    pub service: Option<String>,
    /// Target method name.
    pub method: Option<String>,
    /// Endpoint URL involved in the attempt.
    pub endpoint: Option<String>,
    /// Error text for failure events.
    pub error: Option<String>,
    /// Retry count associated with the event.
    pub attempt: Option<u32>,
    /// Queue depth observed when the event was produced.
    pub pending: Option<usize>,
    /// Free-form diagnostics (e.g. the full invocation on abandonment).
    pub detail: Option<String>,
}

impl Event {
    /// Creates an event stamped with the current time and the next global
    /// sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed) + 1,
            service: None,
            method: None,
            endpoint: None,
            error: None,
            attempt: None,
            pending: None,
            detail: None,
        }
    }

    /// Sets the service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Sets the method name.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the error text.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Sets the retry count.
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Sets the observed queue depth.
    pub fn with_pending(mut self, pending: usize) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Sets free-form diagnostics.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::RetryFailed);
        let b = Event::now(EventKind::RetryFailed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_populate_fields() {
        let ev = Event::now(EventKind::FailbackScheduled)
            .with_service("greeter")
            .with_method("say_hello")
            .with_endpoint("tcp://a:20880")
            .with_error("boom")
            .with_attempt(1)
            .with_pending(4)
            .with_detail("inv");
        assert_eq!(ev.service.as_deref(), Some("greeter"));
        assert_eq!(ev.method.as_deref(), Some("say_hello"));
        assert_eq!(ev.endpoint.as_deref(), Some("tcp://a:20880"));
        assert_eq!(ev.error.as_deref(), Some("boom"));
        assert_eq!(ev.attempt, Some(1));
        assert_eq!(ev.pending, Some(4));
        assert_eq!(ev.detail.as_deref(), Some("inv"));
    }
}
