//! # Deferred retry work item.
//!
//! A [`RetryTask`] captures everything needed to retry one failed
//! invocation: the invocation itself (shared, never mutated), the balance
//! strategy resolved for it, the candidate endpoints captured at the moment
//! of the original failure, and the attempt history.
//!
//! ## Ownership
//! Exactly one execution unit owns a task at any time. Ownership moves by
//! value: the retry loop takes it out of the queue, hands it to a spawned
//! retry unit, and the unit either drops it (success, abandonment) or gives
//! it back via `append` (re-enqueue). There is no shared mutable task state
//! and no locking on the task itself.
//!
//! ## Candidate pool
//! `candidates` is fixed for the task's whole lifetime — it is never
//! refreshed from the directory on subsequent retries. An endpoint that
//! left the cluster after the original failure may still be retried.

use std::fmt;
use std::sync::Arc;

use tokio::time::Instant;

use crate::balance::BalanceRef;
use crate::rpc::{EndpointRef, Invocation};

/// One unit of deferred retry work.
pub struct RetryTask {
    /// Balance strategy resolved when the original call was made.
    pub(crate) balance: BalanceRef,
    /// The call being retried; shared unchanged across all attempts.
    pub(crate) invocation: Arc<Invocation>,
    /// Endpoint list captured at the original failure; never refreshed.
    pub(crate) candidates: Vec<EndpointRef>,
    /// Endpoint most recently attempted (the only one excluded on retry).
    pub(crate) last_endpoint: EndpointRef,
    /// Failed retry attempts so far; incremented once per failed retry.
    pub(crate) retries: u32,
    /// Timestamp of the most recent attempt, including the original
    /// failure. Re-stamped on every re-enqueue, which keeps the queue
    /// monotonic by this field.
    pub(crate) last_attempt: Instant,
}

impl RetryTask {
    /// Creates a task for an invocation that just failed its foreground
    /// attempt.
    pub fn new(
        balance: BalanceRef,
        invocation: Arc<Invocation>,
        candidates: Vec<EndpointRef>,
        last_endpoint: EndpointRef,
    ) -> Self {
        Self {
            balance,
            invocation,
            candidates,
            last_endpoint,
            retries: 0,
            last_attempt: Instant::now(),
        }
    }

    /// Returns the invocation being retried.
    pub fn invocation(&self) -> &Arc<Invocation> {
        &self.invocation
    }

    /// Returns the number of failed retry attempts so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the URL of the endpoint most recently attempted.
    pub fn last_endpoint_url(&self) -> &str {
        self.last_endpoint.url()
    }
}

// Trait-object fields rule out deriving; render the attempt state and the
// endpoint identity instead.
impl fmt::Debug for RetryTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTask")
            .field("invocation", &self.invocation)
            .field("last_endpoint", &self.last_endpoint.url())
            .field("retries", &self.retries)
            .field("last_attempt", &self.last_attempt)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::cluster::testutil::mock_task;

    #[test]
    fn test_new_task_starts_unretried() {
        let task = mock_task("tcp://a");
        assert_eq!(task.retries(), 0);
        assert_eq!(task.last_endpoint_url(), "tcp://a");
        assert_eq!(task.invocation().method(), "say_hello");
    }

    #[test]
    fn test_debug_renders_attempt_state() {
        let task = mock_task("tcp://a");
        let rendered = format!("{task:?}");
        assert!(rendered.contains("tcp://a"));
        assert!(rendered.contains("retries: 0"));
    }
}
