//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [failback] service=greeter method=say_hello endpoint=tcp://a err="refused" pending=1
//! [saturated] service=greeter method=say_hello pending=100
//! [retry-failed] service=greeter method=say_hello endpoint=tcp://b err="refused" retries=1
//! [retry-ok] service=greeter method=say_hello endpoint=tcp://a
//! [abandoned] service=greeter method=say_hello retries=3
//! [scheduler-stopped]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics
/// collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::DirectoryEmpty => {
                println!(
                    "[no-endpoints] service={:?} method={:?} err={:?}",
                    e.service, e.method, e.error
                );
            }
            EventKind::FailbackScheduled => {
                println!(
                    "[failback] service={:?} method={:?} endpoint={:?} err={:?} pending={:?}",
                    e.service, e.method, e.endpoint, e.error, e.pending
                );
            }
            EventKind::QueueSaturated => {
                println!(
                    "[saturated] service={:?} method={:?} pending={:?}",
                    e.service, e.method, e.pending
                );
            }
            EventKind::RetryFailed => {
                println!(
                    "[retry-failed] service={:?} method={:?} endpoint={:?} err={:?} retries={:?}",
                    e.service, e.method, e.endpoint, e.error, e.attempt
                );
            }
            EventKind::RetrySucceeded => {
                println!(
                    "[retry-ok] service={:?} method={:?} endpoint={:?}",
                    e.service, e.method, e.endpoint
                );
            }
            EventKind::RetryAbandoned => {
                println!(
                    "[abandoned] service={:?} method={:?} retries={:?} invocation={:?}",
                    e.service, e.method, e.attempt, e.detail
                );
            }
            EventKind::QueueDisposed => {
                println!(
                    "[queue-disposed] service={:?} method={:?}",
                    e.service, e.method
                );
            }
            EventKind::DequeueFailed => {
                println!("[dequeue-failed]");
            }
            EventKind::SchedulerStopped => {
                println!("[scheduler-stopped]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
