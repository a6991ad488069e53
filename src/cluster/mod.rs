//! Failback cluster core: invoker, retry queue, and retry loop.
//!
//! This module contains the embedded implementation of the strategy. The
//! public API is [`FailbackInvoker`] (with its builder) plus the queue types
//! exposed for advanced wiring and tests.
//!
//! Modules:
//! - [`invoker`]: the public entry point; one foreground call, then
//!   fire-and-forget admission of retry work;
//! - [`builder`]: wires config, directory, bus, and subscribers together;
//! - [`queue`]: disposable concurrent FIFO with dual-signal polling;
//! - [`task`]: the deferred retry work item;
//! - [`scheduler`]: the periodic retry loop and per-task dispatch.
//!
//! ## System wiring
//! ```text
//! caller ──► FailbackInvoker::invoke
//!              ├─ success ──► Reply (unchanged)
//!              └─ failure ──► RetryQueue.append ──► Reply::ack()
//!                                  ▲    │
//!                re-enqueue (accounting)│ dequeue (1s tick, ready after 5s)
//!                                  │    ▼
//!                            RetryLoop ──► spawn retry unit ──► Endpoint::call
//! ```

mod builder;
mod invoker;
mod queue;
mod scheduler;
mod task;

pub use builder::FailbackInvokerBuilder;
pub use invoker::FailbackInvoker;
pub use queue::{Polled, RetryQueue};
pub use task::RetryTask;
