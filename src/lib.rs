//! # failback
//!
//! **Failback** is a fault-tolerance strategy for RPC cluster clients:
//! when a call to a remote endpoint fails, the caller is acknowledged
//! immediately ("best effort") and the failed invocation is retried
//! silently in the background on a fixed schedule, up to a bounded number
//! of attempts, with bounded memory for pending retries. Especially useful
//! for notification-style services where promptness beats completeness.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!          caller
//!            │ invoke(invocation)
//!            ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  FailbackInvoker                                              │
//! │  - Directory::list → candidates                               │
//! │  - Balance::select → one endpoint, one foreground call        │
//! │  - on failure: admit RetryTask (capacity-checked), ack caller │
//! └──────┬───────────────────────────────────────────┬────────────┘
//!        │ append                                    │ publish
//!        ▼                                           ▼
//! ┌──────────────────┐   1s tick   ┌──────────────────────────────┐
//! │    RetryQueue    │◄───────────►│  RetryLoop (single scanner)  │
//! │ (FIFO, monotonic │   peek /    │  head ready after 5s →       │
//! │  by last attempt,│   dequeue   │  spawn retry unit per task   │
//! │  disposable)     │             └──────┬───────────────────────┘
//! └──────────────────┘                    │ spawn (fire-and-forget)
//!        ▲                                ▼
//!        │ re-enqueue              ┌──────────────┐
//!        └─────────────────────────│  retry unit  │──► Endpoint::call
//!           (below retry budget)   └──────┬───────┘
//!                                         │ publish
//!                                         ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Bus (broadcast channel)                   │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                ▼
//!                      subscriber listener ──► SubscriberSet
//!                                              (per-sub queues + workers)
//! ```
//!
//! ### Lifecycle of one failed call
//! ```text
//! invoke() fails
//!   ├─► RetryTask { retries: 0, candidates: list-at-failure, last_attempt: now }
//!   └─► queue tail
//!
//! every 1s the RetryLoop scans:
//!   head older than 5s? ─► dequeue ─► spawn retry unit:
//!       ├─► select endpoint (excluding only the last one tried)
//!       ├─► call
//!       ├─ Ok  ──► RetrySucceeded, task dropped
//!       └─ Err ──► RetryFailed, retries += 1
//!             ├─ retries < budget ──► back to queue tail (fresh timestamp)
//!             └─ else             ──► RetryAbandoned, task dropped
//!
//! destroy():
//!   ├─► cancel ticks
//!   └─► dispose queue ──► RetryLoop exits (SchedulerStopped)
//! ```
//!
//! ## Guarantees
//! - `invoke` never blocks on a retried call and never returns an error:
//!   failures surface only as [`Event`]s on the [`Bus`].
//! - Exactly one retry loop per invoker, created lazily on the first
//!   failure, even under concurrent first failures.
//! - Each failed call gets at most `max_retries + 1` total attempts.
//! - Admission control bounds *new* retry work; re-enqueued retries are
//!   never rejected for capacity (the soft bound may be exceeded
//!   transiently).
//! - A task's candidate endpoints are captured at the original failure and
//!   never refreshed.
//!
//! ## Features
//! | Area              | Description                                             | Key types / traits                   |
//! |-------------------|---------------------------------------------------------|--------------------------------------|
//! | **Invoker**       | Fire-and-forget entry point with background retries.    | [`FailbackInvoker`]                  |
//! | **Collaborators** | Seams to the surrounding RPC stack.                     | [`Directory`], [`Endpoint`], [`Balance`] |
//! | **Queue**         | Disposable concurrent FIFO with dual-signal polling.    | [`RetryQueue`], [`Polled`]           |
//! | **Subscriber API**| Hook into failback decisions (logging, metrics).        | [`Subscribe`]                        |
//! | **Errors**        | Typed errors for the strategy and for endpoint calls.   | [`ClusterError`], [`CallError`]      |
//! | **Configuration** | Retry budget, capacity, balance names.                  | [`FailbackConfig`]                   |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use failback::{EndpointRef, FailbackConfig, FailbackInvoker, Invocation, StaticDirectory};
//!
//! # async fn run(endpoints: Vec<EndpointRef>) {
//! let mut cfg = FailbackConfig::default();
//! cfg.retries = 2;
//! cfg.max_pending = 50;
//!
//! let invoker = FailbackInvoker::new(StaticDirectory::shared(endpoints), cfg);
//!
//! let invocation = Arc::new(Invocation::new("notifier", "push", b"payload".to_vec()));
//! let reply = invoker.invoke(invocation).await;
//! // Success payload, or an empty ack while the retry runs in background.
//! let _ = reply.is_ack();
//!
//! // On shutdown:
//! invoker.destroy();
//! # }
//! ```

pub mod balance;
mod cluster;
mod config;
mod error;
mod events;
mod rpc;
mod subscribers;

// ---- Public re-exports ----

pub use balance::{Balance, BalanceRef, RandomBalance, RoundRobinBalance, DEFAULT_BALANCE};
pub use cluster::{FailbackInvoker, FailbackInvokerBuilder, Polled, RetryQueue, RetryTask};
pub use config::{FailbackConfig, DEFAULT_MAX_PENDING, DEFAULT_RETRIES};
pub use error::{CallError, ClusterError};
pub use events::{Bus, Event, EventKind};
pub use rpc::{Directory, Endpoint, EndpointRef, Invocation, Reply, StaticDirectory};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
