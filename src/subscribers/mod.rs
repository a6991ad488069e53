//! # Event subscribers for the failback strategy.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`]
//! fan-out, and a simple built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   invoke path / retry loop ── publish(Event) ──► Bus
//!                                                   │
//!                                       subscriber listener (builder)
//!                                                   │
//!                                            SubscriberSet::emit
//!                                       ┌──────────┼──────────┐
//!                                       ▼          ▼          ▼
//!                                  [queue S1] [queue S2] [queue SN]
//!                                       ▼          ▼          ▼
//!                                  worker S1  worker S2  worker SN
//!                                       ▼          ▼          ▼
//!                                  on_event()  on_event()  on_event()
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use async_trait::async_trait;
//! use failback::{Event, EventKind, Subscribe};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscribe for Metrics {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::RetryAbandoned {
//!             // increment abandonment counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "metrics" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
