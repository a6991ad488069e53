//! Strategy events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the invoke path, the retry loop,
//! and spawned retry units. The event stream is the only place failure
//! information surfaces — [`FailbackInvoker::invoke`](crate::FailbackInvoker::invoke)
//! itself never returns an error.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `FailbackInvoker::invoke`, `RetryLoop`, retry units.
//! - **Consumers**: the builder's subscriber listener (fans out to
//!   `SubscriberSet`) and any direct `Bus::subscribe` receiver (tests,
//!   metrics).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
