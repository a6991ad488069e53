//! Error types used by the failback strategy and by endpoint calls.
//!
//! This module defines two main error enums:
//!
//! - [`ClusterError`] — errors raised by the cluster strategy itself
//!   (endpoint resolution, retry queue lifecycle).
//! - [`CallError`] — errors raised by individual remote calls made through
//!   an [`Endpoint`](crate::rpc::Endpoint).
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.
//!
//! Note that [`FailbackInvoker::invoke`](crate::FailbackInvoker::invoke)
//! never surfaces either of these to the caller: once the strategy decides
//! to failback, failures are observable only through the event bus.

use thiserror::Error;

/// # Errors produced by the cluster strategy.
///
/// These represent failures in the strategy machinery itself, not in any
/// particular remote call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ClusterError {
    /// The directory returned no reachable endpoints for the invocation.
    #[error("no reachable endpoints for {service}.{method}")]
    NoEndpoints {
        /// Target service name.
        service: String,
        /// Target method name.
        method: String,
    },

    /// The retry queue has been disposed; no task can be added or removed.
    #[error("retry queue disposed")]
    QueueDisposed,
}

impl ClusterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use failback::ClusterError;
    ///
    /// assert_eq!(ClusterError::QueueDisposed.as_label(), "queue_disposed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ClusterError::NoEndpoints { .. } => "no_endpoints",
            ClusterError::QueueDisposed => "queue_disposed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ClusterError::NoEndpoints { service, method } => {
                format!("no reachable endpoints for {service}.{method}")
            }
            ClusterError::QueueDisposed => "retry queue disposed".to_string(),
        }
    }
}

/// # Errors produced by a remote call.
///
/// Returned by [`Endpoint::call`](crate::rpc::Endpoint::call). Every variant
/// is treated the same way by the failback strategy: the call is scheduled
/// for a background retry (or dropped once the retry budget is exhausted).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CallError {
    /// The transport failed before a response was received.
    #[error("network error: {error}")]
    Network {
        /// The underlying error message.
        error: String,
    },

    /// The call did not complete within the transport's deadline.
    #[error("call timed out: {error}")]
    Timeout {
        /// The underlying error message.
        error: String,
    },

    /// The remote side answered with an application-level error.
    #[error("service error: {error}")]
    Service {
        /// The underlying error message.
        error: String,
    },
}

impl CallError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use failback::CallError;
    ///
    /// let err = CallError::Network { error: "connection refused".into() };
    /// assert_eq!(err.as_label(), "call_network");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CallError::Network { .. } => "call_network",
            CallError::Timeout { .. } => "call_timeout",
            CallError::Service { .. } => "call_service",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallError::Network { error } => format!("network: {error}"),
            CallError::Timeout { error } => format!("timeout: {error}"),
            CallError::Service { error } => format!("service: {error}"),
        }
    }
}
