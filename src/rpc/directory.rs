//! # Source of currently reachable endpoints.
//!
//! [`Directory`] abstracts service discovery: given an invocation, it
//! returns the endpoints that are reachable *right now*. How that list is
//! maintained (registry watches, health checks, static config) is outside
//! this crate.
//!
//! The failback strategy consults the directory exactly once per
//! foreground call. The list captured at the moment of the original failure
//! becomes a [`RetryTask`](crate::RetryTask)'s fixed candidate pool; it is
//! never refreshed on subsequent retries.

use std::sync::Arc;

use crate::rpc::{EndpointRef, Invocation};

/// Provider of the current endpoint list for an invocation.
///
/// May return an empty list; the invoker treats that as "nothing to retry
/// against" and acknowledges the call without scheduling anything.
pub trait Directory: Send + Sync + 'static {
    /// Returns the currently reachable endpoints for the invocation.
    fn list(&self, invocation: &Invocation) -> Vec<EndpointRef>;
}

/// Directory backed by a fixed endpoint list.
///
/// Useful for tests and for deployments with static membership. Every
/// invocation sees the same candidates.
pub struct StaticDirectory {
    endpoints: Vec<EndpointRef>,
}

impl StaticDirectory {
    /// Creates a directory over the given endpoints.
    pub fn new(endpoints: Vec<EndpointRef>) -> Self {
        Self { endpoints }
    }

    /// Convenience: wraps the directory in an `Arc`.
    pub fn shared(endpoints: Vec<EndpointRef>) -> Arc<Self> {
        Arc::new(Self::new(endpoints))
    }
}

impl Directory for StaticDirectory {
    fn list(&self, _invocation: &Invocation) -> Vec<EndpointRef> {
        self.endpoints.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallError;
    use crate::rpc::{Endpoint, Reply};
    use async_trait::async_trait;

    struct Stub(&'static str);

    #[async_trait]
    impl Endpoint for Stub {
        fn url(&self) -> &str {
            self.0
        }

        async fn call(&self, _invocation: &Invocation) -> Result<Reply, CallError> {
            Ok(Reply::ack())
        }
    }

    #[test]
    fn test_static_directory_returns_all_endpoints() {
        let dir = StaticDirectory::new(vec![Arc::new(Stub("a://1")), Arc::new(Stub("b://2"))]);
        let inv = Invocation::new("svc", "m", Vec::new());
        let listed = dir.list(&inv);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].url(), "a://1");
    }

    #[test]
    fn test_static_directory_may_be_empty() {
        let dir = StaticDirectory::new(Vec::new());
        let inv = Invocation::new("svc", "m", Vec::new());
        assert!(dir.list(&inv).is_empty());
    }
}
