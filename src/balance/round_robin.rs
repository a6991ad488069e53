//! # Rotating endpoint selection.
//!
//! Cycles through eligible candidates with a shared atomic cursor. The
//! cursor is global to the strategy instance, so interleaved invocations
//! still advance the rotation.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::balance::{eligible, Balance};
use crate::rpc::{EndpointRef, Invocation};

/// Round-robin choice among eligible candidates.
///
/// If every candidate is excluded, rotates over the full candidate set
/// instead (exclusion is a preference, not a constraint).
pub struct RoundRobinBalance {
    cursor: AtomicUsize,
}

impl RoundRobinBalance {
    /// Creates a strategy with the cursor at zero.
    pub fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Default for RoundRobinBalance {
    fn default() -> Self {
        Self::new()
    }
}

impl Balance for RoundRobinBalance {
    fn name(&self) -> &'static str {
        "roundrobin"
    }

    fn select(
        &self,
        _invocation: &Invocation,
        candidates: &[EndpointRef],
        excluded: &[EndpointRef],
    ) -> Option<EndpointRef> {
        if candidates.is_empty() {
            return None;
        }
        let turn = self.cursor.fetch_add(1, Ordering::Relaxed);
        let pool = eligible(candidates, excluded);
        if pool.is_empty() {
            return Some(candidates[turn % candidates.len()].clone());
        }
        Some(pool[turn % pool.len()].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallError;
    use crate::rpc::{Endpoint, Reply};
    use async_trait::async_trait;
    use std::sync::Arc;

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
    fn test_rotates_over_candidates() {
        let inv = Invocation::new("svc", "m", Vec::new());
        let candidates: Vec<EndpointRef> = vec![
            Arc::new(Stub("tcp://a")),
            Arc::new(Stub("tcp://b")),
            Arc::new(Stub("tcp://c")),
        ];
        let rr = RoundRobinBalance::new();
        let picks: Vec<String> = (0..6)
            .map(|_| rr.select(&inv, &candidates, &[]).unwrap().url().to_string())
            .collect();
        assert_eq!(picks[0], picks[3]);
        assert_eq!(picks[1], picks[4]);
        assert_eq!(picks[2], picks[5]);
        assert_ne!(picks[0], picks[1]);
    }

    #[test]
    fn test_skips_excluded() {
        let inv = Invocation::new("svc", "m", Vec::new());
        let candidates: Vec<EndpointRef> =
            vec![Arc::new(Stub("tcp://a")), Arc::new(Stub("tcp://b"))];
        let excluded = vec![candidates[0].clone()];
        let rr = RoundRobinBalance::new();
        for _ in 0..5 {
            let picked = rr.select(&inv, &candidates, &excluded).unwrap();
            assert_eq!(picked.url(), "tcp://b");
        }
    }

    #[test]
    fn test_empty_candidates_yields_none() {
        let inv = Invocation::new("svc", "m", Vec::new());
        assert!(RoundRobinBalance::new().select(&inv, &[], &[]).is_none());
    }
}
