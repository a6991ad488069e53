//! Load-balance strategies for endpoint selection.
//!
//! This module groups the pluggable [`Balance`] trait and the built-in
//! strategies. A strategy picks one endpoint from a candidate set, given a
//! set of endpoints to avoid.
//!
//! ## Contents
//! - [`Balance`], [`BalanceRef`] the selection trait and its shared handle
//! - [`RandomBalance`] uniform random choice (the default)
//! - [`RoundRobinBalance`] rotating choice with an atomic cursor
//! - [`named`] name-based resolution used by the config layer
//!
//! ## Exclusion semantics
//! `excluded` is a hint, not a hard constraint: it may be a subset of
//! `candidates`, and when it covers *all* candidates the strategy falls back
//! to selecting among the full set. The failback retry path relies on this —
//! it excludes only the immediately preceding endpoint, so with a
//! single-endpoint pool the same target is retried again.

mod random;
mod round_robin;

pub use random::RandomBalance;
pub use round_robin::RoundRobinBalance;

use std::sync::Arc;

use crate::rpc::{EndpointRef, Invocation};

/// Shared handle to a balance strategy.
pub type BalanceRef = Arc<dyn Balance>;

/// Name of the default strategy used when resolution finds nothing better.
pub const DEFAULT_BALANCE: &str = "random";

/// Pluggable endpoint selection strategy.
///
/// Implementations must be cheap and side-effect free apart from internal
/// cursors; selection runs on the invoke hot path and inside every retry
/// unit.
pub trait Balance: Send + Sync + 'static {
    /// Returns the strategy's registered name.
    fn name(&self) -> &'static str;

    /// Picks one endpoint from `candidates`, preferring those not listed in
    /// `excluded`.
    ///
    /// Returns `None` only when `candidates` is empty.
    fn select(
        &self,
        invocation: &Invocation,
        candidates: &[EndpointRef],
        excluded: &[EndpointRef],
    ) -> Option<EndpointRef>;
}

/// Resolves a strategy by name.
///
/// Unknown or empty names resolve to [`RandomBalance`], mirroring the
/// "default to random" convention of the surrounding config layer.
pub fn named(name: &str) -> BalanceRef {
    match name {
        "roundrobin" => Arc::new(RoundRobinBalance::new()),
        _ => Arc::new(RandomBalance),
    }
}

/// Filters `candidates` down to those not present in `excluded` (by URL).
///
/// Returns borrowed refs so strategies can index without cloning until the
/// final pick.
pub(crate) fn eligible<'a>(
    candidates: &'a [EndpointRef],
    excluded: &[EndpointRef],
) -> Vec<&'a EndpointRef> {
    candidates
        .iter()
        .filter(|c| !excluded.iter().any(|e| e.url() == c.url()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_resolves_round_robin() {
        assert_eq!(named("roundrobin").name(), "roundrobin");
    }

    #[test]
    fn test_named_defaults_to_random() {
        assert_eq!(named("").name(), "random");
        assert_eq!(named("no-such-strategy").name(), "random");
        assert_eq!(named(DEFAULT_BALANCE).name(), "random");
    }
}
