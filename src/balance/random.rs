//! # Uniform random endpoint selection.
//!
//! The default strategy. Spreads load without per-strategy state and avoids
//! the synchronized-retry patterns a deterministic choice would produce when
//! many failed calls retry against the same small pool.

use rand::Rng;

use crate::balance::{eligible, Balance};
use crate::rpc::{EndpointRef, Invocation};

/// Uniform random choice among eligible candidates.
///
/// If every candidate is excluded, falls back to a random pick over the full
/// candidate set (exclusion is a preference, not a constraint).
pub struct RandomBalance;

impl Balance for RandomBalance {
    fn name(&self) -> &'static str {
        "random"
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
        let pool = eligible(candidates, excluded);
        let mut rng = rand::thread_rng();
        if pool.is_empty() {
            let idx = rng.gen_range(0..candidates.len());
            return Some(candidates[idx].clone());
        }
        let idx = rng.gen_range(0..pool.len());
        Some(pool[idx].clone())
    }
}
