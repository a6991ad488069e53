//! # Failback strategy configuration.
//!
//! Provides [`FailbackConfig`], the settings consumed by
//! [`FailbackInvoker`](crate::FailbackInvoker). Values are resolved
//! externally (registry, config file, hard-coded) and validated/defaulted
//! here.
//!
//! ## Sentinel values
//! - `retries = 0` → [`DEFAULT_RETRIES`]
//! - `max_pending = 0` → [`DEFAULT_MAX_PENDING`]
//! - `balance = ""` → [`DEFAULT_BALANCE`](crate::balance::DEFAULT_BALANCE)
//!
//! Prefer the helper accessors (`max_retries()`, `max_pending()`,
//! `balance_for()`) over reading fields directly, so sentinel checks stay in
//! one place.

use std::collections::HashMap;

use crate::balance::DEFAULT_BALANCE;

/// Default number of background retries for a failed invocation.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default soft bound on the number of pending retry tasks.
pub const DEFAULT_MAX_PENDING: usize = 100;

/// Configuration for the failback cluster strategy.
///
/// Defines:
/// - **Retry budget**: how many background retries a failed call gets
/// - **Admission control**: soft capacity for pending retry tasks
/// - **Balance strategy**: service-level default and per-method overrides
/// - **Event system**: bus capacity for event delivery
///
/// ## Field semantics
/// - `retries`: max retries per task (`0` = use [`DEFAULT_RETRIES`])
/// - `max_pending`: admission bound for *new* failures (`0` = use
///   [`DEFAULT_MAX_PENDING`]); re-enqueued retries bypass this bound
/// - `balance`: strategy name resolved via
///   [`balance::named`](crate::balance::named); unknown names fall back to
///   random
/// - `method_balance`: per-method strategy name, wins over `balance`
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct FailbackConfig {
    /// Maximum number of background retries per failed invocation.
    ///
    /// `0` falls back to [`DEFAULT_RETRIES`]. A task that has failed
    /// `retries` retry attempts is abandoned, giving each failed call at
    /// most `retries + 1` total attempts (one foreground, `retries`
    /// background).
    pub retries: u32,

    /// Soft bound on pending retry tasks.
    ///
    /// `0` falls back to [`DEFAULT_MAX_PENDING`]. Checked only when
    /// admitting a *new* failure; tasks re-enqueued by the retry loop are
    /// never rejected for capacity, so the queue may transiently exceed
    /// this bound.
    pub max_pending: usize,

    /// Service-level load-balance strategy name.
    ///
    /// Empty string falls back to the crate default (`"random"`).
    pub balance: String,

    /// Per-method load-balance strategy overrides (method name → strategy
    /// name). A method-level entry wins over `balance`.
    pub method_balance: HashMap<String, String>,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events
    /// will observe `Lagged` and skip older items. Minimum value is 1
    /// (enforced by the bus).
    pub bus_capacity: usize,
}

impl FailbackConfig {
    /// Returns the effective retry budget, applying the sentinel fallback.
    #[inline]
    pub fn max_retries(&self) -> u32 {
        if self.retries == 0 {
            DEFAULT_RETRIES
        } else {
            self.retries
        }
    }

    /// Returns the effective admission bound, applying the sentinel
    /// fallback.
    #[inline]
    pub fn max_pending(&self) -> usize {
        if self.max_pending == 0 {
            DEFAULT_MAX_PENDING
        } else {
            self.max_pending
        }
    }

    /// Resolves the balance strategy name for a method.
    ///
    /// Resolution order: method-level override, then service-level default,
    /// then the crate default (`"random"`).
    pub fn balance_for(&self, method: &str) -> &str {
        if let Some(name) = self.method_balance.get(method) {
            if !name.is_empty() {
                return name;
            }
        }
        if self.balance.is_empty() {
            DEFAULT_BALANCE
        } else {
            &self.balance
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for FailbackConfig {
    /// Default configuration:
    ///
    /// - `retries = 3` ([`DEFAULT_RETRIES`])
    /// - `max_pending = 100` ([`DEFAULT_MAX_PENDING`])
    /// - `balance = "random"`
    /// - no per-method overrides
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            max_pending: DEFAULT_MAX_PENDING,
            balance: DEFAULT_BALANCE.to_string(),
            method_balance: HashMap::new(),
            bus_capacity: 1024,
        }
    }
}
