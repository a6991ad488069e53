//! Builder wiring config, directory, bus, and subscribers together.

use std::sync::Arc;

use crate::config::FailbackConfig;
use crate::events::Bus;
use crate::rpc::Directory;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::invoker::FailbackInvoker;

/// Builder for constructing a [`FailbackInvoker`] with optional
/// subscribers.
///
/// ## Example
/// ```no_run
/// use std::sync::Arc;
/// use failback::{FailbackConfig, FailbackInvoker, StaticDirectory, Subscribe};
///
/// # async fn run(subs: Vec<Arc<dyn Subscribe>>) {
/// let invoker = FailbackInvoker::builder(
///     StaticDirectory::shared(Vec::new()),
///     FailbackConfig::default(),
/// )
/// .with_subscribers(subs)
/// .build();
/// # let _ = invoker;
/// # }
/// ```
pub struct FailbackInvokerBuilder {
    cfg: FailbackConfig,
    directory: Arc<dyn Directory>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl FailbackInvokerBuilder {
    /// Creates a new builder over the given directory and configuration.
    pub fn new(directory: Arc<dyn Directory>, cfg: FailbackConfig) -> Self {
        Self {
            cfg,
            directory,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive strategy events (failback decisions, retry
    /// outcomes, abandonments) through dedicated workers with bounded
    /// queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the invoker.
    ///
    /// When subscribers are present this spawns the fan-out listener, so it
    /// must be called within a tokio runtime.
    pub fn build(self) -> Arc<FailbackInvoker> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        if !self.subscribers.is_empty() {
            let set = Arc::new(SubscriberSet::new(self.subscribers));
            let mut rx = bus.subscribe();
            tokio::spawn(async move {
                while let Ok(ev) = rx.recv().await {
                    set.emit(&ev);
                }
            });
        }

        Arc::new(FailbackInvoker::with_bus(self.cfg, self.directory, bus))
    }
}
