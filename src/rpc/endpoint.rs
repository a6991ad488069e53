//! # Callable remote target and its result type.
//!
//! [`Endpoint`] is the seam between the failback strategy and the actual
//! wire protocol. The strategy only needs two things from a target: a stable
//! identity ([`Endpoint::url`], used for exclusion during re-selection) and
//! a call operation returning success or [`CallError`].
//!
//! The common handle type is [`EndpointRef`], an `Arc<dyn Endpoint>`
//! suitable for sharing between the invoke path, the retry queue, and
//! spawned retry units.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CallError;
use crate::rpc::Invocation;

/// Shared handle to an endpoint.
pub type EndpointRef = Arc<dyn Endpoint>;

/// # A callable remote target.
///
/// Implementations wrap whatever transport the surrounding stack uses. The
/// call is "synchronous" from the strategy's point of view: the invoke path
/// awaits it inline and returns its result unchanged on success.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use failback::{CallError, Endpoint, Invocation, Reply};
///
/// struct Loopback;
///
/// #[async_trait]
/// impl Endpoint for Loopback {
///     fn url(&self) -> &str { "loopback://local" }
///
///     async fn call(&self, invocation: &Invocation) -> Result<Reply, CallError> {
///         Ok(Reply::new(invocation.args().to_vec()))
///     }
/// }
/// ```
#[async_trait]
pub trait Endpoint: Send + Sync + 'static {
    /// Returns a stable identity for this endpoint (address/URL).
    ///
    /// Two endpoints with the same URL are considered the same target for
    /// exclusion purposes.
    fn url(&self) -> &str;

    /// Performs one remote call.
    async fn call(&self, invocation: &Invocation) -> Result<Reply, CallError>;
}

/// Result payload of a successful call.
///
/// [`Reply::ack`] is the empty acknowledgement the failback strategy returns
/// whenever it swallows a failure: the caller sees a prompt, successful,
/// payload-less reply while the real work continues in the background.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    payload: Vec<u8>,
    attachments: HashMap<String, String>,
}

impl Reply {
    /// Creates a reply carrying a payload.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            attachments: HashMap::new(),
        }
    }

    /// Creates the empty best-effort acknowledgement.
    pub fn ack() -> Self {
        Self::default()
    }

    /// True if this reply carries no payload (i.e. looks like an ack).
    pub fn is_ack(&self) -> bool {
        self.payload.is_empty()
    }

    /// Adds an attachment (builder style).
    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attachments.insert(key.into(), value.into());
        self
    }

    /// Returns the payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the attachment map.
    pub fn attachments(&self) -> &HashMap<String, String> {
        &self.attachments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_is_empty() {
        let reply = Reply::ack();
        assert!(reply.is_ack());
        assert!(reply.payload().is_empty());
    }

    #[test]
    fn test_payload_reply_is_not_ack() {
        let reply = Reply::new(b"pong".to_vec());
        assert!(!reply.is_ack());
        assert_eq!(reply.payload(), b"pong");
    }
}
