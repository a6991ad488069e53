//! # Immutable description of one remote method call.
//!
//! An [`Invocation`] names the target service and method and carries an
//! opaque argument payload plus string attachments (headers, tracing ids,
//! routing hints). It is shared as `Arc<Invocation>` across every retry
//! attempt of the same failure and is never mutated after construction.

use std::collections::HashMap;
use std::fmt;

/// One remote method call: method identity + arguments + metadata.
///
/// The failback strategy treats the payload as opaque bytes; encoding is the
/// transport's concern. Attachments travel with the invocation unchanged
/// across retries.
#[derive(Debug, Clone)]
pub struct Invocation {
    service: String,
    method: String,
    args: Vec<u8>,
    attachments: HashMap<String, String>,
}

impl Invocation {
    /// Creates a new invocation with an empty attachment set.
    pub fn new(
        service: impl Into<String>,
        method: impl Into<String>,
        args: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            args: args.into(),
            attachments: HashMap::new(),
        }
    }

    /// Adds an attachment (builder style).
    pub fn with_attachment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attachments.insert(key.into(), value.into());
        self
    }

    /// Returns the target service name.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the target method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the opaque argument payload.
    pub fn args(&self) -> &[u8] {
        &self.args
    }

    /// Returns the attachment map.
    pub fn attachments(&self) -> &HashMap<String, String> {
        &self.attachments
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}
