//! RPC collaborator seams consumed by the failback strategy.
//!
//! The strategy never serializes or transports anything itself; it talks to
//! the surrounding RPC stack through three narrow interfaces:
//!
//! ## Contents
//! - [`Invocation`] immutable description of one remote method call
//! - [`Endpoint`], [`EndpointRef`], [`Reply`] a callable remote target and
//!   its result type
//! - [`Directory`], [`StaticDirectory`] the source of currently reachable
//!   endpoints
//!
//! ## Quick wiring
//! ```text
//! FailbackInvoker::invoke(invocation)
//!      ├─► Directory::list(&invocation)      → Vec<EndpointRef>
//!      ├─► Balance::select(...)              → EndpointRef
//!      └─► Endpoint::call(&invocation).await → Result<Reply, CallError>
//! ```

mod directory;
mod endpoint;
mod invocation;

pub use directory::{Directory, StaticDirectory};
pub use endpoint::{Endpoint, EndpointRef, Reply};
pub use invocation::Invocation;
