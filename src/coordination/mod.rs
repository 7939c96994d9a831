//! # Coordination: routing management operations across the domain.
//!
//! When an operation reaches this host it has to be split along two axes:
//! does this host care at all, and which parts run in the domain phase
//! versus directly on a managed server. The resolver answers both and later
//! reshapes the domain's result back into the caller's step numbering.
//!
//! ## Contents
//! - [`address`] — [`PathElement`] / [`PathAddress`], multi-target aware.
//! - [`operation`] — [`Operation`], [`OperationHeaders`], [`ServerIdentity`].
//! - [`support`] — [`classify`] + [`HostExecutionSupport`] and its seams.

mod address;
mod operation;
mod support;

pub use address::{PathAddress, PathElement, HOST, SERVER};
pub use operation::{Operation, OperationHeaders, ServerIdentity, COMPOSITE};
pub use support::{
    classify, DomainModelView, HostExecutionSupport, NoExclusions, ResourceExclusions,
    ServerOperationProvider,
};
