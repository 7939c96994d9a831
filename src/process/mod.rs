//! Managed OS processes and their identity.
//!
//! This module contains the per-process half of the controller:
//! - [`AuthKey`] the content-addressed authentication key every managed
//!   process is issued at registration time;
//! - [`ProcessState`] the lifecycle state machine;
//! - [`ManagedProcess`] the spawn parameters and runtime handle of one child
//!   OS process.
//!
//! ## Rules
//! - A `ManagedProcess` is exclusively owned by the
//!   [`ProcessRegistry`](crate::ProcessRegistry); every state transition
//!   happens while the caller holds the registry lock.
//! - The registry, not the process, owns the exit-monitor task: the process
//!   hands the spawned [`tokio::process::Child`] back to the registry, which
//!   awaits its exit and drives the crash/respawn/removal transitions.

mod auth;
mod managed;
mod state;

pub use auth::AuthKey;
pub use managed::ManagedProcess;
pub use state::ProcessState;
