//! Retry timing policies.
//!
//! This module groups the knobs that control **how long** to wait before
//! retrying something that failed: one reconnect pass against the
//! coordinating controller, or a respawn of a crashed managed process.
//!
//! ## Contents
//! - [`BackoffPolicy`] how retry delays evolve (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! DomainConnection reconnect loop:
//!     delay = backoff.next(pass_counter)    // one full discovery pass per counter tick
//! ManagedProcess respawn:
//!     delay = backoff.next(respawn_count)   // bounded by ControllerConfig::max_respawns
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=1s, factor=2.0, max=30s, jitter=None.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
