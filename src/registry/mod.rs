//! Registry core: authoritative owner of all managed processes.
//!
//! The only public API from this module is [`ProcessRegistry`], the single
//! component permitted to mutate process lifecycle state or issue OS-level
//! process controls.
//!
//! ## Locking
//! One coarse mutex guards the whole registry: both identity maps and every
//! state transition of every [`ManagedProcess`](crate::ManagedProcess).
//! Process lifecycle operations are infrequent and short relative to the
//! I/O they trigger, so a single lock serializes them and keeps the
//! shutdown-ordering invariant auditable.
//!
//! ## Shutdown ordering
//! `shutdown()` stops the reserved host-controller process and waits until
//! it has drained out of the registry **before** touching any other
//! process: the host controller may itself be coordinating graceful
//! shutdown of the managed servers, and killing it prematurely would
//! orphan them.

mod core;

pub use self::core::ProcessRegistry;
