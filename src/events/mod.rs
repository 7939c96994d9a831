//! Lifecycle events: data model, wire codec, and observer fan-out.
//!
//! Every broadcast-worthy transition in the process registry produces one
//! [`ProcessEvent`], which the [`ObserverSet`] fans out to every attached
//! observer connection as a `[1-byte type tag][payload]` frame.
//!
//! ## Contents
//! - [`ProcessEvent`], [`FailedOperation`], [`InventoryRecord`] — the event
//!   data model
//! - [`codec`] — frame encoding/decoding
//! - [`ObserverConnection`] — one attached observer (a management-channel
//!   endpoint interested in process state)
//! - [`ObserverSet`] — snapshot-iterating fan-out with per-observer failure
//!   isolation
//!
//! ## Rules
//! - A write failure (or write timeout) on one observer deregisters exactly
//!   that observer; it never aborts the triggering operation or the
//!   remaining observers.
//! - Attach/detach never takes the registry lock; only the inventory
//!   snapshot does, and the registry builds that snapshot itself.

pub mod codec;

mod event;
mod observer;
mod set;

pub use event::{FailedOperation, InventoryRecord, ProcessEvent};
pub use observer::ObserverConnection;
pub use set::ObserverSet;
