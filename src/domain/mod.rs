//! # Domain connection: joining the coordinating controller.
//!
//! Everything needed for a host to register with the domain coordinator and
//! stay registered: the handshake protocol, pluggable endpoint discovery,
//! transport/channel seams, the host-side callback, the liveness probe, and
//! the session state machine with its reconnect loop.
//!
//! ## Contents
//! - [`protocol`] — handshake wire format (requests, replies, typed errors).
//! - [`channel`] — [`ManagementChannel`] / [`CoordinatorTransport`] seams.
//! - [`discovery`] — [`DiscoveryOption`] + [`StaticDiscovery`].
//! - [`callback`] — [`HostRegistrationCallback`] local host hooks.
//! - [`session`] — [`SessionState`] machine + [`RunningMode`].
//! - [`connection`] — [`DomainConnection`]: handshake + reconnect loop.
//! - `ping` — coordinator liveness probe (internal).

pub mod protocol;

mod callback;
mod channel;
mod connection;
mod discovery;
mod ping;
mod session;

pub use callback::HostRegistrationCallback;
pub use channel::{CoordinatorEndpoint, CoordinatorTransport, ManagementChannel};
pub use connection::DomainConnection;
pub use discovery::{DiscoveryOption, StaticDiscovery};
pub use protocol::{ManagementRequest, ManagementResponse};
pub use session::{RunningMode, SessionState};
