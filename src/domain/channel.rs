//! # Management channel seams.
//!
//! Two traits decouple the session logic from the transport:
//! [`CoordinatorTransport`] dials one endpoint, [`ManagementChannel`] is the
//! resulting request/response conversation. Production code puts a real
//! socket behind them; tests put a scripted in-memory coordinator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::protocol::{ManagementRequest, ManagementResponse};
use crate::error::ChannelError;

/// One candidate coordinator address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoordinatorEndpoint {
    /// Connection scheme (e.g. "remote").
    pub scheme: String,
    /// Host name or address.
    pub host: String,
    /// Management port.
    pub port: u16,
}

impl CoordinatorEndpoint {
    /// Creates an endpoint.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for CoordinatorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// An established request/response conversation with the coordinator.
///
/// ### Implementation requirements
/// - `execute` pairs each request with exactly one reply payload.
/// - `last_message_at` must reflect **any** traffic on the channel, so the
///   liveness probe can skip redundant pings.
/// - `closed` returns a token that fires when the channel dies for any
///   reason, including a local `close` call.
#[async_trait]
pub trait ManagementChannel: Send + Sync {
    /// Sends one request and awaits its reply payload.
    async fn execute(&self, request: ManagementRequest) -> Result<ManagementResponse, ChannelError>;

    /// Liveness probe with a bounded wait; returns the coordinator
    /// instance id carried by the reply.
    async fn ping(&self, timeout: Duration) -> Result<u64, ChannelError>;

    /// Instant of the last traffic observed on this channel.
    fn last_message_at(&self) -> Instant;

    /// Token that fires when the channel is no longer usable.
    fn closed(&self) -> CancellationToken;

    /// Tears the channel down; idempotent.
    async fn close(&self);
}

/// Dials a coordinator endpoint and produces a management channel.
#[async_trait]
pub trait CoordinatorTransport: Send + Sync {
    /// Connects to the given endpoint.
    async fn connect(
        &self,
        endpoint: &CoordinatorEndpoint,
    ) -> Result<Arc<dyn ManagementChannel>, ChannelError>;
}
