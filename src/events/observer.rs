//! # Observer connection trait.
//!
//! An [`ObserverConnection`] is one attached management connection that
//! wants to hear about process lifecycle transitions. The registry only
//! ever hands it fully encoded frames; the transport behind it (socket,
//! in-memory pipe in tests) is the implementor's business.

use async_trait::async_trait;
use bytes::Bytes;

/// One attached observer of process lifecycle events.
///
/// ### Implementation requirements
/// - `send` must write the whole frame or fail; partial delivery is treated
///   as a failure by the fan-out and the observer is deregistered.
/// - Implementations should be cheap to clone behind an `Arc`; the fan-out
///   keeps a snapshot of `Arc`s while iterating.
#[async_trait]
pub trait ObserverConnection: Send + Sync {
    /// Delivers one encoded event frame.
    async fn send(&self, frame: Bytes) -> std::io::Result<()>;

    /// Returns the observer name used in logs.
    ///
    /// Prefer short, descriptive names (e.g., "domain-controller",
    /// "console"). The default uses `type_name::<Self>()`, which can be
    /// verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
