//! # Host-side registration callback.
//!
//! The session logic drives the handshake; everything that requires local
//! host knowledge (current host info, subsystem version resolution, model
//! application) is delegated through [`HostRegistrationCallback`].

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::channel::ManagementChannel;

/// Local host hooks invoked during the registration handshake.
///
/// ## Rules
/// - `create_host_info` is called once per connection attempt, never cached
///   across attempts: the snapshot must describe the host as it is *now*.
/// - `registration_complete` fires exactly once per successful registration,
///   strictly after the completion acknowledgment round-trip.
#[async_trait]
pub trait HostRegistrationCallback: Send + Sync {
    /// Produces a fresh opaque host-info snapshot for one attempt.
    fn create_host_info(&self) -> Bytes;

    /// Resolves the subsystem versions for the extensions the coordinator
    /// advertised.
    async fn resolve_subsystem_versions(&self, extensions: Vec<String>) -> Bytes;

    /// Applies the received domain model (boot operation blobs). Returns
    /// `false` when the model could not be applied; the handshake then
    /// acknowledges with an error and the registration fails.
    async fn apply_domain_model(&self, model: Vec<Bytes>) -> bool;

    /// Invoked once the session is fully registered.
    async fn registration_complete(&self, channel: Arc<dyn ManagementChannel>);
}
