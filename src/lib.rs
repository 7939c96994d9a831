//! # hostvisor
//!
//! **Hostvisor** is a process-controller and domain-connection library for
//! host controllers.
//!
//! It supervises a set of managed OS processes (spawn, stop, crash respawn,
//! ordered shutdown), broadcasts their lifecycle to attached observers,
//! keeps the host registered with the domain coordinator across failures,
//! and routes management operations between the domain phase and the local
//! servers.
//!
//! ## Architecture
//! ### Overview
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ManagedProcess│   │ManagedProcess│   │ManagedProcess│
//! │ (HC, spawned │   │ (server #1)  │   │ (server #2)  │
//! │    first)    │   │              │   │              │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  ProcessRegistry (supervisor core)                        │
//! │  - Mutex<Inner>: name map + auth-key map, one lock        │
//! │  - monitor task per child (await exit, respawn/remove)    │
//! │  - ObserverSet (fans out ProcessEvent frames)             │
//! │  - shutdown latch + drain Notify (HC removed first)       │
//! └──────────────────────────┬────────────────────────────────┘
//!                            ▼
//!               ObserverConnection 1..N (encoded frames)
//!
//! ┌───────────────────────────────────────────────────────────┐
//! │  DomainConnection (session state machine)                 │
//! │  - DiscoveryOption ──► CoordinatorTransport ──► Channel   │
//! │  - handshake: register / versions / model / complete      │
//! │  - reconnect loop (BackoffPolicy per pass)                │
//! │  - liveness probe (instance-id change ⇒ reconnect)        │
//! └───────────────────────────────────────────────────────────┘
//!
//! classify(operation) ──► HostExecutionSupport
//!     Ignored | DirectServerOp | DomainOp | MultiStep
//! ```
//!
//! ## Features
//! | Area               | Description                                               | Key types / traits                                  |
//! |--------------------|-----------------------------------------------------------|-----------------------------------------------------|
//! | **Supervision**    | Own and drive the lifecycle of managed OS processes.      | [`ProcessRegistry`], [`ManagedProcess`]             |
//! | **Events**         | Broadcast lifecycle frames to attached observers.         | [`ProcessEvent`], [`ObserverConnection`], [`ObserverSet`] |
//! | **Domain session** | Register with the coordinator and stay registered.        | [`DomainConnection`], [`HostRegistrationCallback`]  |
//! | **Routing**        | Split operations between domain phase and local servers.  | [`classify`], [`HostExecutionSupport`]              |
//! | **Policies**       | Backoff/jitter for respawns and reconnect passes.         | [`BackoffPolicy`], [`JitterPolicy`]                 |
//! | **Errors**         | Typed failures of the handshake and the channel.          | [`RegistrationError`], [`ChannelError`]             |
//! | **Configuration**  | Centralize runtime tunables, env-overridable.             | [`ControllerConfig`]                                |
//!
//! ## Example
//! ```rust
//! use hostvisor::{ControllerConfig, ProcessRegistry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let registry = ProcessRegistry::new(ControllerConfig::from_env());
//!
//!     let key = registry
//!         .add_process(
//!             "server-one",
//!             vec!["/bin/sh".into(), "-c".into(), "exit 0".into()],
//!             Default::default(),
//!             std::env::temp_dir(),
//!             false,
//!             false,
//!         )
//!         .await
//!         .expect("registration refused");
//!     assert_eq!(
//!         registry.server_by_auth_code(key.as_bytes()).await.as_deref(),
//!         Some("server-one")
//!     );
//!
//!     registry.start_process("server-one").await;
//!     registry.shutdown().await;
//! }
//! ```

mod config;
mod coordination;
mod domain;
mod error;
mod events;
mod policies;
mod process;
mod registry;
mod wire;

// ---- Public re-exports ----

pub use config::{
    ControllerConfig, AUTH_BYTES_ENCODED_LENGTH, AUTH_BYTES_LENGTH, HOST_CONTROLLER_PROCESS_NAME,
};
pub use coordination::{
    classify, DomainModelView, HostExecutionSupport, NoExclusions, Operation, OperationHeaders,
    PathAddress, PathElement, ResourceExclusions, ServerIdentity, ServerOperationProvider,
    COMPOSITE, HOST, SERVER,
};
pub use domain::{
    protocol, CoordinatorEndpoint, CoordinatorTransport, DiscoveryOption, DomainConnection,
    HostRegistrationCallback, ManagementChannel, ManagementRequest, ManagementResponse,
    RunningMode, SessionState, StaticDiscovery,
};
pub use error::{ChannelError, DiscoveryError, RegistrationError, RegistrationErrorCode};
pub use events::{
    codec, FailedOperation, InventoryRecord, ObserverConnection, ObserverSet, ProcessEvent,
};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use process::{AuthKey, ManagedProcess, ProcessState};
pub use registry::ProcessRegistry;
pub use wire::FrameError;
