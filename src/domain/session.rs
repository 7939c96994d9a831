//! # Session state machine.
//!
//! ```text
//! Disconnected ──► Connecting ──► Registering ──► AwaitingSubsystemVersions
//!       ▲              │        (FetchingConfig)             │
//!       │              ▼                                     ▼
//!       └──────── Reconnecting ◄── channel lost ◄── ApplyingModel
//!                                        │                   │
//!                                      Closed ◄───────── Registered
//! ```
//!
//! `Closed` is terminal: once the session was deliberately closed, no
//! transition leaves it.

/// Lifecycle of one domain connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No channel, no attempt in progress.
    Disconnected,
    /// Dialing a candidate endpoint.
    Connecting,
    /// Registration request sent, awaiting the extension list.
    Registering,
    /// Configuration fetch sent (admin-only mode), awaiting the extension list.
    FetchingConfig,
    /// Subsystem versions sent, awaiting the domain model.
    AwaitingSubsystemVersions,
    /// Applying the received domain model locally.
    ApplyingModel,
    /// Fully registered; liveness probing may be active.
    Registered,
    /// Channel lost; the reconnect loop is backing off between passes.
    Reconnecting,
    /// Deliberately closed. Terminal.
    Closed,
}

impl SessionState {
    /// Short label for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Registering => "registering",
            SessionState::FetchingConfig => "fetching_config",
            SessionState::AwaitingSubsystemVersions => "awaiting_subsystem_versions",
            SessionState::ApplyingModel => "applying_model",
            SessionState::Registered => "registered",
            SessionState::Reconnecting => "reconnecting",
            SessionState::Closed => "closed",
        }
    }

    /// Returns `true` for the terminal state.
    pub fn is_terminal(self) -> bool {
        self == SessionState::Closed
    }
}

/// Operating mode of the local host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunningMode {
    /// Join the domain as a full member.
    #[default]
    Normal,
    /// Fetch the domain configuration without joining (admin-only).
    AdminOnly,
}
