//! # Managed-process lifecycle states.
//!
//! ```text
//! Defined ──► Starting ──► Running ──► Stopping ──► Stopped ──► Removed
//!                ▲                        │
//!                └── respawn-on-crash ────┘ (crash while Running, respawn=true)
//! ```
//!
//! Transitions are driven only while the caller holds the registry lock.
//! A crash while `Running` with respawn disabled goes directly to `Stopped`.

/// Lifecycle state of one managed process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// Registered but never started.
    Defined,
    /// Spawn issued (or respawn pending); not yet confirmed running.
    Starting,
    /// OS process alive.
    Running,
    /// Termination requested; waiting for the OS process to exit.
    Stopping,
    /// OS process exited.
    Stopped,
    /// Terminal: removed from the registry.
    Removed,
}

impl ProcessState {
    /// Whether a start request is valid from this state.
    pub fn can_start(self) -> bool {
        matches!(self, ProcessState::Defined | ProcessState::Stopped)
    }

    /// Whether the OS process is considered alive.
    pub fn is_alive(self) -> bool {
        matches!(
            self,
            ProcessState::Starting | ProcessState::Running | ProcessState::Stopping
        )
    }

    /// Whether removal from the registry is valid from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProcessState::Defined | ProcessState::Stopped)
    }
}
