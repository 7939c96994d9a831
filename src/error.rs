//! Error types used by the hostvisor runtime.
//!
//! This module defines the error enums for the two fallible surfaces of the
//! crate:
//!
//! - [`RegistrationError`] — coded failure responses from the coordinating
//!   controller during the registration handshake.
//! - [`ChannelError`] — transport failures on an established management
//!   channel.
//! - [`DiscoveryError`] — failures while resolving candidate coordinator
//!   endpoints.
//!
//! Process-registry operations deliberately have **no** error surface:
//! unknown process names and per-process operation failures are logged and
//! swallowed (races with externally observed process death are normal), and
//! failures are reported asynchronously via the `OperationFailed` broadcast.

use std::time::Duration;
use thiserror::Error;

/// Coded registration failure classes, mirrored on the wire as a single byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationErrorCode {
    /// Catch-all for failures the coordinator did not classify.
    Unknown,
    /// A host with the same name is already registered.
    HostAlreadyExists,
    /// The coordinator rejected the host's credentials.
    AuthenticationFailed,
    /// The host and coordinator run incompatible management versions.
    IncompatibleVersion,
    /// The received domain model could not be applied locally.
    ModelApplyFailed,
}

impl RegistrationErrorCode {
    /// Returns the wire code for this class.
    pub fn code(self) -> u8 {
        match self {
            RegistrationErrorCode::Unknown => 1,
            RegistrationErrorCode::HostAlreadyExists => 2,
            RegistrationErrorCode::AuthenticationFailed => 3,
            RegistrationErrorCode::IncompatibleVersion => 4,
            RegistrationErrorCode::ModelApplyFailed => 5,
        }
    }

    /// Parses a wire code; unrecognized codes map to `Unknown`.
    pub fn parse(code: u8) -> Self {
        match code {
            2 => RegistrationErrorCode::HostAlreadyExists,
            3 => RegistrationErrorCode::AuthenticationFailed,
            4 => RegistrationErrorCode::IncompatibleVersion,
            5 => RegistrationErrorCode::ModelApplyFailed,
            _ => RegistrationErrorCode::Unknown,
        }
    }
}

/// # Registration handshake failure.
///
/// Carries the coded error class and the message supplied by the
/// coordinator. Some classes are irrecoverable: retrying the same handshake
/// against the same coordinator cannot succeed, so the reconnect loop must
/// give up instead of spinning.
#[derive(Error, Debug)]
#[error("registration failed ({code:?}): {message}")]
pub struct RegistrationError {
    /// Failure classification received from the coordinator.
    pub code: RegistrationErrorCode,
    /// Human-readable message received from the coordinator.
    pub message: String,
}

impl RegistrationError {
    /// Creates a new registration error.
    pub fn new(code: RegistrationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` when retrying against the same coordinator is futile.
    pub fn is_irrecoverable(&self) -> bool {
        matches!(
            self.code,
            RegistrationErrorCode::AuthenticationFailed
                | RegistrationErrorCode::IncompatibleVersion
        )
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self.code {
            RegistrationErrorCode::Unknown => "registration_unknown",
            RegistrationErrorCode::HostAlreadyExists => "registration_host_exists",
            RegistrationErrorCode::AuthenticationFailed => "registration_auth_failed",
            RegistrationErrorCode::IncompatibleVersion => "registration_version_mismatch",
            RegistrationErrorCode::ModelApplyFailed => "registration_model_apply_failed",
        }
    }
}

/// # Errors produced by a management channel.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The underlying channel closed while a request was in flight.
    #[error("channel closed")]
    Closed,

    /// Transport-level I/O failure.
    #[error("channel i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A request did not complete within its bounded timeout.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The peer sent a frame the protocol layer could not interpret.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The coordinator answered the handshake with a coded failure.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ChannelError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::Closed => "channel_closed",
            ChannelError::Io(_) => "channel_io",
            ChannelError::Timeout { .. } => "channel_timeout",
            ChannelError::Protocol(_) => "channel_protocol",
            ChannelError::Registration(_) => "channel_registration",
        }
    }

    /// Returns `true` when the reconnect loop should stop retrying.
    pub fn is_irrecoverable(&self) -> bool {
        match self {
            ChannelError::Registration(e) => e.is_irrecoverable(),
            _ => false,
        }
    }
}

/// # Errors produced while discovering coordinator endpoints.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The discovery option produced no candidate endpoints.
    #[error("no candidate endpoints discovered")]
    NoEndpoints,

    /// The discovery mechanism itself failed (multicast error, bad config).
    #[error("discovery failed: {0}")]
    Failed(String),
}
