//! # Process lifecycle events.
//!
//! [`ProcessEvent`] is a sum type: each variant carries exactly the payload
//! its wire frame needs. Failures of registry operations are reported
//! asynchronously as [`ProcessEvent::OperationFailed`] (the triggering
//! caller may not be the connection that needs to know the outcome).

use std::time::Duration;

use crate::process::AuthKey;

/// Registry operation classes reported by `OperationFailed` frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailedOperation {
    Add,
    Start,
    Stop,
    Destroy,
    Kill,
    Remove,
    SendStdin,
    Reconnect,
}

impl FailedOperation {
    /// Returns the wire code of this operation class.
    pub fn code(self) -> u8 {
        match self {
            FailedOperation::Add => 0x01,
            FailedOperation::Start => 0x02,
            FailedOperation::Stop => 0x03,
            FailedOperation::Destroy => 0x04,
            FailedOperation::Kill => 0x05,
            FailedOperation::Remove => 0x06,
            FailedOperation::SendStdin => 0x07,
            FailedOperation::Reconnect => 0x08,
        }
    }

    /// Parses a wire code.
    pub fn parse(code: u8) -> Option<Self> {
        Some(match code {
            0x01 => FailedOperation::Add,
            0x02 => FailedOperation::Start,
            0x03 => FailedOperation::Stop,
            0x04 => FailedOperation::Destroy,
            0x05 => FailedOperation::Kill,
            0x06 => FailedOperation::Remove,
            0x07 => FailedOperation::SendStdin,
            0x08 => FailedOperation::Reconnect,
            _ => return None,
        })
    }
}

/// One process's line in an inventory snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Process name.
    pub name: String,
    /// Raw authentication key bytes.
    pub auth_key: AuthKey,
    /// Whether the process is currently running.
    pub running: bool,
    /// Whether a stop is in progress.
    pub stopping: bool,
}

/// Broadcast-worthy lifecycle event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessEvent {
    /// A process was registered.
    Added {
        /// Process name.
        name: String,
    },
    /// A process was started (or respawned).
    Started {
        /// Process name.
        name: String,
    },
    /// A process exited; carries its wall-clock uptime.
    Stopped {
        /// Process name.
        name: String,
        /// Time between spawn and observed exit.
        uptime: Duration,
    },
    /// A process was removed from the registry.
    Removed {
        /// Process name.
        name: String,
    },
    /// Single-shot full-state dump, sent on demand.
    Inventory {
        /// One record per registered process.
        records: Vec<InventoryRecord>,
    },
    /// A registry operation failed on a specific process.
    OperationFailed {
        /// Which operation class failed.
        operation: FailedOperation,
        /// Process the operation targeted.
        name: String,
    },
}

impl ProcessEvent {
    /// Short label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessEvent::Added { .. } => "process_added",
            ProcessEvent::Started { .. } => "process_started",
            ProcessEvent::Stopped { .. } => "process_stopped",
            ProcessEvent::Removed { .. } => "process_removed",
            ProcessEvent::Inventory { .. } => "process_inventory",
            ProcessEvent::OperationFailed { .. } => "operation_failed",
        }
    }
}
