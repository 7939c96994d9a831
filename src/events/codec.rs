//! # Wire codec for observer event frames.
//!
//! Each event is one length-framed message: `[1-byte type tag][payload]`.
//! Strings are length-prefixed UTF-8, integers fixed-width big-endian,
//! booleans single bytes (see [`crate::wire`]).
//!
//! | tag  | event              | payload                                            |
//! |------|--------------------|----------------------------------------------------|
//! | 0x10 | PROCESS_ADDED      | name                                               |
//! | 0x11 | PROCESS_STARTED    | name                                               |
//! | 0x12 | PROCESS_STOPPED    | name, uptime millis (u64)                          |
//! | 0x13 | PROCESS_REMOVED    | name                                               |
//! | 0x14 | PROCESS_INVENTORY  | count (u32), then per process: name, raw auth-key  |
//! |      |                    | bytes (blob), running (bool), stopping (bool)      |
//! | 0x15 | OPERATION_FAILED   | operation code (u8), name                          |
//!
//! The decoder exists so the observer side of the protocol (and the
//! inventory round-trip property) can be exercised without a live socket.

use bytes::{BufMut, Bytes, BytesMut};

use crate::events::event::{FailedOperation, InventoryRecord, ProcessEvent};
use crate::process::AuthKey;
use crate::wire::{self, FrameError};

pub(crate) const PROCESS_ADDED: u8 = 0x10;
pub(crate) const PROCESS_STARTED: u8 = 0x11;
pub(crate) const PROCESS_STOPPED: u8 = 0x12;
pub(crate) const PROCESS_REMOVED: u8 = 0x13;
pub(crate) const PROCESS_INVENTORY: u8 = 0x14;
pub(crate) const OPERATION_FAILED: u8 = 0x15;

/// Encodes one event into its wire frame.
pub fn encode(event: &ProcessEvent) -> Bytes {
    let mut buf = BytesMut::new();
    match event {
        ProcessEvent::Added { name } => {
            buf.put_u8(PROCESS_ADDED);
            wire::put_str(&mut buf, name);
        }
        ProcessEvent::Started { name } => {
            buf.put_u8(PROCESS_STARTED);
            wire::put_str(&mut buf, name);
        }
        ProcessEvent::Stopped { name, uptime } => {
            buf.put_u8(PROCESS_STOPPED);
            wire::put_str(&mut buf, name);
            buf.put_u64(uptime.as_millis().min(u128::from(u64::MAX)) as u64);
        }
        ProcessEvent::Removed { name } => {
            buf.put_u8(PROCESS_REMOVED);
            wire::put_str(&mut buf, name);
        }
        ProcessEvent::Inventory { records } => {
            buf.put_u8(PROCESS_INVENTORY);
            buf.put_u32(records.len() as u32);
            for record in records {
                wire::put_str(&mut buf, &record.name);
                wire::put_blob(&mut buf, record.auth_key.as_bytes());
                wire::put_bool(&mut buf, record.running);
                wire::put_bool(&mut buf, record.stopping);
            }
        }
        ProcessEvent::OperationFailed { operation, name } => {
            buf.put_u8(OPERATION_FAILED);
            buf.put_u8(operation.code());
            wire::put_str(&mut buf, name);
        }
    }
    buf.freeze()
}

/// Decodes one wire frame back into an event.
pub fn decode(frame: &[u8]) -> Result<ProcessEvent, FrameError> {
    let mut buf = Bytes::copy_from_slice(frame);
    let tag = wire::get_u8(&mut buf)?;
    match tag {
        PROCESS_ADDED => Ok(ProcessEvent::Added {
            name: wire::get_str(&mut buf)?,
        }),
        PROCESS_STARTED => Ok(ProcessEvent::Started {
            name: wire::get_str(&mut buf)?,
        }),
        PROCESS_STOPPED => {
            let name = wire::get_str(&mut buf)?;
            let millis = wire::get_u64(&mut buf)?;
            Ok(ProcessEvent::Stopped {
                name,
                uptime: std::time::Duration::from_millis(millis),
            })
        }
        PROCESS_REMOVED => Ok(ProcessEvent::Removed {
            name: wire::get_str(&mut buf)?,
        }),
        PROCESS_INVENTORY => {
            let count = wire::get_u32(&mut buf)? as usize;
            let mut records = Vec::with_capacity(count);
            for _ in 0..count {
                let name = wire::get_str(&mut buf)?;
                let key = wire::get_blob(&mut buf)?;
                let running = wire::get_bool(&mut buf)?;
                let stopping = wire::get_bool(&mut buf)?;
                records.push(InventoryRecord {
                    name,
                    auth_key: AuthKey::from_raw(key.to_vec()),
                    running,
                    stopping,
                });
            }
            Ok(ProcessEvent::Inventory { records })
        }
        OPERATION_FAILED => {
            let code = wire::get_u8(&mut buf)?;
            let operation = FailedOperation::parse(code).ok_or(FrameError::UnknownCode(code))?;
            let name = wire::get_str(&mut buf)?;
            Ok(ProcessEvent::OperationFailed { operation, name })
        }
        other => Err(FrameError::UnknownCode(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stopped_event_carries_uptime() {
        let ev = ProcessEvent::Stopped {
            name: "server-one".into(),
            uptime: Duration::from_millis(12_345),
        };
        assert_eq!(decode(&encode(&ev)).unwrap(), ev);
    }

    #[test]
    fn inventory_round_trip_preserves_all_tuples() {
        let ev = ProcessEvent::Inventory {
            records: vec![
                InventoryRecord {
                    name: "Host Controller".into(),
                    auth_key: AuthKey::generate(),
                    running: true,
                    stopping: false,
                },
                InventoryRecord {
                    name: "server-two".into(),
                    auth_key: AuthKey::generate(),
                    running: false,
                    stopping: true,
                },
            ],
        };
        assert_eq!(decode(&encode(&ev)).unwrap(), ev);
    }

    #[test]
    fn operation_failed_carries_code_and_name() {
        let ev = ProcessEvent::OperationFailed {
            operation: FailedOperation::Start,
            name: "server-three".into(),
        };
        assert_eq!(decode(&encode(&ev)).unwrap(), ev);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(decode(&[0x7F]), Err(FrameError::UnknownCode(0x7F))));
    }

    #[test]
    fn empty_frame_is_rejected() {
        assert!(decode(&[]).is_err());
    }
}
