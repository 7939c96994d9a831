//! # Handshake wire format.
//!
//! Requests are `[1-byte op][payload]`; the channel implementation owns
//! correlation ids and length framing, this module only shapes payloads.
//! Replies open with a result byte: `PARAM_OK` followed by the
//! success payload, or `PARAM_ERROR` followed by `[error code][message]`,
//! which decodes into a typed [`RegistrationError`].
//!
//! | op   | request                     | success payload                  |
//! |------|-----------------------------|----------------------------------|
//! | 0x01 | RegisterHost                | extension list (u32 count, strs) |
//! | 0x02 | FetchDomainConfiguration    | extension list                   |
//! | 0x03 | SubsystemVersions           | model blobs (u32 count, blobs)   |
//! | 0x04 | CompleteRegistration        | empty                            |
//! | 0x05 | Unregister                  | empty                            |
//! | 0x06 | Ping                        | coordinator instance id (u64)    |
//!
//! Both directions are implemented so handshake logic can be tested against
//! an in-memory coordinator.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{RegistrationError, RegistrationErrorCode};
use crate::wire::{self, FrameError};

pub(crate) const OP_REGISTER_HOST: u8 = 0x01;
pub(crate) const OP_FETCH_DOMAIN_CONFIGURATION: u8 = 0x02;
pub(crate) const OP_SUBSYSTEM_VERSIONS: u8 = 0x03;
pub(crate) const OP_COMPLETE_REGISTRATION: u8 = 0x04;
pub(crate) const OP_UNREGISTER: u8 = 0x05;
pub(crate) const OP_PING: u8 = 0x06;

pub(crate) const PARAM_OK: u8 = 0x20;
pub(crate) const PARAM_ERROR: u8 = 0x21;
pub(crate) const PARAM_HOST_ID: u8 = 0x22;

/// One request of the registration conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManagementRequest {
    /// Step 1, normal mode: announce the host and ask to join the domain.
    RegisterHost {
        host_name: String,
        connection_id: u64,
        host_info: Bytes,
    },
    /// Step 1, admin-only mode: fetch the configuration without joining.
    FetchDomainConfiguration {
        host_name: String,
        connection_id: u64,
        host_info: Bytes,
    },
    /// Step 3: resolved subsystem versions for the advertised extensions.
    SubsystemVersions { versions: Bytes },
    /// Step 5: acknowledge the applied (or rejected) domain model.
    CompleteRegistration { ok: bool, message: String },
    /// Graceful goodbye.
    Unregister,
    /// Liveness probe.
    Ping,
}

impl ManagementRequest {
    /// Short label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ManagementRequest::RegisterHost { .. } => "register_host",
            ManagementRequest::FetchDomainConfiguration { .. } => "fetch_domain_configuration",
            ManagementRequest::SubsystemVersions { .. } => "subsystem_versions",
            ManagementRequest::CompleteRegistration { .. } => "complete_registration",
            ManagementRequest::Unregister => "unregister",
            ManagementRequest::Ping => "ping",
        }
    }
}

/// Raw reply payload; decoded by the step that sent the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagementResponse {
    pub payload: Bytes,
}

/// Encodes a request into its wire form.
pub fn encode_request(request: &ManagementRequest) -> Bytes {
    let mut buf = BytesMut::new();
    match request {
        ManagementRequest::RegisterHost {
            host_name,
            connection_id,
            host_info,
        } => {
            buf.put_u8(OP_REGISTER_HOST);
            put_host_id(&mut buf, host_name, *connection_id, host_info);
        }
        ManagementRequest::FetchDomainConfiguration {
            host_name,
            connection_id,
            host_info,
        } => {
            buf.put_u8(OP_FETCH_DOMAIN_CONFIGURATION);
            put_host_id(&mut buf, host_name, *connection_id, host_info);
        }
        ManagementRequest::SubsystemVersions { versions } => {
            buf.put_u8(OP_SUBSYSTEM_VERSIONS);
            wire::put_blob(&mut buf, versions);
        }
        ManagementRequest::CompleteRegistration { ok, message } => {
            buf.put_u8(OP_COMPLETE_REGISTRATION);
            buf.put_u8(if *ok { PARAM_OK } else { PARAM_ERROR });
            wire::put_str(&mut buf, message);
        }
        ManagementRequest::Unregister => buf.put_u8(OP_UNREGISTER),
        ManagementRequest::Ping => buf.put_u8(OP_PING),
    }
    buf.freeze()
}

/// Decodes a request from its wire form (the coordinator side).
pub fn decode_request(frame: &[u8]) -> Result<ManagementRequest, FrameError> {
    let mut buf = Bytes::copy_from_slice(frame);
    let op = wire::get_u8(&mut buf)?;
    match op {
        OP_REGISTER_HOST => {
            let (host_name, connection_id, host_info) = get_host_id(&mut buf)?;
            Ok(ManagementRequest::RegisterHost {
                host_name,
                connection_id,
                host_info,
            })
        }
        OP_FETCH_DOMAIN_CONFIGURATION => {
            let (host_name, connection_id, host_info) = get_host_id(&mut buf)?;
            Ok(ManagementRequest::FetchDomainConfiguration {
                host_name,
                connection_id,
                host_info,
            })
        }
        OP_SUBSYSTEM_VERSIONS => Ok(ManagementRequest::SubsystemVersions {
            versions: wire::get_blob(&mut buf)?,
        }),
        OP_COMPLETE_REGISTRATION => {
            let result = wire::get_u8(&mut buf)?;
            let ok = match result {
                PARAM_OK => true,
                PARAM_ERROR => false,
                other => return Err(FrameError::UnknownCode(other)),
            };
            Ok(ManagementRequest::CompleteRegistration {
                ok,
                message: wire::get_str(&mut buf)?,
            })
        }
        OP_UNREGISTER => Ok(ManagementRequest::Unregister),
        OP_PING => Ok(ManagementRequest::Ping),
        other => Err(FrameError::UnknownCode(other)),
    }
}

fn put_host_id(buf: &mut BytesMut, host_name: &str, connection_id: u64, host_info: &Bytes) {
    buf.put_u8(PARAM_HOST_ID);
    wire::put_str(buf, host_name);
    buf.put_u64(connection_id);
    wire::put_blob(buf, host_info);
}

fn get_host_id(buf: &mut Bytes) -> Result<(String, u64, Bytes), FrameError> {
    let param = wire::get_u8(buf)?;
    if param != PARAM_HOST_ID {
        return Err(FrameError::UnknownCode(param));
    }
    let host_name = wire::get_str(buf)?;
    let connection_id = wire::get_u64(buf)?;
    let host_info = wire::get_blob(buf)?;
    Ok((host_name, connection_id, host_info))
}

// ---------------------------
// Replies
// ---------------------------

/// Encodes a successful registration reply carrying the extension list.
pub fn encode_registration_ok(extensions: &[String]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(PARAM_OK);
    buf.put_u32(extensions.len() as u32);
    for extension in extensions {
        wire::put_str(&mut buf, extension);
    }
    buf.freeze()
}

/// Encodes a failed reply: `[PARAM_ERROR][error code][message]`.
pub fn encode_error(code: RegistrationErrorCode, message: &str) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(PARAM_ERROR);
    buf.put_u8(code.code());
    wire::put_str(&mut buf, message);
    buf.freeze()
}

/// Encodes a successful domain-model reply (boot operation blobs).
pub fn encode_domain_model(model: &[Bytes]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(PARAM_OK);
    buf.put_u32(model.len() as u32);
    for blob in model {
        wire::put_blob(&mut buf, blob);
    }
    buf.freeze()
}

/// Encodes a bare success reply.
pub fn encode_ok() -> Bytes {
    Bytes::from_static(&[PARAM_OK])
}

/// Encodes a ping reply carrying the coordinator instance id.
pub fn encode_ping_reply(instance_id: u64) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(PARAM_OK);
    buf.put_u64(instance_id);
    buf.freeze()
}

/// Decodes a registration reply into the advertised extension list.
pub fn decode_registration_reply(payload: &Bytes) -> Result<Vec<String>, RegistrationError> {
    let mut buf = decode_result(payload)?;
    let count = wire::get_u32(&mut buf).map_err(protocol_violation)? as usize;
    let mut extensions = Vec::with_capacity(count);
    for _ in 0..count {
        extensions.push(wire::get_str(&mut buf).map_err(protocol_violation)?);
    }
    Ok(extensions)
}

/// Decodes a domain-model reply into the boot operation blobs.
pub fn decode_domain_model_reply(payload: &Bytes) -> Result<Vec<Bytes>, RegistrationError> {
    let mut buf = decode_result(payload)?;
    let count = wire::get_u32(&mut buf).map_err(protocol_violation)? as usize;
    let mut model = Vec::with_capacity(count);
    for _ in 0..count {
        model.push(wire::get_blob(&mut buf).map_err(protocol_violation)?);
    }
    Ok(model)
}

/// Decodes a completion acknowledgment.
pub fn decode_completion_reply(payload: &Bytes) -> Result<(), RegistrationError> {
    decode_result(payload).map(|_| ())
}

/// Decodes a ping reply into the coordinator instance id.
pub fn decode_ping_reply(payload: &Bytes) -> Result<u64, RegistrationError> {
    let mut buf = decode_result(payload)?;
    wire::get_u64(&mut buf).map_err(protocol_violation)
}

/// Splits a reply into its success payload or its typed error.
fn decode_result(payload: &Bytes) -> Result<Bytes, RegistrationError> {
    let mut buf = payload.clone();
    let result = wire::get_u8(&mut buf).map_err(protocol_violation)?;
    match result {
        PARAM_OK => Ok(buf),
        PARAM_ERROR => {
            let code = wire::get_u8(&mut buf).map_err(protocol_violation)?;
            let message = wire::get_str(&mut buf).map_err(protocol_violation)?;
            Err(RegistrationError {
                code: RegistrationErrorCode::parse(code),
                message,
            })
        }
        other => Err(protocol_violation(FrameError::UnknownCode(other))),
    }
}

fn protocol_violation(err: FrameError) -> RegistrationError {
    RegistrationError {
        code: RegistrationErrorCode::Unknown,
        message: format!("malformed reply: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_round_trip() {
        let request = ManagementRequest::RegisterHost {
            host_name: "host-a".into(),
            connection_id: 42,
            host_info: Bytes::from_static(b"info"),
        };
        assert_eq!(decode_request(&encode_request(&request)).unwrap(), request);
    }

    #[test]
    fn completion_request_round_trip() {
        let request = ManagementRequest::CompleteRegistration {
            ok: false,
            message: "model rejected".into(),
        };
        assert_eq!(decode_request(&encode_request(&request)).unwrap(), request);
    }

    #[test]
    fn registration_reply_carries_extensions() {
        let payload = encode_registration_ok(&["org.acme.ext".into(), "org.acme.other".into()]);
        let extensions = decode_registration_reply(&payload).unwrap();
        assert_eq!(extensions, vec!["org.acme.ext", "org.acme.other"]);
    }

    #[test]
    fn error_reply_decodes_to_typed_error() {
        let payload = encode_error(RegistrationErrorCode::HostAlreadyExists, "duplicate host");
        let err = decode_registration_reply(&payload).unwrap_err();
        assert_eq!(err.code, RegistrationErrorCode::HostAlreadyExists);
        assert_eq!(err.message, "duplicate host");
    }

    #[test]
    fn domain_model_reply_preserves_blob_order() {
        let model = vec![Bytes::from_static(b"op-1"), Bytes::from_static(b"op-2")];
        let decoded = decode_domain_model_reply(&encode_domain_model(&model)).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn ping_reply_carries_instance_id() {
        assert_eq!(decode_ping_reply(&encode_ping_reply(7)).unwrap(), 7);
    }

    #[test]
    fn truncated_reply_is_a_protocol_violation() {
        let err = decode_registration_reply(&Bytes::from_static(&[PARAM_OK])).unwrap_err();
        assert_eq!(err.code, RegistrationErrorCode::Unknown);
        assert!(err.message.contains("malformed"));
    }
}
