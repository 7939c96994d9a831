//! Shared wire-encoding primitives.
//!
//! Both the event broadcaster frames and the domain-connection handshake
//! payloads use the same scalar encodings:
//! - strings: u16 big-endian byte length + UTF-8 bytes;
//! - binary blobs: u32 big-endian length + raw bytes;
//! - integers: fixed-width big-endian;
//! - booleans: a single byte, `0` or `1`.
//!
//! Decoding is total: every helper returns [`FrameError`] instead of
//! panicking on truncated or malformed input.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Errors produced while decoding a wire frame.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The frame ended before the expected field.
    #[error("truncated frame: needed {needed} more bytes")]
    Truncated {
        /// How many additional bytes the decoder required.
        needed: usize,
    },

    /// A string field did not contain valid UTF-8.
    #[error("invalid utf-8 in string field")]
    InvalidUtf8,

    /// An unknown type tag or parameter code.
    #[error("unrecognized code: {0:#04x}")]
    UnknownCode(u8),

    /// A boolean field held something other than 0 or 1.
    #[error("invalid boolean byte: {0:#04x}")]
    InvalidBool(u8),
}

pub(crate) fn put_str(buf: &mut BytesMut, s: &str) {
    let bytes = s.as_bytes();
    buf.put_u16(bytes.len().min(u16::MAX as usize) as u16);
    buf.put_slice(&bytes[..bytes.len().min(u16::MAX as usize)]);
}

pub(crate) fn put_blob(buf: &mut BytesMut, blob: &[u8]) {
    buf.put_u32(blob.len() as u32);
    buf.put_slice(blob);
}

pub(crate) fn put_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(u8::from(value));
}

pub(crate) fn get_u8(buf: &mut Bytes) -> Result<u8, FrameError> {
    ensure(buf, 1)?;
    Ok(buf.get_u8())
}

pub(crate) fn get_u16(buf: &mut Bytes) -> Result<u16, FrameError> {
    ensure(buf, 2)?;
    Ok(buf.get_u16())
}

pub(crate) fn get_u32(buf: &mut Bytes) -> Result<u32, FrameError> {
    ensure(buf, 4)?;
    Ok(buf.get_u32())
}

pub(crate) fn get_u64(buf: &mut Bytes) -> Result<u64, FrameError> {
    ensure(buf, 8)?;
    Ok(buf.get_u64())
}

pub(crate) fn get_str(buf: &mut Bytes) -> Result<String, FrameError> {
    let len = get_u16(buf)? as usize;
    ensure(buf, len)?;
    let raw = buf.split_to(len);
    String::from_utf8(raw.to_vec()).map_err(|_| FrameError::InvalidUtf8)
}

pub(crate) fn get_blob(buf: &mut Bytes) -> Result<Bytes, FrameError> {
    let len = get_u32(buf)? as usize;
    ensure(buf, len)?;
    Ok(buf.split_to(len))
}

pub(crate) fn get_bool(buf: &mut Bytes) -> Result<bool, FrameError> {
    match get_u8(buf)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(FrameError::InvalidBool(other)),
    }
}

fn ensure(buf: &Bytes, needed: usize) -> Result<(), FrameError> {
    if buf.remaining() < needed {
        Err(FrameError::Truncated {
            needed: needed - buf.remaining(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let mut buf = BytesMut::new();
        put_str(&mut buf, "server-one");
        let mut frame = buf.freeze();
        assert_eq!(get_str(&mut frame).unwrap(), "server-one");
        assert!(frame.is_empty());
    }

    #[test]
    fn blob_round_trip() {
        let mut buf = BytesMut::new();
        put_blob(&mut buf, &[0xDE, 0xAD, 0xBE, 0xEF]);
        let mut frame = buf.freeze();
        assert_eq!(get_blob(&mut frame).unwrap().as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn truncated_string_is_an_error() {
        let mut buf = BytesMut::new();
        buf.put_u16(10);
        buf.put_slice(b"abc");
        let mut frame = buf.freeze();
        assert!(matches!(
            get_str(&mut frame),
            Err(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn bool_rejects_garbage() {
        let mut frame = Bytes::from_static(&[7]);
        assert_eq!(get_bool(&mut frame), Err(FrameError::InvalidBool(7)));
    }
}
