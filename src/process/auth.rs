//! # Process authentication keys.
//!
//! Every managed process is issued a random [`AuthKey`] when it is added to
//! the registry. The raw bytes are the lookup key an inbound server
//! connection presents to prove its identity; the base64 form is what
//! travels on the command line and the wire.
//!
//! The key wraps its bytes with content-based equality and hashing, so it
//! can serve directly as a map key — two keys with the same bytes are the
//! same identity regardless of where the buffers live.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;

use crate::config::AUTH_BYTES_LENGTH;

/// Immutable process authentication key.
///
/// 128 bits of CSPRNG entropy ([`AUTH_BYTES_LENGTH`] bytes). Equality and
/// hashing are content-based.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthKey(Box<[u8]>);

impl AuthKey {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; AUTH_BYTES_LENGTH];
        rand::rng().fill_bytes(&mut bytes);
        Self(bytes.into_boxed_slice())
    }

    /// Wraps existing raw key bytes (reconnect across a controller restart).
    pub fn from_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into().into_boxed_slice())
    }

    /// Decodes a base64 transport representation.
    pub fn from_base64(encoded: &str) -> Option<Self> {
        BASE64.decode(encoded).ok().map(Self::from_raw)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the base64 transport encoding.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }
}

impl std::fmt::Debug for AuthKey {
    // Key material stays out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthKey({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AUTH_BYTES_ENCODED_LENGTH;
    use std::collections::HashMap;

    #[test]
    fn generated_keys_have_documented_lengths() {
        let key = AuthKey::generate();
        assert_eq!(key.as_bytes().len(), AUTH_BYTES_LENGTH);
        assert_eq!(key.to_base64().len(), AUTH_BYTES_ENCODED_LENGTH);
    }

    #[test]
    fn equality_is_content_based() {
        let key = AuthKey::generate();
        let copy = AuthKey::from_raw(key.as_bytes().to_vec());
        assert_eq!(key, copy);

        let mut map = HashMap::new();
        map.insert(copy, "proc");
        assert_eq!(map.get(&key), Some(&"proc"));
    }

    #[test]
    fn base64_round_trip() {
        let key = AuthKey::generate();
        let decoded = AuthKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(AuthKey::generate(), AuthKey::generate());
    }

    #[test]
    fn debug_does_not_leak_bytes() {
        let key = AuthKey::from_raw(vec![0xAB; 16]);
        assert!(!format!("{key:?}").contains("ab"));
    }
}
