//! SHA-256 digests for provenance fingerprints.
//!
//! A [`ContentHash`] travels on the wire as 64 lowercase hex characters.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 digest (256 bits / 32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute SHA-256 of data
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Convert to lowercase hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    ///
    /// # Errors
    ///
    /// Returns error if hex is invalid or not 32 bytes
    pub fn from_hex(hex: &str) -> CoreResult<Self> {
        let bytes = hex::decode(hex).map_err(|_| CoreError::InvalidHex)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CoreError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Check if digest matches data
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> bool {
        Self::compute(data) == *self
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_compute() {
        let hash = ContentHash::compute(b"hello world");
        assert_eq!(hash.to_hex().len(), 64);
    }

    #[test]
    fn test_known_vector() {
        let hash = ContentHash::compute(b"abc");
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_verify() {
        let hash = ContentHash::compute(b"test data");
        assert!(hash.verify(b"test data"));
        assert!(!hash.verify(b"other data"));
    }

    #[test]
    fn test_from_hex_errors() {
        assert_eq!(ContentHash::from_hex("zz"), Err(CoreError::InvalidHex));
        assert_eq!(ContentHash::from_hex("abcd"), Err(CoreError::InvalidLength(2)));
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let hash = ContentHash::compute(b"abc");
        let json = serde_json::to_value(hash).unwrap();
        assert_eq!(json, hash.to_hex());
        let back: ContentHash = serde_json::from_value(json).unwrap();
        assert_eq!(back, hash);
    }
}
