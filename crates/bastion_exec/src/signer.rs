//! Executor signing identity (Ed25519).
//!
//! Each executor signs its results with its own key, distinct from the
//! kernel's lease key, so a result can be attributed to the executor that
//! produced it.

use crate::error::{ExecutionError, SignatureError};
use crate::result::{ExecutionOutput, ExecutionResult, ExecutionStatus, body_bytes};
use bastion_core::CoreResult;
use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroizing;

/// Executor public key bytes, published as 64 hex characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutorPublicKey(pub [u8; 32]);

impl ExecutorPublicKey {
    /// Convert to hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    ///
    /// # Errors
    ///
    /// Returns error if hex is invalid or not 32 bytes
    pub fn from_hex(hex: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(hex).map_err(|_| SignatureError::InvalidHex)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| SignatureError::InvalidPublicKey)?;
        Ok(Self(arr))
    }
}

impl fmt::Display for ExecutorPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ExecutorPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ExecutorPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Signs execution results
pub struct ResultSigner {
    signing_key: SigningKey,
}

impl ResultSigner {
    /// Create a signer with a fresh random key
    #[must_use]
    pub fn generate() -> Self {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut *seed);
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Create a signer from a 32-byte secret seed
    ///
    /// # Errors
    ///
    /// Returns error if the seed is not 32 bytes
    pub fn from_seed(seed: &[u8]) -> Result<Self, SignatureError> {
        let seed: Zeroizing<[u8; 32]> =
            Zeroizing::new(seed.try_into().map_err(|_| SignatureError::InvalidSecretKey)?);
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Public half of the signing key
    #[must_use]
    pub fn public_key(&self) -> ExecutorPublicKey {
        ExecutorPublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a successful execution
    ///
    /// # Errors
    ///
    /// Returns error if the result body cannot be encoded
    pub fn success(&self, output: ExecutionOutput) -> CoreResult<ExecutionResult> {
        self.seal(ExecutionStatus::Success, Some(output), None)
    }

    /// Sign a failed execution
    ///
    /// # Errors
    ///
    /// Returns error if the result body cannot be encoded
    pub fn failure(&self, error: ExecutionError) -> CoreResult<ExecutionResult> {
        self.seal(ExecutionStatus::Failure, None, Some(error))
    }

    fn seal(
        &self,
        status: ExecutionStatus,
        output: Option<ExecutionOutput>,
        error: Option<ExecutionError>,
    ) -> CoreResult<ExecutionResult> {
        let body = body_bytes(status, output.as_ref(), error.as_ref())?;
        let signature = hex::encode(self.signing_key.sign(&body).to_bytes());
        Ok(ExecutionResult {
            status,
            output,
            error,
            signature,
        })
    }
}

impl fmt::Debug for ResultSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSigner")
            .field("public_key", &self.public_key().to_hex())
            .finish_non_exhaustive()
    }
}

/// Checks execution results against an executor's public key
#[derive(Debug, Clone)]
pub struct ResultVerifier {
    verifying_key: VerifyingKey,
}

impl ResultVerifier {
    /// Create a verifier
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid curve point
    pub fn new(public_key: ExecutorPublicKey) -> Result<Self, SignatureError> {
        let verifying_key = VerifyingKey::from_bytes(&public_key.0).map_err(|_| SignatureError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    /// Whether `result` was signed by this verifier's executor and is
    /// unmodified; false on any malformed signature
    #[must_use]
    pub fn verify(&self, result: &ExecutionResult) -> bool {
        let Ok(body) = result.signing_bytes() else {
            return false;
        };
        let Ok(bytes) = hex::decode(&result.signature) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(&bytes) else {
            return false;
        };
        self.verifying_key.verify_strict(&body, &signature).is_ok()
    }
}
