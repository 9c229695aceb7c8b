//! Lease signatures: hex HMAC-SHA256 over `task_id:issued_at:expires_at`.

use bastion_core::lease::signing_payload;
use bastion_core::{CoreError, CoreResult, LeaseKey, LeaseToken};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks lease tokens with one secret key
#[derive(Clone)]
pub struct LeaseSigner {
    mac: HmacSha256,
}

impl LeaseSigner {
    /// Key a signer
    ///
    /// # Errors
    ///
    /// Returns error if the key is rejected by the MAC
    pub fn new(key: &LeaseKey) -> CoreResult<Self> {
        let mac = HmacSha256::new_from_slice(key.expose()).map_err(|e| CoreError::InvalidKey {
            reason: e.to_string(),
        })?;
        Ok(Self { mac })
    }

    fn digest(&self, task_id: &str, issued_at: i64, expires_at: i64) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(signing_payload(task_id, issued_at, expires_at).as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Lowercase hex signature for the given lease fields
    #[must_use]
    pub fn sign(&self, task_id: &str, issued_at: i64, expires_at: i64) -> String {
        hex::encode(self.digest(task_id, issued_at, expires_at))
    }

    /// Check a lease's signature against its own fields, in constant time.
    ///
    /// The signature must be the exact lowercase hex rendering.
    #[must_use]
    pub fn verify(&self, lease: &LeaseToken) -> bool {
        let expected = self.sign(&lease.task_id, lease.issued_at, lease.expires_at);
        expected.as_bytes().ct_eq(lease.signature.as_bytes()).into()
    }
}

impl fmt::Debug for LeaseSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LeaseSigner(HMAC-SHA256)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(key: &str) -> LeaseSigner {
        LeaseSigner::new(&LeaseKey::new(key).unwrap()).unwrap()
    }

    fn lease(signer: &LeaseSigner) -> LeaseToken {
        LeaseToken {
            task_id: "task-1".to_string(),
            issued_at: 1_000,
            expires_at: 1_300,
            signature: signer.sign("task-1", 1_000, 1_300),
        }
    }

    #[test]
    fn test_rfc4231_case_2() {
        // HMAC-SHA256("Jefe", "what do ya want for nothing?")
        let mut mac = HmacSha256::new_from_slice(b"Jefe").unwrap();
        mac.update(b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac.finalize().into_bytes()),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signature_shape() {
        let sig = signer("k").sign("task-1", 1, 301);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let s = signer("k");
        assert_eq!(s.sign("t", 5, 305), s.sign("t", 5, 305));
        assert_ne!(s.sign("t", 5, 305), s.sign("t", 6, 306));
    }

    #[test]
    fn test_verify_roundtrip_and_tamper() {
        let s = signer("k");
        let good = lease(&s);
        assert!(s.verify(&good));

        let mut bad = good.clone();
        bad.task_id = "task-2".to_string();
        assert!(!s.verify(&bad));

        let mut bad = good.clone();
        bad.expires_at += 1;
        assert!(!s.verify(&bad));

        let mut bad = good.clone();
        bad.signature = "zz".to_string();
        assert!(!s.verify(&bad));

        let mut bad = good;
        bad.signature.truncate(62);
        assert!(!s.verify(&bad));
    }

    #[test]
    fn test_keys_do_not_cross() {
        let a = signer("key-a");
        let b = signer("key-b");
        assert!(!b.verify(&lease(&a)));
    }

    #[test]
    fn test_uppercase_hex_rejected() {
        let s = signer("k");
        let mut l = lease(&s);
        l.signature = l.signature.to_uppercase();
        assert!(!s.verify(&l));
    }
}
