use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Material used to derive an [`OperatorId`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorMaterial {
    /// Derivation from a raw 32-byte seed.
    Seed([u8; 32]),
    /// Derivation from an operator public key (32 bytes).
    PublicKey([u8; 32]),
}

/// Capability token for the single-operator authorization model.
///
/// Every mutating ledger entry point compares the caller's token against the
/// configured operator; equality of tokens is the authorization check. The
/// token is derived deterministically from [`OperatorMaterial`] with BLAKE3,
/// so the same material always produces the same capability.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorId {
    hash: [u8; 32],
}

impl OperatorId {
    /// Derive an `OperatorId` from key material.
    pub fn derive(material: &OperatorMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"gridline-operator-v1:");
        match material {
            OperatorMaterial::Seed(seed) => {
                hasher.update(b"seed:");
                hasher.update(seed);
            }
            OperatorMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Create an ephemeral (random) operator token for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&OperatorMaterial::Seed(bytes))
    }

    /// The raw 32-byte token.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("op:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("op:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }
}

impl fmt::Debug for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorId({})", self.short_id())
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
