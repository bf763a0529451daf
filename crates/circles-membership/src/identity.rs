//! identity commitments
//!
//! grounded on `ligerito-shielded-pool::keys::SpendKey`'s seed-derivation
//! pattern: a per-user `IdentitySecret` never leaves its holder, and the
//! `IdentityCommitment` derived from it is the only thing the protocol
//! ever sees or stores — it is never decommitted (spec.md 3).

use circles_crypto::{hash, Hash32};

const IDENTITY_DOMAIN: &[u8] = b"circles.identity.v1";

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IdentitySecret(pub [u8; 32]);

impl std::fmt::Debug for IdentitySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentitySecret(..)")
    }
}

impl IdentitySecret {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(seed)
    }

    /// derive the identity commitment used as the anonymous principal
    /// everywhere else in the protocol.
    pub fn commitment(&self) -> IdentityCommitment {
        IdentityCommitment(hash(IDENTITY_DOMAIN, &self.0))
    }
}

/// newtype around `Hash32` so identity commitments are not accidentally
/// interchanged with other 32-byte hashes at call sites.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct IdentityCommitment(pub Hash32);

impl std::fmt::Debug for IdentityCommitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityCommitment({})", self.0)
    }
}

impl IdentityCommitment {
    pub fn as_hash(&self) -> Hash32 {
        self.0
    }
}

impl From<Hash32> for IdentityCommitment {
    fn from(h: Hash32) -> Self {
        Self(h)
    }
}

impl AsRef<[u8]> for IdentityCommitment {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}
