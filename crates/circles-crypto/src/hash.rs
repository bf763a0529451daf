//! base hash primitive
//!
//! all fixed-size hashes in the protocol (identity commitments, nullifiers,
//! merkle roots, proof blobs) are 32 bytes. everything else in this crate
//! and the crates above it builds on `hash`/`hash_pair`.

use std::fmt;

/// a 32-byte hash output
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// domain-separated hash of a single byte string
pub fn hash(domain: &[u8], bytes: &[u8]) -> Hash32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain);
    hasher.update(bytes);
    Hash32(*hasher.finalize().as_bytes())
}

/// domain-separated hash of two 32-byte children, order-canonicalized so
/// that `hash_pair(domain, a, b) == hash_pair(domain, b, a)` — the merkle
/// policy in spec.md 4.1 requires the lexicographically smaller child first
/// so that verification does not depend on left/right position bookkeeping.
pub fn hash_pair(domain: &[u8], a: &Hash32, b: &Hash32) -> Hash32 {
    let (left, right) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain);
    hasher.update(&left.0);
    hasher.update(&right.0);
    Hash32(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let h1 = hash(b"dom", b"payload");
        let h2 = hash(b"dom", b"payload");
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_domain_separates() {
        let h1 = hash(b"dom-a", b"payload");
        let h2 = hash(b"dom-b", b"payload");
        assert_ne!(h1, h2);
    }

    #[test]
    fn hash_pair_is_order_independent() {
        let a = hash(b"d", b"a");
        let b = hash(b"d", b"b");
        assert_eq!(hash_pair(b"merkle", &a, &b), hash_pair(b"merkle", &b, &a));
    }
}
