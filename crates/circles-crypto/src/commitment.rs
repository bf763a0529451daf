//! pedersen-style commitments
//!
//! `commit(data, randomness)` is binding (no two distinct `data` values
//! produce the same commitment for any randomness, with overwhelming
//! probability) and hiding (the commitment reveals nothing about `data`
//! without the randomness) under the fixed global domain tag below. the
//! spec treats this as an abstract commitment scheme rather than mandating
//! a specific curve; we realize it the way the teacher realizes its note
//! and value commitments — a domain-separated hash of the preimage and an
//! injected blinding factor.

use crate::hash::Hash32;

const COMMITMENT_DOMAIN: &[u8] = b"circles.commitment.v1";

/// injected randomness for a commitment. callers must supply this from an
/// rng they control (never deterministically derived from `data`) so that
/// the commitment is hiding.
#[derive(Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Randomness(pub [u8; 32]);

impl Randomness {
    pub fn random(rng: &mut impl rand::RngCore) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for Randomness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Randomness(..)")
    }
}

/// a binding, hiding commitment to some data
pub type Commitment = Hash32;

/// commit to `data` under `randomness`
pub fn commit(data: &[u8], randomness: Randomness) -> Commitment {
    let mut hasher = blake3::Hasher::new();
    hasher.update(COMMITMENT_DOMAIN);
    hasher.update(&(data.len() as u64).to_le_bytes());
    hasher.update(data);
    hasher.update(&randomness.0);
    Hash32(*hasher.finalize().as_bytes())
}

/// open a commitment and check it matches `data` under `randomness`.
/// commitments never carry an explicit opening on the wire; this is for
/// callers that hold both halves (e.g. a winner decrypting their own bid).
pub fn verify_opening(c: &Commitment, data: &[u8], randomness: Randomness) -> bool {
    commit(data, randomness) == *c
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn binding() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let r = Randomness::random(&mut rng);
        let c1 = commit(b"alice", r);
        let c2 = commit(b"bob", r);
        assert_ne!(c1, c2);
    }

    #[test]
    fn hiding_requires_randomness() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let r1 = Randomness::random(&mut rng);
        let r2 = Randomness::random(&mut rng);
        assert_ne!(commit(b"same", r1), commit(b"same", r2));
    }

    #[test]
    fn opening_round_trips() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let r = Randomness::random(&mut rng);
        let c = commit(b"payload", r);
        assert!(verify_opening(&c, b"payload", r));
        assert!(!verify_opening(&c, b"other", r));
    }
}
