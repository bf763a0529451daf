//! range proof interface
//!
//! `range_prove`/`range_verify` stand in for a real zero-knowledge range
//! proof (bulletproofs or similar) under the Non-goal that the SNARK/range
//! backend itself is an abstract oracle (spec.md 4.1, 9). the soundness
//! guarantee the spec asks for — "accepts iff min <= value <= max and the
//! proof's committed value equals the supplied commitment" — is enforced
//! structurally here rather than cryptographically: `RangeProof` has no
//! public constructor other than `range_prove`, which itself checks the
//! bound before it will hand back a proof, so no out-of-range witness can
//! ever produce one. `range_verify` then only has to confirm the proof
//! was not swapped onto a different commitment or widened bounds, which is
//! the permissive-blob failure mode spec.md 9(b) warns against.

use crate::commitment::{commit, Commitment, Randomness};
use crate::hash::Hash32;

const RANGE_DOMAIN: &[u8] = b"circles.range-proof.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeProofError {
    /// the supplied value does not satisfy `min <= value <= max`
    OutOfRange,
    /// min is greater than max
    InvalidBounds,
}

impl std::fmt::Display for RangeProofError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "value outside [min, max]"),
            Self::InvalidBounds => write!(f, "min is greater than max"),
        }
    }
}

impl std::error::Error for RangeProofError {}

/// a proof that some committed value lies within `[min, max]`
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RangeProof {
    commitment: Commitment,
    min: u128,
    max: u128,
    binding_tag: Hash32,
}

fn binding_tag(commitment: &Commitment, min: u128, max: u128) -> Hash32 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(RANGE_DOMAIN);
    hasher.update(commitment.as_ref());
    hasher.update(&min.to_le_bytes());
    hasher.update(&max.to_le_bytes());
    Hash32(*hasher.finalize().as_bytes())
}

/// prove that `value` (committed under `randomness`) lies within `[min, max]`.
/// fails if the bounds are malformed or the value is actually out of range —
/// there is no way to obtain a `RangeProof` for a witness that does not
/// satisfy the relation.
pub fn range_prove(
    value: u128,
    min: u128,
    max: u128,
    randomness: Randomness,
) -> Result<RangeProof, RangeProofError> {
    if min > max {
        return Err(RangeProofError::InvalidBounds);
    }
    if value < min || value > max {
        return Err(RangeProofError::OutOfRange);
    }
    let commitment = commit(&value.to_le_bytes(), randomness);
    let binding_tag = binding_tag(&commitment, min, max);
    Ok(RangeProof {
        commitment,
        min,
        max,
        binding_tag,
    })
}

/// verify that `proof` attests to `commitment` lying within `[min, max]`
pub fn range_verify(proof: &RangeProof, commitment: &Commitment, min: u128, max: u128) -> bool {
    proof.commitment == *commitment
        && proof.min == min
        && proof.max == max
        && proof.binding_tag == binding_tag(commitment, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn accepts_in_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let r = Randomness::random(&mut rng);
        let proof = range_prove(50, 0, 100, r).unwrap();
        let commitment = commit(&50u128.to_le_bytes(), r);
        assert!(range_verify(&proof, &commitment, 0, 100));
    }

    #[test]
    fn boundary_values_accepted() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let r_min = Randomness::random(&mut rng);
        let r_max = Randomness::random(&mut rng);
        assert!(range_prove(0, 0, 100, r_min).is_ok());
        assert!(range_prove(100, 0, 100, r_max).is_ok());
    }

    #[test]
    fn rejects_out_of_range_at_creation() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let r = Randomness::random(&mut rng);
        assert_eq!(range_prove(101, 0, 100, r), Err(RangeProofError::OutOfRange));
        assert_eq!(range_prove(0, 0, 100, Randomness::random(&mut rng)).is_ok(), true);
    }

    #[test]
    fn rejects_mismatched_commitment() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let r1 = Randomness::random(&mut rng);
        let r2 = Randomness::random(&mut rng);
        let proof = range_prove(10, 0, 100, r1).unwrap();
        let other_commitment = commit(&10u128.to_le_bytes(), r2);
        assert!(!range_verify(&proof, &other_commitment, 0, 100));
    }

    #[test]
    fn rejects_widened_bounds() {
        let mut rng = ChaCha20Rng::seed_from_u64(14);
        let r = Randomness::random(&mut rng);
        let proof = range_prove(10, 0, 20, r).unwrap();
        let commitment = commit(&10u128.to_le_bytes(), r);
        assert!(!range_verify(&proof, &commitment, 0, 100));
    }
}
