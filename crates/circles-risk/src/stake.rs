//! private stake calculation (spec.md 4.9)
//!
//! the adjusted-stake formula itself lives in `circles_zk::circuits::risk`
//! (it is also the relation the `stake_adequacy` circuit checks); this
//! module adds the perturbation term the spec calls out as existing only
//! to diversify commitments, and proves/verifies adequacy through the
//! oracle.

use circles_crypto::Hash32;
use circles_zk::circuits::risk::{StakeAdequacyPublic, StakeAdequacyWitness};
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs, Witness};

use crate::error::RiskError;

pub use circles_zk::circuits::risk::adjusted_stake as base_adjusted_stake;

/// small score-dependent jitter (spec.md 4.9: "a small score-dependent
/// perturbation to diversify commitments"). Bounded well below 1% of
/// `base_stake` so it never materially changes what a member owes; its
/// only purpose is so two members with identical score/circle inputs do
/// not commit to bit-identical stake amounts.
pub fn perturbation(trust_score: u32, base_stake: u128) -> u128 {
    let scale = (base_stake / 1_000_000).max(1);
    (trust_score as u128 % 97) * scale / 1000
}

/// the real stake a member is asked to post: the base adjusted amount plus
/// the diversifying perturbation. The `stake_adequacy` circuit proves
/// adequacy over the *base* amount (`circles_zk`'s relation), since the
/// perturbation is a presentation detail, not part of the adequacy relation.
pub fn calculate_stake(witness: &StakeAdequacyWitness) -> u128 {
    base_adjusted_stake(witness).saturating_add(perturbation(witness.trust_score, witness.base_stake))
}

/// prove that `witness`'s adjusted stake meets `required_stake`, returning
/// the proof for later verification by any party holding only
/// `StakeAdequacyPublic` (spec.md 4.2's `stake_adequacy` circuit).
pub fn prove_stake_adequacy(
    witness: StakeAdequacyWitness,
    required_stake: u128,
    oracle: &dyn ProofOracle,
) -> Result<(Proof, StakeAdequacyPublic), RiskError> {
    let public = StakeAdequacyPublic { required_stake };
    let proof = oracle
        .prove(
            CircuitId::StakeAdequacy,
            &Witness::StakeAdequacy(witness),
            &PublicInputs::StakeAdequacy(public.clone()),
        )
        .map_err(|_| RiskError::ProofInvalid("stake_adequacy"))?;
    Ok((proof, public))
}

pub fn verify_stake_adequacy(
    public: &StakeAdequacyPublic,
    proof: &Proof,
    oracle: &dyn ProofOracle,
) -> bool {
    oracle.verify(CircuitId::StakeAdequacy, proof, &PublicInputs::StakeAdequacy(public.clone()))
}

/// circle-size bracket used purely for `tracing` context; the actual
/// multiplier math lives in `circles_zk::circuits::risk::risk_multiplier`.
pub fn size_bracket_label(circle_size: u32) -> &'static str {
    if circle_size > 12 {
        "large"
    } else if circle_size > 8 {
        "medium"
    } else {
        "small"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeCalculation {
    pub circle_id: Hash32,
    pub required_stake: u128,
    pub adjusted_stake: u128,
}
