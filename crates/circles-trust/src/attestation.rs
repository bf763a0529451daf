//! ZK attestation of a trust score (spec.md 4.3)
//!
//! proves that a public score lies within its tier's range and is the
//! correctly weighted aggregate of hidden component scores, without
//! revealing the components — thin glue over `circles_zk`'s `trust_score`
//! circuit.

use circles_zk::circuits::trust::{TrustScorePublic, TrustScoreWitness};
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs, Witness, ZkError};

use crate::factors::FactorInputs;
use crate::tier::Tier;

/// prove that `inputs` aggregate to `score`, which the caller has already
/// checked lies in `Tier::from_score(score).range()`.
pub fn attest(
    oracle: &impl ProofOracle,
    inputs: &FactorInputs,
    score: u32,
) -> Result<Proof, ZkError> {
    let (tier_min, tier_max) = Tier::from_score(score).range();
    let witness = Witness::TrustScore(TrustScoreWitness { components: inputs.components() });
    let public = PublicInputs::TrustScore(TrustScorePublic { score, tier_min, tier_max });
    oracle.prove(CircuitId::TrustScore, &witness, &public)
}

/// verify a previously produced attestation against the claimed score.
pub fn verify_attestation(oracle: &impl ProofOracle, proof: &Proof, score: u32) -> bool {
    let (tier_min, tier_max) = Tier::from_score(score).range();
    let public = PublicInputs::TrustScore(TrustScorePublic { score, tier_min, tier_max });
    oracle.verify(CircuitId::TrustScore, proof, &public)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_score;
    use circles_zk::DeterministicOracle;

    #[test]
    fn attestation_round_trips_for_a_real_score() {
        let oracle = DeterministicOracle;
        let inputs = FactorInputs::default();
        let score = compute_score(&inputs);
        let proof = attest(&oracle, &inputs, score).unwrap();
        assert!(verify_attestation(&oracle, &proof, score));
    }

    #[test]
    fn attestation_rejects_mismatched_score_claim() {
        let oracle = DeterministicOracle;
        let inputs = FactorInputs::default();
        let score = compute_score(&inputs);
        let proof = attest(&oracle, &inputs, score).unwrap();
        assert!(!verify_attestation(&oracle, &proof, score.saturating_add(1)));
    }
}
