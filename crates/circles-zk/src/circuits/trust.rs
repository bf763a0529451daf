//! `trust_score` circuit
//!
//! proves that a public score is the correctly weighted aggregate of four
//! hidden factor scores (spec.md 4.3) and lies within the claimed tier
//! range, without revealing the factors themselves.

use circles_crypto::{hash, Hash32};

use crate::circuit::CircuitId;

/// weight_i, fixed by spec.md 4.3 (payment reliability, circle completion,
/// defi experience, social verification)
pub const FACTOR_WEIGHTS: [u32; 4] = [40, 30, 20, 10];

#[derive(Clone, Debug)]
pub struct TrustScoreWitness {
    /// four factor scores, each in [0, 100]
    pub components: [u32; 4],
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrustScorePublic {
    pub score: u32,
    pub tier_min: u32,
    pub tier_max: u32,
}

/// `round(sum(weight_i * component_i) / 100) * 10`, clamped to [0, 1000] —
/// spec.md 4.3's scoring formula, shared with `circles-trust`.
pub fn aggregate(components: &[u32; 4]) -> u32 {
    let weighted: u32 = FACTOR_WEIGHTS
        .iter()
        .zip(components.iter())
        .map(|(w, c)| w * c)
        .sum();
    let score = (weighted + 50) / 100 * 10;
    score.min(1000)
}

pub(crate) fn trust_score_relation(w: &TrustScoreWitness, p: &TrustScorePublic) -> bool {
    if w.components.iter().any(|c| *c > 100) {
        return false;
    }
    aggregate(&w.components) == p.score && p.tier_min <= p.score && p.score <= p.tier_max
}

pub(crate) fn trust_score_binding_tag(circuit: CircuitId, p: &TrustScorePublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(12);
    bytes.extend_from_slice(&p.score.to_le_bytes());
    bytes.extend_from_slice(&p.tier_min.to_le_bytes());
    bytes.extend_from_slice(&p.tier_max.to_le_bytes());
    hash(circuit.domain_tag(), &bytes)
}
