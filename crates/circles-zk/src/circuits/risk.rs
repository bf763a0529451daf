//! `stake_adequacy`, `default_detection`, `liquidation`, `penalty` and
//! `insurance` circuits

use circles_crypto::{commit, hash, Commitment, Hash32, Nullifier, Randomness, Secret};

use crate::circuit::CircuitId;

// --- stake_adequacy: adjusted stake meets the tier's requirement ---

#[derive(Clone, Debug)]
pub struct StakeAdequacyWitness {
    pub trust_score: u32,
    pub circle_size: u32,
    pub missed_payments: u32,
    pub base_stake: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StakeAdequacyPublic {
    pub required_stake: u128,
}

/// trust multiplier ladder from spec.md 4.9 (without the perturbation term,
/// which only exists to diversify commitments and is irrelevant to the
/// adequacy relation itself)
fn trust_multiplier(score: u32) -> f64 {
    if score >= 800 {
        1.0
    } else if score >= 600 {
        1.2
    } else if score >= 400 {
        1.5
    } else if score >= 200 {
        2.0
    } else {
        3.0
    }
}

fn risk_multiplier(circle_size: u32, missed_payments: u32) -> f64 {
    let size_factor = if circle_size > 12 {
        1.3
    } else if circle_size > 8 {
        1.1
    } else {
        1.0
    };
    size_factor * (1.0 + 0.5 * missed_payments as f64)
}

pub fn adjusted_stake(w: &StakeAdequacyWitness) -> u128 {
    let factor = trust_multiplier(w.trust_score) * risk_multiplier(w.circle_size, w.missed_payments);
    ((w.base_stake as f64) * factor) as u128
}

pub(crate) fn stake_adequacy_relation(w: &StakeAdequacyWitness, p: &StakeAdequacyPublic) -> bool {
    adjusted_stake(w) >= p.required_stake
}

pub(crate) fn stake_adequacy_binding_tag(circuit: CircuitId, p: &StakeAdequacyPublic) -> Hash32 {
    hash(circuit.domain_tag(), &p.required_stake.to_le_bytes())
}

// --- default_detection: anonymous missed-payment flag with severity ---

#[derive(Clone, Debug)]
pub struct DefaultDetectionWitness {
    pub member_secret: Secret,
    pub severity: u32,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DefaultDetectionPublic {
    pub nullifier: Nullifier,
    pub circle_id: Hash32,
    pub round: u64,
    pub severity_commit: Commitment,
}

const DEFAULT_DOMAIN: &[u8] = b"default";

pub(crate) fn default_detection_relation(w: &DefaultDetectionWitness, p: &DefaultDetectionPublic) -> bool {
    if w.severity > 10 {
        return false;
    }
    let expected = circles_crypto::nullifier(
        &w.member_secret,
        DEFAULT_DOMAIN,
        &[p.circle_id.as_ref(), &p.round.to_le_bytes()],
    );
    expected == p.nullifier && commit(&w.severity.to_le_bytes(), w.randomness) == p.severity_commit
}

pub(crate) fn default_detection_binding_tag(circuit: CircuitId, p: &DefaultDetectionPublic) -> Hash32 {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(p.nullifier.as_ref());
    bytes.extend_from_slice(p.circle_id.as_ref());
    bytes.extend_from_slice(&p.round.to_le_bytes());
    bytes.extend_from_slice(p.severity_commit.as_ref());
    hash(circuit.domain_tag(), &bytes)
}

// --- liquidation: authored only once a justification proof verifies ---

#[derive(Clone, Debug)]
pub struct LiquidationWitness {
    pub authority_secret: Secret,
    pub reason: Vec<u8>,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LiquidationPublic {
    pub nullifier: Nullifier,
    pub circle_id: Hash32,
    pub reason_commit: Commitment,
}

const LIQUIDATION_DOMAIN: &[u8] = b"liquidation";

pub(crate) fn liquidation_relation(w: &LiquidationWitness, p: &LiquidationPublic) -> bool {
    let expected =
        circles_crypto::nullifier(&w.authority_secret, LIQUIDATION_DOMAIN, &[p.circle_id.as_ref()]);
    expected == p.nullifier && commit(&w.reason, w.randomness) == p.reason_commit
}

pub(crate) fn liquidation_binding_tag(circuit: CircuitId, p: &LiquidationPublic) -> Hash32 {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(p.nullifier.as_ref());
    bytes.extend_from_slice(p.circle_id.as_ref());
    bytes.extend_from_slice(p.reason_commit.as_ref());
    hash(circuit.domain_tag(), &bytes)
}

// --- penalty: one record per (target, type, severity, reason) ---

#[derive(Clone, Debug)]
pub struct PenaltyWitness {
    pub target_secret: Secret,
    pub reason: Vec<u8>,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PenaltyPublic {
    pub target_nullifier: Nullifier,
    pub penalty_type: u8,
    pub severity: u32,
    pub reason_commit: Commitment,
}

const PENALTY_DOMAIN: &[u8] = b"penalty";

pub(crate) fn penalty_relation(w: &PenaltyWitness, p: &PenaltyPublic) -> bool {
    let expected = circles_crypto::nullifier(
        &w.target_secret,
        PENALTY_DOMAIN,
        &[&[p.penalty_type], &p.severity.to_le_bytes()],
    );
    expected == p.target_nullifier && commit(&w.reason, w.randomness) == p.reason_commit
}

pub(crate) fn penalty_binding_tag(circuit: CircuitId, p: &PenaltyPublic) -> Hash32 {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(p.target_nullifier.as_ref());
    bytes.push(p.penalty_type);
    bytes.extend_from_slice(&p.severity.to_le_bytes());
    bytes.extend_from_slice(p.reason_commit.as_ref());
    hash(circuit.domain_tag(), &bytes)
}

// --- insurance: pool total commitment is the sum of per-member stakes ---

#[derive(Clone, Debug)]
pub struct InsuranceWitness {
    pub amounts: Vec<u128>,
    pub per_item_randomness: Vec<Randomness>,
    pub total_randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InsurancePublic {
    pub item_commitments: Vec<Commitment>,
    pub total_commit: Commitment,
}

pub(crate) fn insurance_relation(w: &InsuranceWitness, p: &InsurancePublic) -> bool {
    if w.amounts.len() != w.per_item_randomness.len() || w.amounts.len() != p.item_commitments.len() {
        return false;
    }
    let mut total: u128 = 0;
    for ((amount, randomness), expected_commitment) in w
        .amounts
        .iter()
        .zip(w.per_item_randomness.iter())
        .zip(p.item_commitments.iter())
    {
        if commit(&amount.to_le_bytes(), *randomness) != *expected_commitment {
            return false;
        }
        total = match total.checked_add(*amount) {
            Some(v) => v,
            None => return false,
        };
    }
    commit(&total.to_le_bytes(), w.total_randomness) == p.total_commit
}

pub(crate) fn insurance_binding_tag(circuit: CircuitId, p: &InsurancePublic) -> Hash32 {
    let mut bytes = Vec::new();
    for c in &p.item_commitments {
        bytes.extend_from_slice(c.as_ref());
    }
    bytes.extend_from_slice(p.total_commit.as_ref());
    hash(circuit.domain_tag(), &bytes)
}
