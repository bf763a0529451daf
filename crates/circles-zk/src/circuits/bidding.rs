//! `bid_range`, `bid_fairness`, `winner_selection` and `payment` circuits

use circles_crypto::{commit, hash, range_prove, range_verify, Commitment, Hash32, Nullifier, Randomness, Secret};
use circles_merkle::MerkleProof;

use crate::circuit::CircuitId;

// --- bid_range: value committed under randomness lies in [min, max] ---

#[derive(Clone, Debug)]
pub struct BidRangeWitness {
    pub value: u128,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BidRangePublic {
    pub commitment: Commitment,
    pub min: u128,
    pub max: u128,
}

pub(crate) fn bid_range_relation(w: &BidRangeWitness, p: &BidRangePublic) -> bool {
    match range_prove(w.value, p.min, p.max, w.randomness) {
        Ok(proof) => range_verify(&proof, &p.commitment, p.min, p.max),
        Err(_) => false,
    }
}

pub(crate) fn bid_range_binding_tag(circuit: CircuitId, p: &BidRangePublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(p.commitment.as_ref());
    bytes.extend_from_slice(&p.min.to_le_bytes());
    bytes.extend_from_slice(&p.max.to_le_bytes());
    hash(circuit.domain_tag(), &bytes)
}

// --- bid_fairness: commitment/nullifier bound to the same bidder+round ---

#[derive(Clone, Debug)]
pub struct BidFairnessWitness {
    pub secret: Secret,
    pub amount: u128,
    pub commitment_randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BidFairnessPublic {
    pub commitment: Commitment,
    pub nullifier: Nullifier,
    pub circle_id: Hash32,
    pub round: u64,
}

const BID_DOMAIN: &[u8] = b"bid";

pub(crate) fn bid_fairness_relation(w: &BidFairnessWitness, p: &BidFairnessPublic) -> bool {
    let expected_commitment = commit(&w.amount.to_le_bytes(), w.commitment_randomness);
    let expected_nullifier = circles_crypto::nullifier(
        &w.secret,
        BID_DOMAIN,
        &[p.circle_id.as_ref(), &p.round.to_le_bytes()],
    );
    expected_commitment == p.commitment && expected_nullifier == p.nullifier
}

pub(crate) fn bid_fairness_binding_tag(circuit: CircuitId, p: &BidFairnessPublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(96);
    bytes.extend_from_slice(p.commitment.as_ref());
    bytes.extend_from_slice(p.nullifier.as_ref());
    bytes.extend_from_slice(p.circle_id.as_ref());
    bytes.extend_from_slice(&p.round.to_le_bytes());
    hash(circuit.domain_tag(), &bytes)
}

// --- winner_selection: committed amount at winner_index is the minimum ---

#[derive(Clone, Debug)]
pub struct BidOpening {
    pub commitment: Commitment,
    pub amount: u128,
    pub randomness: Randomness,
}

#[derive(Clone, Debug)]
pub struct WinnerSelectionWitness {
    pub bids: Vec<BidOpening>,
    pub winner_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WinnerSelectionPublic {
    pub commitments: Vec<Commitment>,
    pub winner_index: usize,
}

pub(crate) fn winner_selection_relation(w: &WinnerSelectionWitness, p: &WinnerSelectionPublic) -> bool {
    if w.bids.len() != p.commitments.len() || w.winner_index != p.winner_index {
        return false;
    }
    if w.winner_index >= w.bids.len() {
        return false;
    }
    for (opening, expected_commitment) in w.bids.iter().zip(p.commitments.iter()) {
        if commit(&opening.amount.to_le_bytes(), opening.randomness) != opening.commitment {
            return false;
        }
        if opening.commitment != *expected_commitment {
            return false;
        }
    }
    let winning_amount = w.bids[w.winner_index].amount;
    w.bids.iter().all(|b| winning_amount <= b.amount)
}

pub(crate) fn winner_selection_binding_tag(circuit: CircuitId, p: &WinnerSelectionPublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(32 * p.commitments.len() + 8);
    for c in &p.commitments {
        bytes.extend_from_slice(c.as_ref());
    }
    bytes.extend_from_slice(&(p.winner_index as u64).to_le_bytes());
    hash(circuit.domain_tag(), &bytes)
}

// --- payment: payer is a circle member and amount_commit is well formed ---

#[derive(Clone, Debug)]
pub struct PaymentWitness {
    pub payer_ic: Hash32,
    pub merkle_proof: MerkleProof,
    pub amount: u128,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaymentPublic {
    pub root: Hash32,
    pub amount_commit: Commitment,
    pub payer_ic: Hash32,
}

pub(crate) fn payment_relation(w: &PaymentWitness, p: &PaymentPublic) -> bool {
    w.payer_ic == p.payer_ic
        && w.merkle_proof.verify(&w.payer_ic, &p.root)
        && commit(&w.amount.to_le_bytes(), w.randomness) == p.amount_commit
}

pub(crate) fn payment_binding_tag(circuit: CircuitId, p: &PaymentPublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(96);
    bytes.extend_from_slice(p.root.as_ref());
    bytes.extend_from_slice(p.amount_commit.as_ref());
    bytes.extend_from_slice(p.payer_ic.as_ref());
    hash(circuit.domain_tag(), &bytes)
}
