//! `transfer`, `balance`, `mix`, `wallet_ownership` and `route` circuits

use circles_crypto::{commit, hash, Commitment, Hash32, Nullifier, Randomness, Secret};

use crate::circuit::CircuitId;

// --- transfer: cross-chain transfer nullifier/commitment binding ---

#[derive(Clone, Debug)]
pub struct TransferWitness {
    pub sender_secret: Secret,
    pub amount: u128,
    pub recipient_commit: Hash32,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferPublic {
    pub nullifier: Nullifier,
    pub commitment: Commitment,
    pub source_chain: String,
    pub target_chain: String,
}

const TRANSFER_DOMAIN: &[u8] = b"transfer";

pub(crate) fn transfer_relation(w: &TransferWitness, p: &TransferPublic) -> bool {
    let expected_nullifier = circles_crypto::nullifier(
        &w.sender_secret,
        TRANSFER_DOMAIN,
        &[p.source_chain.as_bytes(), p.target_chain.as_bytes()],
    );
    if expected_nullifier != p.nullifier {
        return false;
    }
    let mut preimage = Vec::with_capacity(48);
    preimage.extend_from_slice(&w.amount.to_le_bytes());
    preimage.extend_from_slice(w.recipient_commit.as_ref());
    commit(&preimage, w.randomness) == p.commitment
}

pub(crate) fn transfer_binding_tag(circuit: CircuitId, p: &TransferPublic) -> Hash32 {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(p.nullifier.as_ref());
    bytes.extend_from_slice(p.commitment.as_ref());
    bytes.extend_from_slice(p.source_chain.as_bytes());
    bytes.extend_from_slice(p.target_chain.as_bytes());
    hash(circuit.domain_tag(), &bytes)
}

// --- balance: committed balance is non-negative and below a ceiling ---

#[derive(Clone, Debug)]
pub struct BalanceWitness {
    pub balance: u128,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BalancePublic {
    pub balance_commit: Commitment,
    pub ceiling: u128,
}

pub(crate) fn balance_relation(w: &BalanceWitness, p: &BalancePublic) -> bool {
    w.balance < p.ceiling && commit(&w.balance.to_le_bytes(), w.randomness) == p.balance_commit
}

pub(crate) fn balance_binding_tag(circuit: CircuitId, p: &BalancePublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(48);
    bytes.extend_from_slice(p.balance_commit.as_ref());
    bytes.extend_from_slice(&p.ceiling.to_le_bytes());
    hash(circuit.domain_tag(), &bytes)
}

// --- mix: equal-input/equal-output batch with a bijective permutation ---

#[derive(Clone, Debug)]
pub struct MixLeg {
    pub secret: Secret,
    pub commitment: Commitment,
    pub value: u128,
    pub randomness: Randomness,
    /// the leg's queued (source, target) corridor (spec.md 4.7: "queue per
    /// (source, target) pair"); checked against `MixPublic`'s declared
    /// corridor so a batch can't quietly splice legs from two corridors.
    pub source_chain: String,
    pub target_chain: String,
}

#[derive(Clone, Debug)]
pub struct MixWitness {
    pub inputs: Vec<MixLeg>,
    /// outputs stay in input order; `permutation` is what scrambles them
    /// into `MixPublic::output_commitments`.
    pub outputs: Vec<(Commitment, u128, Randomness)>,
    /// outputs[permutation[i]] is the destination of inputs[i]
    pub permutation: Vec<usize>,
    pub fee: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MixPublic {
    pub input_commitments: Vec<Commitment>,
    pub output_commitments: Vec<Commitment>,
    pub nullifiers: Vec<Nullifier>,
    pub fee: u128,
    pub source_chain: String,
    pub target_chain: String,
}

const MIX_DOMAIN: &[u8] = b"mix";

pub fn is_bijection(permutation: &[usize], n: usize) -> bool {
    if permutation.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &idx in permutation {
        if idx >= n || seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

pub(crate) fn mix_relation(w: &MixWitness, p: &MixPublic) -> bool {
    let n = w.inputs.len();
    if n != w.outputs.len() || n != p.input_commitments.len() || n != p.output_commitments.len() || n != p.nullifiers.len() {
        return false;
    }
    if !is_bijection(&w.permutation, n) {
        return false;
    }

    let mut total_in: u128 = 0;
    for (i, leg) in w.inputs.iter().enumerate() {
        if leg.source_chain != p.source_chain || leg.target_chain != p.target_chain {
            return false;
        }
        if commit(&leg.value.to_le_bytes(), leg.randomness) != leg.commitment {
            return false;
        }
        if leg.commitment != p.input_commitments[i] {
            return false;
        }
        let expected_nullifier =
            circles_crypto::nullifier(&leg.secret, MIX_DOMAIN, &[leg.commitment.as_ref()]);
        if expected_nullifier != p.nullifiers[i] {
            return false;
        }
        total_in = match total_in.checked_add(leg.value) {
            Some(v) => v,
            None => return false,
        };
    }

    let mut total_out: u128 = 0;
    for (i, (commitment, value, randomness)) in w.outputs.iter().enumerate() {
        if commit(&value.to_le_bytes(), *randomness) != *commitment {
            return false;
        }
        // output i routes to public slot permutation[i]; this is what
        // actually breaks the input/output linkability the mix exists for.
        if *commitment != p.output_commitments[w.permutation[i]] {
            return false;
        }
        total_out = match total_out.checked_add(*value) {
            Some(v) => v,
            None => return false,
        };
    }

    total_in == total_out.saturating_add(p.fee) && w.fee == p.fee
}

pub(crate) fn mix_binding_tag(circuit: CircuitId, p: &MixPublic) -> Hash32 {
    let mut bytes = Vec::new();
    for c in &p.input_commitments {
        bytes.extend_from_slice(c.as_ref());
    }
    for c in &p.output_commitments {
        bytes.extend_from_slice(c.as_ref());
    }
    for n in &p.nullifiers {
        bytes.extend_from_slice(n.as_ref());
    }
    bytes.extend_from_slice(&p.fee.to_le_bytes());
    bytes.extend_from_slice(p.source_chain.as_bytes());
    bytes.extend_from_slice(p.target_chain.as_bytes());
    hash(circuit.domain_tag(), &bytes)
}

// --- wallet_ownership: control of a chain address bound to an identity ---

#[derive(Clone, Debug)]
pub struct WalletOwnershipWitness {
    pub secret: Secret,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WalletOwnershipPublic {
    pub ic: Hash32,
    pub chain: String,
    pub ownership_tag: Hash32,
}

const WALLET_DOMAIN: &[u8] = b"wallet_ownership";

pub(crate) fn wallet_ownership_relation(w: &WalletOwnershipWitness, p: &WalletOwnershipPublic) -> bool {
    let expected = circles_crypto::nullifier(&w.secret, WALLET_DOMAIN, &[p.ic.as_ref(), p.chain.as_bytes()]);
    expected == p.ownership_tag
}

pub(crate) fn wallet_ownership_binding_tag(circuit: CircuitId, p: &WalletOwnershipPublic) -> Hash32 {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(p.ic.as_ref());
    bytes.extend_from_slice(p.chain.as_bytes());
    bytes.extend_from_slice(p.ownership_tag.as_ref());
    hash(circuit.domain_tag(), &bytes)
}

// --- route: aggregate delay/fee/privacy score over a hidden edge list ---

#[derive(Clone, Debug)]
pub struct RouteEdgeWitness {
    pub delay_seconds: u64,
    pub fee_bp: u32,
    pub privacy_bonus: u32,
}

#[derive(Clone, Debug)]
pub struct RouteWitness {
    pub edges: Vec<RouteEdgeWitness>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoutePublic {
    pub hops: u32,
    pub total_delay_seconds: u64,
    pub total_fee_bp: u32,
    pub privacy_score: u32,
}

pub(crate) fn route_relation(w: &RouteWitness, p: &RoutePublic) -> bool {
    if w.edges.len() as u32 != p.hops {
        return false;
    }
    let total_delay: u64 = w.edges.iter().map(|e| e.delay_seconds).sum();
    let total_fee: u32 = w.edges.iter().map(|e| e.fee_bp).sum();
    let privacy_score = w.edges.iter().map(|e| e.privacy_bonus).sum::<u32>().min(100);
    total_delay == p.total_delay_seconds && total_fee == p.total_fee_bp && privacy_score == p.privacy_score
}

pub(crate) fn route_binding_tag(circuit: CircuitId, p: &RoutePublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(20);
    bytes.extend_from_slice(&p.hops.to_le_bytes());
    bytes.extend_from_slice(&p.total_delay_seconds.to_le_bytes());
    bytes.extend_from_slice(&p.total_fee_bp.to_le_bytes());
    bytes.extend_from_slice(&p.privacy_score.to_le_bytes());
    hash(circuit.domain_tag(), &bytes)
}
