//! `vote_validity` circuit
//!
//! proves a vote is cast by an eligible circle/protocol member, ties its
//! nullifier to the voter's secret and this proposal (per-proposal scope,
//! spec.md 4.6/9(c)), and binds the hidden choice to the public
//! `vote_commit` — all without revealing which member voted.

use circles_crypto::{commit, hash, Hash32, Nullifier, Randomness, Secret};
use circles_merkle::MerkleProof;

use crate::circuit::CircuitId;

const VOTE_DOMAIN: &[u8] = b"vote";

#[derive(Clone, Debug)]
pub struct VoteValidityWitness {
    pub voter_ic: Hash32,
    pub merkle_proof: MerkleProof,
    pub secret: Secret,
    pub trust_score: u32,
    pub choice: bool,
    pub randomness: Randomness,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VoteValidityPublic {
    pub root: Hash32,
    pub nullifier: Nullifier,
    pub proposal_id: Hash32,
    pub min_trust_score: u32,
    pub vote_commit: Hash32,
}

pub(crate) fn vote_validity_relation(w: &VoteValidityWitness, p: &VoteValidityPublic) -> bool {
    if w.trust_score < p.min_trust_score {
        return false;
    }
    if !w.merkle_proof.verify(&w.voter_ic, &p.root) {
        return false;
    }
    let expected_nullifier =
        circles_crypto::nullifier(&w.secret, VOTE_DOMAIN, &[p.proposal_id.as_ref()]);
    if expected_nullifier != p.nullifier {
        return false;
    }
    let choice_byte = [w.choice as u8];
    commit(&choice_byte, w.randomness) == p.vote_commit
}

pub(crate) fn vote_validity_binding_tag(circuit: CircuitId, p: &VoteValidityPublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(160);
    bytes.extend_from_slice(p.root.as_ref());
    bytes.extend_from_slice(p.nullifier.as_ref());
    bytes.extend_from_slice(p.proposal_id.as_ref());
    bytes.extend_from_slice(&p.min_trust_score.to_le_bytes());
    bytes.extend_from_slice(p.vote_commit.as_ref());
    hash(circuit.domain_tag(), &bytes)
}
