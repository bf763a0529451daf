//! `membership` and `anonymity_pool_membership` circuits
//!
//! both prove that a commitment is a leaf of a merkle tree with a given
//! root, without revealing any other leaf or the secret behind the
//! committed principal (spec.md I3). the two circuits share one relation;
//! they stay separate `CircuitId` variants because a membership proof for
//! a circle's member set must never be replayable against a pool's
//! nullifier-set root or vice versa — `binding_tag` is domain-separated per
//! circuit id, so a proof minted for one can never verify under the other.

use circles_crypto::{hash, Hash32};
use circles_merkle::MerkleProof;

use crate::circuit::CircuitId;

#[derive(Clone, Debug)]
pub struct MembershipWitness {
    pub leaf: Hash32,
    pub merkle_proof: MerkleProof,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MembershipPublic {
    pub leaf: Hash32,
    pub root: Hash32,
}

pub(crate) fn relation(w: &MembershipWitness, p: &MembershipPublic) -> bool {
    w.leaf == p.leaf && w.merkle_proof.verify(&w.leaf, &p.root)
}

pub(crate) fn binding_tag(circuit: CircuitId, p: &MembershipPublic) -> Hash32 {
    let mut bytes = Vec::with_capacity(64);
    bytes.extend_from_slice(p.leaf.as_ref());
    bytes.extend_from_slice(p.root.as_ref());
    hash(circuit.domain_tag(), &bytes)
}
