//! circle lifecycle surface: member registration, circle creation/joining,
//! round advance (spec.md 4.4, 6)

use circles_crypto::Hash32;
use circles_lifecycle::CircleParams;
use circles_membership::{IdentityCommitment, MemberRecord};
use circles_zk::circuits::membership::MembershipPublic;
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs};
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    /// register a brand-new member record (spec.md 4.4's prerequisite for
    /// `join_circle`).
    pub fn register_member(&mut self, ic: IdentityCommitment, trust_score: u32, stake_amount: u128, joined_height: u64) {
        self.membership.register(MemberRecord::new(ic, trust_score, stake_amount, joined_height));
    }

    /// `create_circle(creator_ic, params, creator_proof)` (spec.md 4.4, 6):
    /// the creator's membership proof must verify against the global
    /// identity registry root before any tier/stake precondition runs
    /// (spec.md I3), mirroring `submit_bid`'s check in `auctions.rs`.
    pub fn create_circle(
        &mut self,
        membership_public: MembershipPublic,
        membership_proof: &Proof,
        creator_score: u32,
        params: CircleParams,
        now_height: u64,
        salt: &[u8],
    ) -> Result<Hash32, ProtocolError> {
        if membership_public.root != self.membership.registry_root() {
            return Err(ProtocolError::ProofRejected);
        }
        if !self.oracle.verify(CircuitId::Membership, membership_proof, &PublicInputs::Membership(membership_public)) {
            return Err(ProtocolError::ProofRejected);
        }
        self.circles
            .create_circle(&mut self.membership, creator_score, params, now_height, salt)
            .map_err(Into::into)
    }

    /// `join_circle(circle_id, membership_proof, stake_amount, identity_commit)`
    /// (spec.md 4.4, 6): verifies `ic`'s membership proof against the
    /// identity registry before delegating to the stake/capacity gate.
    pub fn join_circle(
        &mut self,
        circle_id: Hash32,
        membership_public: MembershipPublic,
        membership_proof: &Proof,
        ic: IdentityCommitment,
        stake_amount: u128,
    ) -> Result<Hash32, ProtocolError> {
        if membership_public.leaf != ic.as_hash() || membership_public.root != self.membership.registry_root() {
            return Err(ProtocolError::ProofRejected);
        }
        if !self.oracle.verify(CircuitId::Membership, membership_proof, &PublicInputs::Membership(membership_public)) {
            return Err(ProtocolError::ProofRejected);
        }
        self.circles.join_circle(&mut self.membership, circle_id, ic, stake_amount).map_err(Into::into)
    }

    pub fn advance_round(&mut self, circle_id: Hash32) -> Result<u32, ProtocolError> {
        self.circles.advance_round(circle_id).map_err(Into::into)
    }
}
