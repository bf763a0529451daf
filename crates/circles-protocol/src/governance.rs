//! anonymous governance surface (spec.md 4.6, 6)
//!
//! `cast_vote` hides the ballot behind a `vote_validity` proof while the
//! store beneath still tallies in the clear: the proof establishes that
//! whoever is casting `trust_weight`/`choice` actually holds a membership
//! secret entitled to that weight and that `choice` matches the hidden
//! `vote_commit`, without ever learning the voter's identity commitment.

use circles_crypto::Hash32;
use circles_lifecycle::{Proposal, ProposalParams, ProposalType, TallyResult};
use circles_zk::circuits::governance::VoteValidityPublic;
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs};
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    pub fn proposal(&self, proposal_id: &Hash32) -> Option<&Proposal> {
        self.governance.get(proposal_id)
    }

    pub fn create_proposal(
        &mut self,
        creator_ic: Hash32,
        creator_score: u32,
        params: ProposalParams,
        now: u64,
        salt: &[u8],
    ) -> Result<Hash32, ProtocolError> {
        self.governance.create_proposal(creator_ic, creator_score, params, now, salt).map_err(Into::into)
    }

    /// verify the `vote_validity` proof, then delegate with the cleartext
    /// `trust_weight`/`choice` the store tallies against (spec.md 4.6).
    pub fn cast_vote(
        &mut self,
        vote_public: VoteValidityPublic,
        vote_proof: &Proof,
        trust_weight: u32,
        choice: bool,
        now: u64,
    ) -> Result<(), ProtocolError> {
        if !self.oracle.verify(CircuitId::VoteValidity, vote_proof, &PublicInputs::VoteValidity(vote_public.clone())) {
            return Err(ProtocolError::ProofRejected);
        }
        self.governance
            .cast_vote(vote_public.proposal_id, vote_public.nullifier, trust_weight, choice, now)
            .map_err(Into::into)
    }

    pub fn tally_proposal(&mut self, proposal_id: Hash32, now: u64) -> Result<TallyResult, ProtocolError> {
        self.governance.tally(proposal_id, now).map_err(Into::into)
    }

    /// `execute` (spec.md 4.6, 6): transitions the proposal to `Executed`,
    /// then — for an `INTEREST_RATE` proposal scoped to `target_circle` —
    /// applies the side effect the spec names as the example (§8 scenario
    /// 3: "circle's `interest_rate_bp` becomes `new_rate_bp`"). Other
    /// proposal types transition state only; the spec names no concrete
    /// mutation for them.
    pub fn execute_proposal(
        &mut self,
        proposal_id: Hash32,
        target_circle: Option<Hash32>,
        new_rate_bp: Option<u32>,
        now: u64,
    ) -> Result<(), ProtocolError> {
        self.governance.execute(proposal_id, now)?;
        let proposal_type = self.governance.get(&proposal_id).map(|p| p.proposal_type);
        if proposal_type == Some(ProposalType::InterestRate) {
            if let (Some(circle_id), Some(rate)) = (target_circle, new_rate_bp) {
                self.circles.set_interest_rate_bp(circle_id, rate)?;
            }
        }
        Ok(())
    }
}
