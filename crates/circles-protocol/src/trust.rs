//! trust scoring surface (spec.md 4.3, 6)

use circles_membership::IdentityCommitment;
use circles_trust::{Action, FactorInputs, ScoreEvent, Tier};
use circles_zk::{Proof, ProofOracle};
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    pub fn compute_member_score(&self, inputs: &FactorInputs) -> u32 {
        circles_trust::compute_score(inputs)
    }

    pub fn attest_trust_score(&self, inputs: &FactorInputs, score: u32) -> Result<Proof, ProtocolError> {
        circles_trust::attest(&self.oracle, inputs, score).map_err(Into::into)
    }

    pub fn verify_trust_attestation(&self, proof: &Proof, score: u32) -> bool {
        circles_trust::verify_attestation(&self.oracle, proof, score)
    }

    /// apply `event`'s delta to `ic`'s current score and persist the result
    /// (spec.md 4.3's score-event table).
    pub fn apply_score_event(&mut self, ic: &IdentityCommitment, event: ScoreEvent) -> Result<u32, ProtocolError> {
        let current = self.membership.member(ic).ok_or(circles_membership::MembershipError::UnknownMember)?.trust_score;
        let updated = circles_trust::apply_event(current, event);
        self.membership.update_trust_score(ic, updated)?;
        Ok(updated)
    }

    /// whether `ic`'s current tier permits `action` (spec.md 4.3's
    /// capability policy). members with no record yet may never act.
    pub fn may(&self, ic: &IdentityCommitment, action: Action) -> bool {
        match self.membership.member(ic) {
            Some(record) => circles_trust::may(Tier::from_score(record.trust_score), action),
            None => false,
        }
    }
}
