//! anonymous governance (C7, spec.md 4.6)
//!
//! trust-weighted tally with per-proposal nullifier scope (spec.md 9(c)):
//! cross-proposal reuse of the same voter's nullifier is permitted by
//! design since each proposal owns its own nullifier set, mirroring how
//! `circles-lifecycle::auction` scopes bid nullifiers globally but votes
//! are scoped narrower, per spec.md 4.6's explicit call-out.

use std::collections::{BTreeMap, BTreeSet};

use circles_crypto::{hash, Hash32, Nullifier};

use crate::error::LifecycleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProposalType {
    InterestRate,
    CircleParams,
    PenaltyRules,
    QuorumThreshold,
    VotingPeriod,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProposalStatus {
    Active,
    Passed,
    Failed,
    Executed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProposalScope {
    ProtocolWide,
    CircleScoped,
}

/// trust-score thresholds to author a proposal (spec.md 4.6).
pub const PROTOCOL_WIDE_PROPOSAL_THRESHOLD: u32 = 800;
pub const CIRCLE_SCOPED_PROPOSAL_THRESHOLD: u32 = 600;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProposalParams {
    pub proposal_type: ProposalType,
    pub scope: ProposalScope,
    pub encrypted_payload: Vec<u8>,
    pub voting_period_secs: u64,
    pub quorum_pct: u32,
    pub min_trust_score: u32,
    pub eligible_count: u32,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Proposal {
    pub proposal_id: Hash32,
    pub proposal_type: ProposalType,
    pub encrypted_payload: Vec<u8>,
    pub deadline: u64,
    pub execution_deadline: u64,
    pub quorum_pct: u32,
    pub min_trust_score: u32,
    pub eligible_count: u32,
    pub status: ProposalStatus,
    pub votes: Vec<VoteRecord>,
    pub nullifiers: BTreeSet<Nullifier>,
    pub tally: Option<TallyResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VoteRecord {
    pub nullifier: Nullifier,
    pub trust_weight: u32,
    pub choice: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TallyResult {
    pub yes_weight: u64,
    pub no_weight: u64,
    pub participation_pct: u32,
    pub quorum_met: bool,
    pub passed: bool,
}

/// execution period after a proposal passes, before `execute` must run.
const EXECUTION_WINDOW_SECS: u64 = 7 * 24 * 3600;

#[derive(Clone, Debug, Default)]
pub struct GovernanceStore {
    proposals: BTreeMap<Hash32, Proposal>,
}

impl GovernanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, proposal_id: &Hash32) -> Option<&Proposal> {
        self.proposals.get(proposal_id)
    }

    /// `create_proposal` (spec.md 4.6). the caller has already verified
    /// `creator_proof` (membership) and checked the creator's trust score
    /// against the scope's threshold before calling this.
    pub fn create_proposal(
        &mut self,
        creator_ic: Hash32,
        creator_score: u32,
        params: ProposalParams,
        now: u64,
        salt: &[u8],
    ) -> Result<Hash32, LifecycleError> {
        let required = match params.scope {
            ProposalScope::ProtocolWide => PROTOCOL_WIDE_PROPOSAL_THRESHOLD,
            ProposalScope::CircleScoped => CIRCLE_SCOPED_PROPOSAL_THRESHOLD,
        };
        if creator_score < required {
            return Err(LifecycleError::QuorumOrTrustUnmet);
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice(creator_ic.as_ref());
        bytes.extend_from_slice(&now.to_le_bytes());
        bytes.extend_from_slice(salt);
        let proposal_id = hash(b"circles.proposal_id.v1", &bytes);

        let deadline = now + params.voting_period_secs;
        self.proposals.insert(
            proposal_id,
            Proposal {
                proposal_id,
                proposal_type: params.proposal_type,
                encrypted_payload: params.encrypted_payload,
                deadline,
                execution_deadline: deadline + EXECUTION_WINDOW_SECS,
                quorum_pct: params.quorum_pct,
                min_trust_score: params.min_trust_score,
                eligible_count: params.eligible_count,
                status: ProposalStatus::Active,
                votes: Vec::new(),
                nullifiers: BTreeSet::new(),
                tally: None,
            },
        );
        tracing::info!(proposal = %proposal_id, "proposal created");
        Ok(proposal_id)
    }

    /// `cast_vote` (spec.md 4.6). the caller has already verified the
    /// `vote_validity` proof (membership + min-trust-score + nullifier
    /// binding) via `circles-zk`'s oracle.
    pub fn cast_vote(
        &mut self,
        proposal_id: Hash32,
        nullifier: Nullifier,
        trust_weight: u32,
        choice: bool,
        now: u64,
    ) -> Result<(), LifecycleError> {
        let proposal = self.proposals.get_mut(&proposal_id).ok_or(LifecycleError::ProposalNotFound(proposal_id))?;
        if proposal.status != ProposalStatus::Active {
            return Err(LifecycleError::IllegalProposalState { op: "cast_vote" });
        }
        if now >= proposal.deadline {
            return Err(LifecycleError::ProposalExpired);
        }
        if trust_weight < proposal.min_trust_score {
            return Err(LifecycleError::QuorumOrTrustUnmet);
        }
        if !proposal.nullifiers.insert(nullifier) {
            return Err(LifecycleError::NullifierReused(nullifier));
        }
        proposal.votes.push(VoteRecord { nullifier, trust_weight, choice });
        Ok(())
    }

    /// `tally` (spec.md 4.6), callable after the voting deadline.
    /// idempotent: once computed the cached `TallyResult` is returned.
    pub fn tally(&mut self, proposal_id: Hash32, now: u64) -> Result<TallyResult, LifecycleError> {
        let proposal = self.proposals.get_mut(&proposal_id).ok_or(LifecycleError::ProposalNotFound(proposal_id))?;
        if let Some(result) = proposal.tally {
            return Ok(result);
        }
        if proposal.status != ProposalStatus::Active {
            return Err(LifecycleError::IllegalProposalState { op: "tally" });
        }
        if now < proposal.deadline {
            return Err(LifecycleError::IllegalProposalState { op: "tally_before_deadline" });
        }

        let yes_weight: u64 = proposal.votes.iter().filter(|v| v.choice).map(|v| v.trust_weight as u64).sum();
        let no_weight: u64 = proposal.votes.iter().filter(|v| !v.choice).map(|v| v.trust_weight as u64).sum();
        let participation_pct = if proposal.eligible_count == 0 {
            0
        } else {
            (proposal.votes.len() as u64 * 100 / proposal.eligible_count as u64) as u32
        };
        let quorum_met = participation_pct >= proposal.quorum_pct;
        let passed = quorum_met && yes_weight > no_weight;

        let result = TallyResult { yes_weight, no_weight, participation_pct, quorum_met, passed };
        proposal.tally = Some(result);
        proposal.status = if passed { ProposalStatus::Passed } else { ProposalStatus::Failed };
        tracing::info!(proposal = %proposal_id, passed, participation_pct, "proposal tallied");
        Ok(result)
    }

    /// `execute` (spec.md 4.6): only on `Passed`, before `execution_deadline`.
    pub fn execute(&mut self, proposal_id: Hash32, now: u64) -> Result<(), LifecycleError> {
        let proposal = self.proposals.get_mut(&proposal_id).ok_or(LifecycleError::ProposalNotFound(proposal_id))?;
        if proposal.status != ProposalStatus::Passed {
            return Err(LifecycleError::IllegalProposalState { op: "execute" });
        }
        if now >= proposal.execution_deadline {
            return Err(LifecycleError::ExecutionDeadlinePassed);
        }
        proposal.status = ProposalStatus::Executed;
        tracing::info!(proposal = %proposal_id, "proposal executed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ProposalParams {
        ProposalParams {
            proposal_type: ProposalType::InterestRate,
            scope: ProposalScope::ProtocolWide,
            encrypted_payload: vec![1, 2, 3],
            voting_period_secs: 1000,
            quorum_pct: 60,
            min_trust_score: 400,
            eligible_count: 5,
        }
    }

    #[test]
    fn governance_passes_per_spec_scenario() {
        let mut store = GovernanceStore::new();
        let proposal_id = store
            .create_proposal(Hash32::from_bytes([1u8; 32]), 850, params(), 0, b"s")
            .unwrap();

        let voters = [(850u32, true), (720, true), (650, false), (480, true)];
        for (i, (score, choice)) in voters.into_iter().enumerate() {
            let nullifier = Hash32::from_bytes([i as u8 + 10; 32]);
            store.cast_vote(proposal_id, nullifier, score, choice, 10).unwrap();
        }

        let tally = store.tally(proposal_id, 1001).unwrap();
        assert_eq!(tally.yes_weight, 850 + 720 + 480);
        assert_eq!(tally.no_weight, 650);
        assert_eq!(tally.participation_pct, 80);
        assert!(tally.passed);

        store.execute(proposal_id, 1002).unwrap();
        assert_eq!(store.get(&proposal_id).unwrap().status, ProposalStatus::Executed);
    }

    #[test]
    fn vote_past_deadline_rejected() {
        let mut store = GovernanceStore::new();
        let proposal_id = store
            .create_proposal(Hash32::from_bytes([2u8; 32]), 850, params(), 0, b"s")
            .unwrap();
        let nullifier = Hash32::from_bytes([9u8; 32]);
        assert_eq!(
            store.cast_vote(proposal_id, nullifier, 500, true, 1000),
            Err(LifecycleError::ProposalExpired)
        );
    }

    #[test]
    fn double_vote_same_proposal_rejected() {
        let mut store = GovernanceStore::new();
        let proposal_id = store
            .create_proposal(Hash32::from_bytes([3u8; 32]), 850, params(), 0, b"s")
            .unwrap();
        let nullifier = Hash32::from_bytes([9u8; 32]);
        store.cast_vote(proposal_id, nullifier, 500, true, 10).unwrap();
        assert_eq!(
            store.cast_vote(proposal_id, nullifier, 500, true, 10),
            Err(LifecycleError::NullifierReused(nullifier))
        );
    }

    #[test]
    fn creator_below_threshold_rejected() {
        let mut store = GovernanceStore::new();
        assert_eq!(
            store.create_proposal(Hash32::from_bytes([4u8; 32]), 650, params(), 0, b"s"),
            Err(LifecycleError::QuorumOrTrustUnmet)
        );
    }

    #[test]
    fn quorum_not_met_fails() {
        let mut store = GovernanceStore::new();
        let mut p = params();
        p.eligible_count = 100;
        let proposal_id = store.create_proposal(Hash32::from_bytes([5u8; 32]), 850, p, 0, b"s").unwrap();
        store.cast_vote(proposal_id, Hash32::from_bytes([1u8; 32]), 900, true, 10).unwrap();
        let tally = store.tally(proposal_id, 1001).unwrap();
        assert!(!tally.quorum_met);
        assert!(!tally.passed);
    }
}
