//! penalty enforcement (spec.md 4.9)
//!
//! one record per (target_nullifier, type, severity, reason), with a
//! 7-day appeal window; grounded on the same evidence-record shape as
//! `liquidation.rs`.

use std::collections::BTreeMap;

use circles_crypto::{hash, Hash32, SealKey};
use circles_zk::circuits::risk::{PenaltyPublic, PenaltyWitness};
use circles_zk::{CircuitId, ProofOracle, PublicInputs, Witness};

use crate::error::RiskError;

const APPEAL_WINDOW_SECS: u64 = 7 * 24 * 3600;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PenaltyType {
    LatePayment,
    MissedContribution,
    DefaultAfterAuction,
    GovernanceAbuse,
}

impl PenaltyType {
    fn code(self) -> u8 {
        match self {
            Self::LatePayment => 0,
            Self::MissedContribution => 1,
            Self::DefaultAfterAuction => 2,
            Self::GovernanceAbuse => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PenaltyRecord {
    pub record_id: Hash32,
    pub target_nullifier: Hash32,
    pub penalty_type: PenaltyType,
    pub severity: u32,
    pub encrypted_reason: Vec<u8>,
    pub appeal_deadline: u64,
}

#[derive(Clone, Debug, Default)]
pub struct PenaltyStore {
    records: BTreeMap<Hash32, PenaltyRecord>,
}

impl PenaltyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, record_id: &Hash32) -> Option<&PenaltyRecord> {
        self.records.get(record_id)
    }

    pub fn enforce(
        &mut self,
        witness: PenaltyWitness,
        public: PenaltyPublic,
        penalty_type: PenaltyType,
        key: &SealKey,
        now: u64,
        oracle: &dyn ProofOracle,
    ) -> Result<PenaltyRecord, RiskError> {
        if penalty_type.code() != public.penalty_type {
            return Err(RiskError::ProofInvalid("penalty"));
        }
        let proof = oracle
            .prove(CircuitId::Penalty, &Witness::Penalty(witness), &PublicInputs::Penalty(public.clone()))
            .map_err(|_| RiskError::ProofInvalid("penalty"))?;
        if !oracle.verify(CircuitId::Penalty, &proof, &PublicInputs::Penalty(public.clone())) {
            return Err(RiskError::ProofInvalid("penalty"));
        }

        let mut id_bytes = Vec::new();
        id_bytes.extend_from_slice(public.target_nullifier.as_ref());
        id_bytes.push(public.penalty_type);
        id_bytes.extend_from_slice(&now.to_le_bytes());
        let record_id = hash(b"circles.penalty_record.v1", &id_bytes);

        let record = PenaltyRecord {
            record_id,
            target_nullifier: public.target_nullifier,
            penalty_type,
            severity: public.severity,
            encrypted_reason: circles_crypto::seal(key, public.reason_commit.as_ref()),
            appeal_deadline: now + APPEAL_WINDOW_SECS,
        };
        self.records.insert(record_id, record.clone());
        tracing::warn!(record = %record_id, penalty = ?penalty_type, "penalty enforced");
        Ok(record)
    }
}
