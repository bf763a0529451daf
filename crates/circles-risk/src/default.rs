//! anonymous default detection (spec.md 4.9)
//!
//! grounded on `ligerito-shielded-pool::dispute`'s typed evidence/severity
//! record shape, generalized from a channel dispute to a per-member-round
//! missed-payment flag. Flags are never minted without a verified
//! `default_detection` proof (spec.md 4.9: "forbids flags without proofs").

use std::collections::BTreeSet;

use circles_crypto::{Commitment, Hash32, Nullifier};
use circles_zk::circuits::risk::{DefaultDetectionPublic, DefaultDetectionWitness};
use circles_zk::{CircuitId, ProofOracle, PublicInputs, Witness};

use crate::error::RiskError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultFlag {
    pub nullifier: Nullifier,
    pub circle_id: Hash32,
    pub round: u64,
    pub severity_commit: Commitment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultDetectionReport {
    pub flag_count: usize,
    /// `min(10, 2 * flag_count)` (spec.md 4.9) — derived from the public
    /// flag count only, never from the hidden per-flag severities.
    pub confidential_severity: u32,
    pub requires_intervention: bool,
}

impl DefaultDetectionReport {
    fn from_count(flag_count: usize) -> Self {
        let confidential_severity = (2 * flag_count as u32).min(10);
        Self { flag_count, confidential_severity, requires_intervention: confidential_severity >= 5 }
    }
}

/// one flag per (member, circle, round) globally, scoped to the "default"
/// nullifier domain (spec.md I1).
#[derive(Clone, Debug, Default)]
pub struct DefaultFlagStore {
    flagged: BTreeSet<Nullifier>,
}

impl DefaultFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// flag one missed payment. Requires a verified `default_detection`
    /// proof binding the witness's nullifier and severity commitment to
    /// `public`; rejects a nullifier already seen anywhere in protocol
    /// history (spec.md I1, per the "default" domain).
    pub fn flag_default(
        &mut self,
        witness: DefaultDetectionWitness,
        public: DefaultDetectionPublic,
        oracle: &dyn ProofOracle,
    ) -> Result<DefaultFlag, RiskError> {
        if witness.severity > 10 {
            return Err(RiskError::SeverityOutOfRange(witness.severity));
        }
        let proof = oracle
            .prove(
                CircuitId::DefaultDetection,
                &Witness::DefaultDetection(witness),
                &PublicInputs::DefaultDetection(public.clone()),
            )
            .map_err(|_| RiskError::ProofInvalid("default_detection"))?;
        if !oracle.verify(CircuitId::DefaultDetection, &proof, &PublicInputs::DefaultDetection(public.clone())) {
            return Err(RiskError::ProofInvalid("default_detection"));
        }
        if !self.flagged.insert(public.nullifier) {
            return Err(RiskError::NullifierReused(public.nullifier));
        }
        tracing::warn!(circle = %public.circle_id, round = public.round, "member flagged for missed payment");
        Ok(DefaultFlag {
            nullifier: public.nullifier,
            circle_id: public.circle_id,
            round: public.round,
            severity_commit: public.severity_commit,
        })
    }

    /// `detect_defaults` (spec.md 4.9): flag every member in `misses`,
    /// aggregate the round's confidential severity from the flag count.
    pub fn detect_defaults(
        &mut self,
        misses: impl IntoIterator<Item = (DefaultDetectionWitness, DefaultDetectionPublic)>,
        oracle: &dyn ProofOracle,
    ) -> Result<(Vec<DefaultFlag>, DefaultDetectionReport), RiskError> {
        let mut flags = Vec::new();
        for (witness, public) in misses {
            flags.push(self.flag_default(witness, public, oracle)?);
        }
        let report = DefaultDetectionReport::from_count(flags.len());
        Ok((flags, report))
    }

    pub fn is_flagged(&self, nullifier: &Nullifier) -> bool {
        self.flagged.contains(nullifier)
    }
}
