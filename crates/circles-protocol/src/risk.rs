//! private stake, default detection, liquidation and penalty surface
//! (spec.md 4.9, 6)

use circles_crypto::Hash32;
use circles_risk::{DefaultFlag, LiquidationOrder, PenaltyRecord, PenaltyType, StakeCalculation};
use circles_zk::circuits::risk::{
    DefaultDetectionPublic, DefaultDetectionWitness, InsurancePublic, InsuranceWitness, LiquidationPublic,
    LiquidationWitness, PenaltyPublic, PenaltyWitness, StakeAdequacyPublic, StakeAdequacyWitness,
};
use circles_zk::{Proof, ProofOracle};
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    pub fn prove_stake_adequacy(
        &self,
        witness: StakeAdequacyWitness,
        required_stake: u128,
    ) -> Result<(Proof, StakeAdequacyPublic), ProtocolError> {
        circles_risk::prove_stake_adequacy(witness, required_stake, &self.oracle).map_err(Into::into)
    }

    pub fn verify_stake_adequacy(&self, public: &StakeAdequacyPublic, proof: &Proof) -> bool {
        circles_risk::verify_stake_adequacy(public, proof, &self.oracle)
    }

    /// the real stake a member is asked to post: adjusted base plus the
    /// diversifying perturbation (spec.md 4.9).
    pub fn calculate_stake(&self, circle_id: Hash32, witness: &StakeAdequacyWitness) -> StakeCalculation {
        StakeCalculation {
            circle_id,
            required_stake: circles_risk::base_adjusted_stake(witness),
            adjusted_stake: circles_risk::calculate_stake(witness),
        }
    }

    pub fn flag_default(&mut self, witness: DefaultDetectionWitness, public: DefaultDetectionPublic) -> Result<DefaultFlag, ProtocolError> {
        self.defaults.flag_default(witness, public, &self.oracle).map_err(Into::into)
    }

    pub fn is_flagged(&self, nullifier: &circles_crypto::Nullifier) -> bool {
        self.defaults.is_flagged(nullifier)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn liquidate(
        &mut self,
        witness: LiquidationWitness,
        public: LiquidationPublic,
        liquidation_amount: u128,
        recovered_assets: &[u8],
        now: u64,
    ) -> Result<LiquidationOrder, ProtocolError> {
        self.liquidations
            .liquidate(witness, public, liquidation_amount, recovered_assets, &self.config.master_key, now, &self.oracle)
            .map_err(Into::into)
    }

    pub fn enforce_penalty(
        &mut self,
        witness: PenaltyWitness,
        public: PenaltyPublic,
        penalty_type: PenaltyType,
        now: u64,
    ) -> Result<PenaltyRecord, ProtocolError> {
        self.penalties.enforce(witness, public, penalty_type, &self.config.master_key, now, &self.oracle).map_err(Into::into)
    }

    pub fn prove_insurance_total(&self, witness: InsuranceWitness, public: InsurancePublic) -> Result<Proof, ProtocolError> {
        circles_risk::prove_insurance_total(witness, public, &self.oracle).map_err(Into::into)
    }

    pub fn verify_insurance_total(&self, public: &InsurancePublic, proof: &Proof) -> bool {
        circles_risk::verify_insurance_total(public, proof, &self.oracle)
    }
}
