//! insurance pool accounting proof (spec.md 4.9/3's `insurance_pool`)
//!
//! the circle's insurance pool total (`Circle::insurance_pool`, owned by
//! `circles-lifecycle`) is a cleartext running sum; this proves that total
//! is consistent with the individual per-member stake commitments without
//! revealing any one member's stake.

use circles_zk::circuits::risk::{InsurancePublic, InsuranceWitness};
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs, Witness};

use crate::error::RiskError;

pub fn prove_insurance_total(
    witness: InsuranceWitness,
    public: InsurancePublic,
    oracle: &dyn ProofOracle,
) -> Result<Proof, RiskError> {
    oracle
        .prove(CircuitId::Insurance, &Witness::Insurance(witness), &PublicInputs::Insurance(public))
        .map_err(|_| RiskError::ProofInvalid("insurance"))
}

pub fn verify_insurance_total(public: &InsurancePublic, proof: &Proof, oracle: &dyn ProofOracle) -> bool {
    oracle.verify(CircuitId::Insurance, proof, &PublicInputs::Insurance(public.clone()))
}
