//! liquidation orders (spec.md 4.9)
//!
//! authored only once a `liquidation` justification proof verifies;
//! grounded on `ligerito-shielded-pool::dispute`'s encrypted-evidence
//! record shape.

use std::collections::BTreeMap;

use circles_crypto::{hash, Hash32, Nullifier, SealKey};
use circles_zk::circuits::risk::{LiquidationPublic, LiquidationWitness};
use circles_zk::{CircuitId, ProofOracle, PublicInputs, Witness};

use crate::error::RiskError;

const LIQUIDATION_WINDOW_SECS: u64 = 24 * 3600;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiquidationOrder {
    pub order_id: Hash32,
    pub circle_id: Hash32,
    pub encrypted_reason: Vec<u8>,
    pub liquidation_amount: u128,
    pub encrypted_recovered_assets: Vec<u8>,
    pub execution_deadline: u64,
}

#[derive(Clone, Debug, Default)]
pub struct LiquidationStore {
    orders: BTreeMap<Hash32, LiquidationOrder>,
}

impl LiquidationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, order_id: &Hash32) -> Option<&LiquidationOrder> {
        self.orders.get(order_id)
    }

    /// author a liquidation order (spec.md 4.9). `witness`/`public` carry
    /// the `liquidation_justification` proof's relation; `recovered_assets`
    /// is the cleartext breakdown, sealed under `key` before storage.
    #[allow(clippy::too_many_arguments)]
    pub fn liquidate(
        &mut self,
        witness: LiquidationWitness,
        public: LiquidationPublic,
        liquidation_amount: u128,
        recovered_assets: &[u8],
        key: &SealKey,
        now: u64,
        oracle: &dyn ProofOracle,
    ) -> Result<LiquidationOrder, RiskError> {
        let proof = oracle
            .prove(
                CircuitId::Liquidation,
                &Witness::Liquidation(witness),
                &PublicInputs::Liquidation(public.clone()),
            )
            .map_err(|_| RiskError::ProofInvalid("liquidation"))?;
        if !oracle.verify(CircuitId::Liquidation, &proof, &PublicInputs::Liquidation(public.clone())) {
            return Err(RiskError::ProofInvalid("liquidation"));
        }

        let mut id_bytes = Vec::new();
        id_bytes.extend_from_slice(public.nullifier.as_ref());
        id_bytes.extend_from_slice(public.circle_id.as_ref());
        id_bytes.extend_from_slice(&now.to_le_bytes());
        let order_id = hash(b"circles.liquidation_order.v1", &id_bytes);

        let order = LiquidationOrder {
            order_id,
            circle_id: public.circle_id,
            encrypted_reason: circles_crypto::seal(key, &public.reason_commit.as_ref().to_vec()),
            liquidation_amount,
            encrypted_recovered_assets: circles_crypto::seal(key, recovered_assets),
            execution_deadline: now + LIQUIDATION_WINDOW_SECS,
        };
        self.orders.insert(order_id, order.clone());
        tracing::warn!(order = %order_id, circle = %public.circle_id, "liquidation order authored");
        Ok(order)
    }

    pub fn authority_nullifier(authority_secret: &circles_crypto::Secret, circle_id: Hash32) -> Nullifier {
        circles_crypto::nullifier(authority_secret, b"liquidation", &[circle_id.as_ref()])
    }
}
