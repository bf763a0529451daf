//! wallet connection registry (C12, spec.md 4.8)
//!
//! a contributor's own payment processor instance holds the plaintext
//! balance behind each connected wallet's commitment (it is the
//! contributor's own agent, not an external observer) so `collect` can plan
//! chain selection and partial-payment math; the `balance_commit` is what
//! everything outside this crate ever sees.

use std::collections::BTreeMap;

use circles_crypto::{Commitment, Hash32, Randomness, Secret};
use circles_zk::circuits::bridge::{BalancePublic, WalletOwnershipPublic};
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs};

use crate::error::PaymentError;

#[derive(Clone, Debug)]
pub struct WalletConnection {
    pub chain: String,
    pub balance_commit: Commitment,
    pub balance: u128,
    pub randomness: Randomness,
    /// spends from this wallet during collection; known to the contributor's
    /// own processor instance, never published.
    pub transfer_secret: Secret,
    pub privacy_score: u32,
    pub last_verified: u64,
    pub active: bool,
}

#[derive(Clone, Debug, Default)]
pub struct WalletRegistry {
    connections: BTreeMap<(Hash32, String), WalletConnection>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `connect_wallet` (spec.md 4.8, 6): idempotent on the same
    /// `(ic, chain, proof)` pair — reconnecting with the same ownership
    /// proof just refreshes `last_verified`.
    pub fn connect_wallet(
        &mut self,
        ic: Hash32,
        ownership_public: WalletOwnershipPublic,
        ownership_proof: &Proof,
        balance_public: BalancePublic,
        balance_proof: &Proof,
        balance: u128,
        randomness: Randomness,
        transfer_secret: Secret,
        privacy_score: u32,
        now: u64,
        oracle: &dyn ProofOracle,
    ) -> Result<(), PaymentError> {
        if !oracle.verify(CircuitId::WalletOwnership, ownership_proof, &PublicInputs::WalletOwnership(ownership_public.clone())) {
            return Err(PaymentError::OwnershipProofInvalid(ownership_public.chain.clone()));
        }
        if !oracle.verify(CircuitId::Balance, balance_proof, &PublicInputs::Balance(balance_public.clone())) {
            return Err(PaymentError::BalanceProofInvalid(ownership_public.chain.clone()));
        }
        let key = (ic, ownership_public.chain.clone());
        let connection = WalletConnection {
            chain: ownership_public.chain.clone(),
            balance_commit: balance_public.balance_commit,
            balance,
            randomness,
            transfer_secret,
            privacy_score,
            last_verified: now,
            active: true,
        };
        self.connections.insert(key, connection);
        tracing::info!(chain = %ownership_public.chain, "wallet connected");
        Ok(())
    }

    pub fn connections_for(&self, ic: &Hash32) -> Vec<&WalletConnection> {
        self.connections
            .iter()
            .filter(|((owner, _), conn)| owner == ic && conn.active)
            .map(|(_, conn)| conn)
            .collect()
    }

    pub fn deactivate(&mut self, ic: &Hash32, chain: &str) {
        if let Some(conn) = self.connections.get_mut(&(*ic, chain.to_string())) {
            conn.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circles_crypto::{commit, nullifier, Secret};
    use circles_zk::circuits::bridge::{WalletOwnershipWitness, BalanceWitness};
    use circles_zk::{DeterministicOracle, Witness};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn connect_wallet_verifies_both_proofs() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let ic = Hash32::from_bytes([1u8; 32]);
        let secret = Secret([2u8; 32]);
        let ownership_tag = nullifier(&secret, b"wallet_ownership", &[ic.as_ref(), b"ethereum"]);
        let ownership_public = WalletOwnershipPublic { ic, chain: "ethereum".to_string(), ownership_tag };
        let ownership_proof = DeterministicOracle
            .prove(
                CircuitId::WalletOwnership,
                &Witness::WalletOwnership(WalletOwnershipWitness { secret }),
                &PublicInputs::WalletOwnership(ownership_public.clone()),
            )
            .unwrap();

        let balance = 500u128;
        let randomness = Randomness::random(&mut rng);
        let balance_public = BalancePublic { balance_commit: commit(&balance.to_le_bytes(), randomness), ceiling: 1_000_000 };
        let balance_proof = DeterministicOracle
            .prove(
                CircuitId::Balance,
                &Witness::Balance(BalanceWitness { balance, randomness }),
                &PublicInputs::Balance(balance_public.clone()),
            )
            .unwrap();

        let mut registry = WalletRegistry::new();
        registry
            .connect_wallet(
                ic,
                ownership_public,
                &ownership_proof,
                balance_public,
                &balance_proof,
                balance,
                randomness,
                secret,
                40,
                10,
                &DeterministicOracle,
            )
            .unwrap();
        assert_eq!(registry.connections_for(&ic).len(), 1);
    }
}
