//! cross-chain privacy bridge surface: wallet connection, routing, pool
//! deposits/spends, and mixing (spec.md 4.7, 4.8, 6)

use circles_bridge::{BalanceProofResult, EdgeParams, MixSettlement, RoutedPayment, Transfer};
use circles_crypto::{Hash32, Nullifier, Randomness, Secret};
use circles_payments::WalletConnection;
use circles_zk::circuits::bridge::{BalancePublic, TransferPublic, WalletOwnershipPublic};
use circles_zk::circuits::membership::MembershipPublic;
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs};
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    pub fn add_supported_chain(&mut self, chain_id: &str) {
        self.bridge.add_supported_chain(chain_id);
    }

    pub fn connect_chains(&mut self, a: &str, b: &str, params: EdgeParams) {
        self.bridge.graph.connect(a, b, params);
    }

    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<(), ProtocolError> {
        self.wallets
            .connect_wallet(
                ic,
                ownership_public,
                ownership_proof,
                balance_public,
                balance_proof,
                balance,
                randomness,
                transfer_secret,
                privacy_score,
                now,
                &self.oracle,
            )
            .map_err(Into::into)
    }

    pub fn connected_wallets(&self, ic: &Hash32) -> Vec<&WalletConnection> {
        self.wallets.connections_for(ic)
    }

    pub fn deactivate_wallet(&mut self, ic: &Hash32, chain: &str) {
        self.wallets.deactivate(ic, chain);
    }

    pub fn route_payment(
        &mut self,
        source_chain: &str,
        target_chain: &str,
        amount: u128,
        recipient_commit: Hash32,
    ) -> Result<RoutedPayment, ProtocolError> {
        self.bridge.route_payment(source_chain, target_chain, amount, recipient_commit, &mut self.rng).map_err(Into::into)
    }

    /// `balance_proof` (spec.md 4.7): verifies a `Balance` proof and returns
    /// it alongside `chain`'s nullifier-set root for double-spend context.
    pub fn balance_proof(&self, chain: &str, public: &BalancePublic, proof: &Proof) -> BalanceProofResult {
        self.bridge.balance_proof(chain, public, proof, &self.oracle)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn initiate_transfer(
        &mut self,
        public: TransferPublic,
        proof: &Proof,
        mixing_delay_seconds: u64,
        sender_secret: Secret,
        amount: u128,
        input_randomness: Randomness,
        now: u64,
    ) -> Result<Transfer, ProtocolError> {
        self.bridge
            .initiate_transfer(public, proof, mixing_delay_seconds, sender_secret, amount, input_randomness, &self.oracle, &mut self.rng, now)
            .map_err(Into::into)
    }

    pub fn transfer(&self, transfer_id: &Hash32) -> Result<&Transfer, ProtocolError> {
        self.bridge.transfer(transfer_id).map_err(Into::into)
    }

    /// deposit a commitment into the fixed-denomination pool for `chain_id`
    /// (spec.md 4.7's anonymity pool, creating the pool on first use).
    pub fn deposit_to_pool(&mut self, chain_id: &str, denomination_tier: u128, commitment: Hash32) -> Hash32 {
        let pool_id = self.bridge.pools.ensure_pool(chain_id, denomination_tier);
        if let Some(pool) = self.bridge.pools.get_mut(&pool_id) {
            pool.add(commitment);
        }
        pool_id
    }

    /// `spend(pool, nullifier, proof)` (spec.md 4.7): verify the caller's
    /// anonymity-pool-membership proof against the pool's own root before
    /// the nullifier double-spend check, mirroring `submit_bid`'s
    /// membership check in `auctions.rs`.
    pub fn spend_from_pool(
        &mut self,
        pool_id: &Hash32,
        membership_public: MembershipPublic,
        membership_proof: &Proof,
        nullifier: Nullifier,
    ) -> Result<(), ProtocolError> {
        let root = self
            .bridge
            .pools
            .get(pool_id)
            .ok_or(circles_bridge::BridgeError::PoolNotFound(*pool_id))?
            .merkle_root();
        if membership_public.root != root {
            return Err(ProtocolError::ProofRejected);
        }
        if !self.oracle.verify(CircuitId::AnonymityPoolMembership, membership_proof, &PublicInputs::AnonymityPoolMembership(membership_public)) {
            return Err(ProtocolError::ProofRejected);
        }
        let pool = self.bridge.pools.get_mut(pool_id).ok_or(circles_bridge::BridgeError::PoolNotFound(*pool_id))?;
        pool.spend(nullifier).map_err(Into::into)
    }

    pub fn pool_root(&self, pool_id: &Hash32) -> Option<Hash32> {
        self.bridge.pools.get(pool_id).map(|p| p.merkle_root())
    }

    /// queue one leg for the next mix batch on `(source_chain,
    /// target_chain)`'s corridor (spec.md 4.7's mixer).
    pub fn enqueue_mix(
        &mut self,
        source_chain: &str,
        target_chain: &str,
        secret: Secret,
        value: u128,
        input_randomness: Randomness,
    ) -> Result<(), ProtocolError> {
        self.bridge.mixer.enqueue(source_chain, target_chain, secret, value, input_randomness, &mut self.rng).map_err(Into::into)
    }

    pub fn mix_queue_len(&self, source_chain: &str, target_chain: &str) -> usize {
        self.bridge.mixer.queue_len(source_chain, target_chain)
    }

    pub fn execute_mix(
        &mut self,
        source_chain: &str,
        target_chain: &str,
        permutation: Vec<usize>,
        target_set_size: usize,
    ) -> Result<MixSettlement, ProtocolError> {
        self.bridge.mixer.execute(source_chain, target_chain, permutation, target_set_size, &self.oracle).map_err(Into::into)
    }
}
