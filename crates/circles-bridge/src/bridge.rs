//! privacy bridge facade (C11, spec.md 4.7)
//!
//! ties the pool registry, mixer and router together behind
//! `initiate_transfer` / `balance_proof` / `route_payment`. proof
//! verification happens here, at the sub-engine boundary, since only this
//! layer has both the chain graph and the pool/nullifier bookkeeping a
//! transfer touches.

use std::collections::{BTreeMap, BTreeSet};

use circles_crypto::{commit, hash, Commitment, Hash32, Nullifier, Randomness, Secret};
use circles_merkle::MerkleTree;
use circles_zk::circuits::bridge::{BalancePublic, TransferPublic};
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs};

use crate::error::BridgeError;
use crate::mixer::Mixer;
use crate::pool::PoolRegistry;
use crate::router::{ChainGraph, Route, RouteMode, MIN_ROUTE_PRIVACY_SCORE};

/// the result of `PrivacyBridge::balance_proof` (spec.md 4.7): whether the
/// `Balance` proof verified, paired with `chain`'s current nullifier-set
/// root so the caller has double-spend context alongside the balance claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceProofResult {
    pub verified: bool,
    pub nullifier_set_root: Hash32,
}

/// `route_payment`'s result (spec.md 4.7): the chosen route plus one
/// commitment per intermediate hop and a final commitment binding the
/// amount to the recipient.
#[derive(Clone, Debug)]
pub struct RoutedPayment {
    pub route: Route,
    pub hop_commitments: Vec<Commitment>,
    pub recipient_commitment: Commitment,
}

#[derive(Clone, Debug)]
pub struct Transfer {
    pub transfer_id: Hash32,
    pub source_chain: String,
    pub target_chain: String,
    pub commitment: Commitment,
    pub nullifier: Nullifier,
    pub eta_seconds: u64,
    pub mixed: bool,
    pub hops: usize,
}

#[derive(Clone, Debug, Default)]
pub struct PrivacyBridge {
    pub pools: PoolRegistry,
    pub mixer: Mixer,
    pub graph: ChainGraph,
    supported_chains: BTreeSet<String>,
    spent_nullifiers: BTreeSet<Nullifier>,
    transfers: BTreeMap<Hash32, Transfer>,
    /// per-chain nullifier-set accumulator (spec.md 4.7's "current chain's
    /// nullifier-set Merkle root"), fed by every transfer nullifier spent on
    /// that chain.
    chain_nullifiers: BTreeMap<String, MerkleTree>,
}

impl PrivacyBridge {
    pub fn new(unit: u128) -> Self {
        Self {
            pools: PoolRegistry::new(unit),
            mixer: Mixer::new(),
            graph: ChainGraph::new(),
            supported_chains: BTreeSet::new(),
            spent_nullifiers: BTreeSet::new(),
            transfers: BTreeMap::new(),
            chain_nullifiers: BTreeMap::new(),
        }
    }

    pub fn add_supported_chain(&mut self, chain_id: &str) {
        self.supported_chains.insert(chain_id.to_string());
    }

    fn require_supported(&self, chain_id: &str) -> Result<(), BridgeError> {
        if self.supported_chains.contains(chain_id) {
            Ok(())
        } else {
            Err(BridgeError::UnsupportedChain)
        }
    }

    /// `initiate_transfer` (spec.md 4.7). the caller supplies a verified
    /// `proof` over `public` for `CircuitId::Transfer`; this checks chain
    /// support, nullifier freshness, records the transfer and, if
    /// `mixing_delay_seconds` is non-zero, actually enqueues the leg in
    /// `self.mixer` rather than just labeling the transfer as mixed —
    /// `sender_secret`/`amount`/`input_randomness` are the plaintext values
    /// the mixer's own commitment needs, distinct from `public.commitment`
    /// (which binds the recipient, not the mix's own input/output pair).
    #[allow(clippy::too_many_arguments)]
    pub fn initiate_transfer(
        &mut self,
        public: TransferPublic,
        proof: &Proof,
        mixing_delay_seconds: u64,
        sender_secret: Secret,
        amount: u128,
        input_randomness: Randomness,
        oracle: &dyn ProofOracle,
        rng: &mut impl rand::RngCore,
        now: u64,
    ) -> Result<Transfer, BridgeError> {
        self.require_supported(&public.source_chain)?;
        self.require_supported(&public.target_chain)?;
        if public.source_chain == public.target_chain {
            return Err(BridgeError::IdenticalEndpoints);
        }
        if !oracle.verify(CircuitId::Transfer, proof, &PublicInputs::Transfer(public.clone())) {
            return Err(BridgeError::ProofInvalid("transfer"));
        }
        if !self.spent_nullifiers.insert(public.nullifier) {
            return Err(BridgeError::NullifierReused(public.nullifier));
        }
        self.chain_nullifiers.entry(public.source_chain.clone()).or_default().insert(public.nullifier);

        let route = self
            .graph
            .find_route(&public.source_chain, &public.target_chain, RouteMode::Fastest)
            .unwrap_or(Route {
                hops: vec![public.source_chain.clone(), public.target_chain.clone()],
                edges: vec![],
                total_delay_seconds: 0,
                total_fee_bp: 0,
                privacy_score: 0,
            });

        let mut id_bytes = Vec::new();
        id_bytes.extend_from_slice(public.nullifier.as_ref());
        id_bytes.extend_from_slice(&now.to_le_bytes());
        let transfer_id = hash(b"circles.transfer_id.v1", &id_bytes);

        let hops = route.edges.len();
        let transfer = Transfer {
            transfer_id,
            source_chain: public.source_chain.clone(),
            target_chain: public.target_chain.clone(),
            commitment: public.commitment,
            nullifier: public.nullifier,
            eta_seconds: now + route.total_delay_seconds + mixing_delay_seconds,
            mixed: mixing_delay_seconds > 0,
            hops,
        };
        if mixing_delay_seconds > 0 {
            self.mixer.enqueue(&public.source_chain, &public.target_chain, sender_secret, amount, input_randomness, rng)?;
        }
        self.transfers.insert(transfer_id, transfer.clone());
        tracing::info!(transfer = %transfer_id, mixed = transfer.mixed, "transfer initiated");
        Ok(transfer)
    }

    pub fn transfer(&self, transfer_id: &Hash32) -> Result<&Transfer, BridgeError> {
        self.transfers.get(transfer_id).ok_or(BridgeError::TransferNotFound(*transfer_id))
    }

    /// `balance_proof` (spec.md 4.7): verifies a `Balance` proof against the
    /// committed ceiling without learning the balance itself, returned
    /// alongside `chain`'s current nullifier-set root for double-spend
    /// context.
    pub fn balance_proof(&self, chain: &str, public: &BalancePublic, proof: &Proof, oracle: &dyn ProofOracle) -> BalanceProofResult {
        let verified = oracle.verify(CircuitId::Balance, proof, &PublicInputs::Balance(public.clone()));
        BalanceProofResult { verified, nullifier_set_root: self.chain_nullifier_root(chain) }
    }

    fn chain_nullifier_root(&self, chain: &str) -> Hash32 {
        self.chain_nullifiers.get(chain).map(|tree| tree.root()).unwrap_or(Hash32::ZERO)
    }

    /// `route_payment` (spec.md 4.7): the most private route between two
    /// chains, rejected if it cannot clear `MIN_ROUTE_PRIVACY_SCORE`, plus
    /// one intermediate commitment per hop and a final commitment binding
    /// `amount` to `recipient_commit` — none of these reveal `amount` to an
    /// observer of the route alone, only to the holder of the matching
    /// randomness.
    pub fn route_payment(
        &self,
        source_chain: &str,
        target_chain: &str,
        amount: u128,
        recipient_commit: Hash32,
        rng: &mut impl rand::RngCore,
    ) -> Result<RoutedPayment, BridgeError> {
        self.require_supported(source_chain)?;
        self.require_supported(target_chain)?;
        let route = self.graph.find_route(source_chain, target_chain, RouteMode::MostPrivate)?;
        if route.privacy_score < MIN_ROUTE_PRIVACY_SCORE {
            return Err(BridgeError::NoPrivateRoute);
        }

        let hop_commitments = route
            .hops
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, hop)| {
                let mut preimage = Vec::new();
                preimage.extend_from_slice(&amount.to_le_bytes());
                preimage.extend_from_slice(&(i as u32).to_le_bytes());
                preimage.extend_from_slice(hop.as_bytes());
                commit(&preimage, Randomness::random(rng))
            })
            .collect();

        let mut recipient_preimage = Vec::new();
        recipient_preimage.extend_from_slice(&amount.to_le_bytes());
        recipient_preimage.extend_from_slice(recipient_commit.as_ref());
        let recipient_commitment = commit(&recipient_preimage, Randomness::random(rng));

        Ok(RoutedPayment { route, hop_commitments, recipient_commitment })
    }
}
