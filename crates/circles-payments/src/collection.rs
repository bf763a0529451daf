//! monthly collection planning (C12, spec.md 4.8)

use circles_crypto::{commit, hash, Hash32, Randomness};
use circles_bridge::PrivacyBridge;
use circles_zk::circuits::bridge::TransferPublic;
use circles_zk::ProofOracle;

use crate::error::PaymentError;
use crate::wallet::WalletRegistry;

/// partial payments below this fraction of `required_amount` are rejected
/// outright rather than recorded as a shortfall.
pub const MIN_PARTIAL_FRACTION_PCT: u128 = 10;
/// grace period granted after a recorded partial payment.
pub const PARTIAL_GRACE_SECS: u64 = 7 * 24 * 3600;
/// fixed mixing delay every collection transfer routes through.
pub const COLLECTION_MIXING_DELAY_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct CollectionParams {
    pub contributor: Hash32,
    pub circle_id: Hash32,
    pub round: u64,
    pub required_amount: u128,
    pub recipient_commit: Hash32,
    pub allow_partial: bool,
    /// the circle's settlement chain; collected wallets transfer here over
    /// the bridge, each through its own mixed/routed transfer.
    pub settlement_chain: String,
}

/// status of a single `collect` call, as tracked for audit/idempotency
/// purposes (spec.md 3's `CollectionAttempt`); a call that errors is never
/// wrapped in one since the caller sees the error directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptStatus {
    Succeeded,
    PartiallySucceeded,
}

#[derive(Clone, Debug)]
pub struct EncryptedPaymentRecord {
    pub record_id: Hash32,
    pub ciphertext_amount: Vec<u8>,
    pub ciphertext_breakdown: Vec<u8>,
    pub anonymity_score: u32,
    pub settlement_proof: Hash32,
    pub payment_hash: Hash32,
}

#[derive(Clone, Debug)]
pub enum CollectionOutcome {
    Success { record: EncryptedPaymentRecord },
    PartialSuccess { total_collected: u128, shortfall: u128, next_payment_due: u64 },
}

#[derive(Clone, Debug)]
pub struct CollectionAttempt {
    pub attempt_id: Hash32,
    pub status: AttemptStatus,
    pub outcome: CollectionOutcome,
}

/// `collect` (spec.md 4.8, 6). `key` seals the payment record so that only
/// a holder of the derived key can later read it back via `history`.
pub fn collect(
    wallets: &WalletRegistry,
    bridge: &mut PrivacyBridge,
    params: &CollectionParams,
    key: &circles_crypto::SealKey,
    now: u64,
    rng: &mut impl rand::RngCore,
    oracle: &dyn ProofOracle,
) -> Result<CollectionAttempt, PaymentError> {
    let mut id_bytes = Vec::new();
    id_bytes.extend_from_slice(params.contributor.as_ref());
    id_bytes.extend_from_slice(params.circle_id.as_ref());
    id_bytes.extend_from_slice(&params.round.to_le_bytes());
    id_bytes.extend_from_slice(&now.to_le_bytes());
    let attempt_id = hash(b"circles.collection_attempt.v1", &id_bytes);

    let connections = wallets.connections_for(&params.contributor);
    if connections.is_empty() {
        return Err(PaymentError::NoWalletForChain("<any>".to_string()));
    }

    let total: u128 = connections.iter().map(|c| c.balance).sum();

    if total < params.required_amount {
        if !params.allow_partial {
            return Err(PaymentError::InsufficientBalance { collected: total, required: params.required_amount });
        }
        if total * 100 / params.required_amount.max(1) < MIN_PARTIAL_FRACTION_PCT {
            return Err(PaymentError::BelowPartialThreshold { collected: total, required: params.required_amount });
        }
        tracing::warn!(contributor = %params.contributor, total, required = params.required_amount, "partial collection recorded");
        return Ok(CollectionAttempt {
            attempt_id,
            status: AttemptStatus::PartiallySucceeded,
            outcome: CollectionOutcome::PartialSuccess {
                total_collected: total,
                shortfall: params.required_amount - total,
                next_payment_due: now + PARTIAL_GRACE_SECS,
            },
        });
    }

    // descending (privacy_score, balance) order, fill required_amount greedily
    let mut ranked = connections;
    ranked.sort_by(|a, b| (b.privacy_score, b.balance).cmp(&(a.privacy_score, a.balance)));

    let mut remaining = params.required_amount;
    let mut anonymity_set = 0usize;
    let mut multi_hop = false;
    let mut transfer_ids = Vec::new();
    for conn in ranked {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(conn.balance);
        let randomness = Randomness::random(rng);
        let mix_randomness = Randomness::random(rng);
        let mut preimage = Vec::new();
        preimage.extend_from_slice(&take.to_le_bytes());
        preimage.extend_from_slice(params.recipient_commit.as_ref());
        let commitment = commit(&preimage, randomness);
        let nullifier = circles_crypto::nullifier(
            &conn.transfer_secret,
            b"transfer",
            &[conn.chain.as_bytes(), params.settlement_chain.as_bytes()],
        );
        let public = TransferPublic {
            nullifier,
            commitment,
            source_chain: conn.chain.clone(),
            target_chain: params.settlement_chain.clone(),
        };
        let witness = circles_zk::circuits::bridge::TransferWitness {
            sender_secret: conn.transfer_secret,
            amount: take,
            recipient_commit: params.recipient_commit,
            randomness,
        };
        let proof = oracle
            .prove(
                circles_zk::CircuitId::Transfer,
                &circles_zk::Witness::Transfer(witness),
                &circles_zk::PublicInputs::Transfer(public.clone()),
            )
            .map_err(|_| PaymentError::Bridge(circles_bridge::BridgeError::ProofInvalid("transfer")))?;

        let transfer = bridge.initiate_transfer(
            public,
            &proof,
            COLLECTION_MIXING_DELAY_SECS,
            conn.transfer_secret,
            take,
            mix_randomness,
            oracle,
            rng,
            now,
        )?;
        if transfer.hops > 2 {
            multi_hop = true;
        }
        transfer_ids.push(transfer.transfer_id);
        anonymity_set += 1;
        remaining -= take;
    }

    let anonymity_score = (5 * anonymity_set as u32).min(100)
        + if anonymity_set > 1 { 5 } else { 0 }
        + if multi_hop { 3 } else { 0 };
    let anonymity_score = anonymity_score.min(100);

    let mut settlement_bytes = Vec::new();
    for id in &transfer_ids {
        settlement_bytes.extend_from_slice(id.as_ref());
    }
    let settlement_proof = hash(b"circles.settlement.v1", &settlement_bytes);

    let mut payment_bytes = Vec::new();
    payment_bytes.extend_from_slice(params.circle_id.as_ref());
    payment_bytes.extend_from_slice(&params.round.to_le_bytes());
    payment_bytes.extend_from_slice(settlement_proof.as_ref());
    let payment_hash = hash(b"circles.payment_hash.v1", &payment_bytes);

    let record_id = hash(b"circles.payment_record.v1", payment_hash.as_ref());
    let ciphertext_amount = circles_crypto::seal(key, &params.required_amount.to_le_bytes());
    let mut breakdown_bytes = Vec::new();
    breakdown_bytes.extend_from_slice(&(transfer_ids.len() as u64).to_le_bytes());
    for id in &transfer_ids {
        breakdown_bytes.extend_from_slice(id.as_ref());
    }
    let ciphertext_breakdown = circles_crypto::seal(key, &breakdown_bytes);

    let record = EncryptedPaymentRecord {
        record_id,
        ciphertext_amount,
        ciphertext_breakdown,
        anonymity_score,
        settlement_proof,
        payment_hash,
    };
    tracing::info!(payment = %payment_hash, anonymity_score, "collection settled");
    Ok(CollectionAttempt { attempt_id, status: AttemptStatus::Succeeded, outcome: CollectionOutcome::Success { record } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use circles_crypto::{nullifier, Secret};
    use circles_zk::circuits::bridge::{BalancePublic, BalanceWitness, WalletOwnershipPublic, WalletOwnershipWitness};
    use circles_zk::{CircuitId, DeterministicOracle, PublicInputs, Witness};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use crate::wallet::WalletRegistry;

    fn connect(registry: &mut WalletRegistry, ic: Hash32, chain: &str, balance: u128, rng: &mut ChaCha20Rng) {
        let secret = Secret([balance as u8; 32]);
        let ownership_tag = nullifier(&secret, b"wallet_ownership", &[ic.as_ref(), chain.as_bytes()]);
        let ownership_public = WalletOwnershipPublic { ic, chain: chain.to_string(), ownership_tag };
        let ownership_proof = DeterministicOracle
            .prove(
                CircuitId::WalletOwnership,
                &Witness::WalletOwnership(WalletOwnershipWitness { secret }),
                &PublicInputs::WalletOwnership(ownership_public.clone()),
            )
            .unwrap();
        let randomness = Randomness::random(rng);
        let balance_public = BalancePublic { balance_commit: commit(&balance.to_le_bytes(), randomness), ceiling: u128::MAX / 2 };
        let balance_proof = DeterministicOracle
            .prove(
                CircuitId::Balance,
                &Witness::Balance(BalanceWitness { balance, randomness }),
                &PublicInputs::Balance(balance_public.clone()),
            )
            .unwrap();
        registry
            .connect_wallet(ic, ownership_public, &ownership_proof, balance_public, &balance_proof, balance, randomness, secret, 40, 0, &DeterministicOracle)
            .unwrap();
    }

    #[test]
    fn partial_payment_below_threshold_and_above_both() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let ic = Hash32::from_bytes([7u8; 32]);
        let mut wallets = WalletRegistry::new();
        connect(&mut wallets, ic, "ethereum", 300_000_000_000_000_000u128, &mut rng);

        let mut bridge = PrivacyBridge::new(1);
        bridge.add_supported_chain("ethereum");

        let params = CollectionParams {
            contributor: ic,
            circle_id: Hash32::from_bytes([9u8; 32]),
            round: 1,
            required_amount: 1_000_000_000_000_000_000u128,
            recipient_commit: Hash32::from_bytes([2u8; 32]),
            allow_partial: true,
            settlement_chain: "polygon".to_string(),
        };
        let key = circles_crypto::SealKey::from_bytes([0u8; 32]);
        let attempt = collect(&wallets, &mut bridge, &params, &key, 0, &mut rng, &DeterministicOracle).unwrap();
        match attempt.outcome {
            CollectionOutcome::PartialSuccess { total_collected, shortfall, next_payment_due } => {
                assert_eq!(total_collected, 300_000_000_000_000_000u128);
                assert_eq!(shortfall, 700_000_000_000_000_000u128);
                assert_eq!(next_payment_due, PARTIAL_GRACE_SECS);
            }
            _ => panic!("expected partial success"),
        }
    }

    #[test]
    fn insufficient_balance_without_partial_flag_fails() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let ic = Hash32::from_bytes([7u8; 32]);
        let mut wallets = WalletRegistry::new();
        connect(&mut wallets, ic, "ethereum", 1, &mut rng);
        let mut bridge = PrivacyBridge::new(1);
        bridge.add_supported_chain("ethereum");
        let params = CollectionParams {
            contributor: ic,
            circle_id: Hash32::from_bytes([9u8; 32]),
            round: 1,
            required_amount: 1000,
            recipient_commit: Hash32::from_bytes([2u8; 32]),
            allow_partial: false,
            settlement_chain: "polygon".to_string(),
        };
        let key = circles_crypto::SealKey::from_bytes([0u8; 32]);
        assert!(matches!(
            collect(&wallets, &mut bridge, &params, &key, 0, &mut rng, &DeterministicOracle),
            Err(PaymentError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn full_collection_succeeds_and_seals_a_record() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let ic = Hash32::from_bytes([7u8; 32]);
        let mut wallets = WalletRegistry::new();
        connect(&mut wallets, ic, "ethereum", 600, &mut rng);
        connect(&mut wallets, ic, "arbitrum", 600, &mut rng);

        let mut bridge = PrivacyBridge::new(1);
        bridge.add_supported_chain("ethereum");
        bridge.add_supported_chain("arbitrum");
        bridge.add_supported_chain("polygon");
        bridge.graph.connect("ethereum", "polygon", circles_bridge::EdgeParams { delay_seconds: 60, fee_bp: 5, privacy_bonus: 20 });
        bridge.graph.connect("arbitrum", "polygon", circles_bridge::EdgeParams { delay_seconds: 30, fee_bp: 3, privacy_bonus: 20 });

        let params = CollectionParams {
            contributor: ic,
            circle_id: Hash32::from_bytes([9u8; 32]),
            round: 1,
            required_amount: 1000,
            recipient_commit: Hash32::from_bytes([2u8; 32]),
            allow_partial: false,
            settlement_chain: "polygon".to_string(),
        };
        let key = circles_crypto::SealKey::from_bytes([1u8; 32]);
        let attempt = collect(&wallets, &mut bridge, &params, &key, 0, &mut rng, &DeterministicOracle).unwrap();
        match attempt.outcome {
            CollectionOutcome::Success { record } => {
                assert!(record.anonymity_score >= 10);
                assert_ne!(record.ciphertext_amount, 1000u128.to_le_bytes().to_vec());
            }
            _ => panic!("expected success"),
        }
    }
}
