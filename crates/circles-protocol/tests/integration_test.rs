//! end-to-end walkthroughs of the six worked scenarios, each driven through
//! `Protocol`'s public surface only (no crate-internal shortcuts): a circle
//! funding round with a sealed-bid auction, a governance vote that actually
//! mutates state, a cross-chain transfer with mixing, a partial monthly
//! collection, and a standalone mix batch.

use circles_bridge::EdgeParams;
use circles_crypto::{commit, nullifier, Hash32, Randomness, Secret, SealKey};
use circles_lifecycle::{CircleParams, ProposalParams, ProposalScope, ProposalType};
use circles_membership::{IdentityCommitment, IdentitySecret};
use circles_merkle::{MerkleProof, MerkleTree};
use circles_payments::CollectionParams;
use circles_protocol::{Protocol, ProtocolConfig, ProtocolError};
use circles_trust::{Tier, UNIT};
use circles_zk::circuits::bidding::{BidFairnessPublic, BidFairnessWitness, BidOpening, BidRangePublic, BidRangeWitness};
use circles_zk::circuits::bridge::{
    BalancePublic, BalanceWitness, TransferPublic, TransferWitness, WalletOwnershipPublic, WalletOwnershipWitness,
};
use circles_zk::circuits::governance::{VoteValidityPublic, VoteValidityWitness};
use circles_zk::circuits::membership::{MembershipPublic, MembershipWitness};
use circles_zk::{CircuitId, DeterministicOracle, Proof, ProofOracle, PublicInputs, Witness};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn protocol(seed: u64) -> Protocol<DeterministicOracle, ChaCha20Rng> {
    Protocol::new(ProtocolConfig::default(), ChaCha20Rng::seed_from_u64(seed), DeterministicOracle)
}

fn identity(byte: u8) -> (IdentitySecret, Hash32) {
    let secret = IdentitySecret::from_seed([byte; 32]);
    let ic = secret.commitment().as_hash();
    (secret, ic)
}

fn merkle_proof_for(leaves: &[Hash32], leaf: &Hash32) -> (Hash32, MerkleProof) {
    let tree = MerkleTree::from_leaves(leaves.to_vec());
    let proof = tree.proof(leaf).expect("leaf present in tree");
    (tree.root(), proof)
}

fn membership_proof(oracle: &DeterministicOracle, leaves: &[Hash32], leaf: Hash32, root: Hash32) -> (MembershipPublic, Proof) {
    let (_, merkle_proof) = merkle_proof_for(leaves, &leaf);
    let public = MembershipPublic { leaf, root };
    let witness = MembershipWitness { leaf, merkle_proof };
    let proof = oracle.prove(CircuitId::Membership, &Witness::Membership(witness), &PublicInputs::Membership(public.clone())).unwrap();
    (public, proof)
}

/// a proof of `ic`'s inclusion in the facade's global identity registry, as
/// `create_circle`/`join_circle` require (spec.md 4.4). `ic` must already be
/// registered via `register_member`.
fn registry_membership_proof(
    oracle: &DeterministicOracle,
    p: &Protocol<DeterministicOracle, ChaCha20Rng>,
    ic: Hash32,
) -> (MembershipPublic, Proof) {
    let idc = IdentityCommitment::from(ic);
    let root = p.membership().registry_root();
    let merkle_proof = p.membership().registry_proof(&idc).expect("ic registered");
    let leaf = idc.as_hash();
    let public = MembershipPublic { leaf, root };
    let witness = MembershipWitness { leaf, merkle_proof };
    let proof = oracle.prove(CircuitId::Membership, &Witness::Membership(witness), &PublicInputs::Membership(public.clone())).unwrap();
    (public, proof)
}

/// scenario 1 (spec.md 8): a circle of up to 5 members runs a 1-unit
/// monthly round and a sealed-bid auction with three distinct bids; the
/// lowest discount amount wins and the result's integrity holds.
#[test]
fn scenario_1_circle_and_auction_pick_the_unique_minimum_bidder() {
    let oracle = DeterministicOracle;
    let mut p = protocol(1);

    let members = [
        (identity(1), 850u32),
        (identity(2), 650u32),
        (identity(3), 720u32),
    ];

    let creator_score = 850u32;
    let (_, creator_ic) = identity(0);
    p.register_member(IdentityCommitment::from(creator_ic), creator_score, UNIT, 1);
    let (creator_membership_public, creator_membership_proof) = registry_membership_proof(&oracle, &p, creator_ic);
    let circle_id = p
        .create_circle(
            creator_membership_public,
            &creator_membership_proof,
            creator_score,
            CircleParams {
                max_members: 5,
                monthly_amount: UNIT,
                total_rounds: 4,
                interest_rate_bp: 200,
                stake_requirement: UNIT,
            },
            1,
            b"scenario1",
        )
        .unwrap();

    for ((_, ic), score) in &members {
        p.register_member(IdentityCommitment::from(*ic), *score, UNIT, 1);
        let (membership_public, membership_proof) = registry_membership_proof(&oracle, &p, *ic);
        p.join_circle(circle_id, membership_public, &membership_proof, IdentityCommitment::from(*ic), UNIT).unwrap();
    }

    let eligible_root = p.circles().get(&circle_id).unwrap().membership_root;
    let leaves: Vec<Hash32> = members.iter().map(|((_, ic), _)| *ic).collect();

    let round = 1u64;
    let min_bid = 1u128;
    let max_bid = 10u128.pow(17);
    let auction_id = p.start_auction_round(circle_id, round, eligible_root, min_bid, max_bid, 72, 1000);

    let amounts = [40u128 * 10u128.pow(15), 30 * 10u128.pow(15), 50 * 10u128.pow(15)];
    let mut rng = ChaCha20Rng::seed_from_u64(100);
    let mut openings = Vec::new();

    for (i, (((secret, ic), _), amount)) in members.iter().zip(amounts.into_iter()).enumerate() {
        let (membership_public, membership_proof) = membership_proof(&oracle, &leaves, *ic, eligible_root);

        let randomness = Randomness::random(&mut rng);
        let commitment = commit(&amount.to_le_bytes(), randomness);
        let bid_range_public = BidRangePublic { commitment, min: min_bid, max: max_bid };
        let bid_range_proof = oracle
            .prove(CircuitId::BidRange, &Witness::BidRange(BidRangeWitness { value: amount, randomness }), &PublicInputs::BidRange(bid_range_public.clone()))
            .unwrap();

        let bid_secret = Secret(secret.commitment().as_hash().to_bytes());
        let bid_nullifier = nullifier(&bid_secret, b"bid", &[circle_id.as_ref(), &round.to_le_bytes()]);
        let bid_fairness_public = BidFairnessPublic { commitment, nullifier: bid_nullifier, circle_id, round };
        let bid_fairness_proof = oracle
            .prove(
                CircuitId::BidFairness,
                &Witness::BidFairness(BidFairnessWitness { secret: bid_secret, amount, commitment_randomness: randomness }),
                &PublicInputs::BidFairness(bid_fairness_public.clone()),
            )
            .unwrap();

        let bidder_commitment = circles_lifecycle::bidder_commitment(ic, &circle_id, round);

        p.submit_bid(
            auction_id,
            membership_public,
            &membership_proof,
            bid_range_public,
            &bid_range_proof,
            bid_fairness_public,
            &bid_fairness_proof,
            bidder_commitment,
            1001 + i as u64,
        )
        .unwrap();

        openings.push(BidOpening { commitment, amount, randomness });
    }

    let result = p.finalize_auction(auction_id, &openings, 10_000_000).unwrap();
    assert_eq!(result.total_bids, 3);
    assert!(result.fairness_verified);
    assert!(p.verify_auction_integrity(&auction_id));

    let key = SealKey::derive(&result.winner_commitment, b"circles.auction.payout.v1");
    let plaintext = circles_crypto::open(&key, &result.winning_amount_ciphertext);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&plaintext);
    assert_eq!(u128::from_le_bytes(bytes), 30 * 10u128.pow(15));
}

/// scenario 2 (spec.md 8): resubmitting the same bid nullifier is rejected.
#[test]
fn scenario_2_double_bid_is_rejected() {
    let oracle = DeterministicOracle;
    let mut p = protocol(2);

    let (secret, ic) = identity(9);
    let (_, circle_creator_ic) = identity(8);
    p.register_member(IdentityCommitment::from(circle_creator_ic), 850, UNIT, 1);
    let (creator_membership_public, creator_membership_proof) = registry_membership_proof(&oracle, &p, circle_creator_ic);
    let circle_id = p
        .create_circle(
            creator_membership_public,
            &creator_membership_proof,
            850,
            CircleParams { max_members: 4, monthly_amount: UNIT, total_rounds: 4, interest_rate_bp: 200, stake_requirement: UNIT },
            1,
            b"scenario2",
        )
        .unwrap();
    p.register_member(IdentityCommitment::from(ic), 850, UNIT, 1);
    let (membership_public, membership_proof) = registry_membership_proof(&oracle, &p, ic);
    p.join_circle(circle_id, membership_public, &membership_proof, IdentityCommitment::from(ic), UNIT).unwrap();

    let eligible_root = p.circles().get(&circle_id).unwrap().membership_root;
    let leaves = [ic];
    let round = 1u64;
    let auction_id = p.start_auction_round(circle_id, round, eligible_root, 1, 10u128.pow(17), 72, 1000);

    let (membership_public, membership_proof) = membership_proof(&oracle, &leaves, ic, eligible_root);
    let mut rng = ChaCha20Rng::seed_from_u64(200);
    let amount = 10u128 * 10u128.pow(15);
    let randomness = Randomness::random(&mut rng);
    let commitment = commit(&amount.to_le_bytes(), randomness);
    let bid_range_public = BidRangePublic { commitment, min: 1, max: 10u128.pow(17) };
    let bid_range_proof = oracle
        .prove(CircuitId::BidRange, &Witness::BidRange(BidRangeWitness { value: amount, randomness }), &PublicInputs::BidRange(bid_range_public.clone()))
        .unwrap();

    let bid_secret = Secret(secret.commitment().as_hash().to_bytes());
    let bid_nullifier = nullifier(&bid_secret, b"bid", &[circle_id.as_ref(), &round.to_le_bytes()]);
    let bid_fairness_public = BidFairnessPublic { commitment, nullifier: bid_nullifier, circle_id, round };
    let bid_fairness_proof = oracle
        .prove(
            CircuitId::BidFairness,
            &Witness::BidFairness(BidFairnessWitness { secret: bid_secret, amount, commitment_randomness: randomness }),
            &PublicInputs::BidFairness(bid_fairness_public.clone()),
        )
        .unwrap();
    let bidder_commitment = circles_lifecycle::bidder_commitment(&ic, &circle_id, round);

    p.submit_bid(
        auction_id,
        membership_public.clone(),
        &membership_proof,
        bid_range_public.clone(),
        &bid_range_proof,
        bid_fairness_public.clone(),
        &bid_fairness_proof,
        bidder_commitment,
        1001,
    )
    .unwrap();

    let second = p.submit_bid(
        auction_id,
        membership_public,
        &membership_proof,
        bid_range_public,
        &bid_range_proof,
        bid_fairness_public,
        &bid_fairness_proof,
        bidder_commitment,
        1002,
    );
    assert!(matches!(second, Err(ProtocolError::Lifecycle(circles_lifecycle::LifecycleError::NullifierReused(n))) if n == bid_nullifier));
}

/// scenario 3 (spec.md 8): an `INTEREST_RATE` proposal passes with 80%
/// participation and, on execute, actually rewrites the target circle's
/// `interest_rate_bp`.
#[test]
fn scenario_3_governance_proposal_passes_and_executes_its_side_effect() {
    let oracle = DeterministicOracle;
    let mut p = protocol(3);

    let (_, circle_creator_ic) = identity(0);
    p.register_member(IdentityCommitment::from(circle_creator_ic), 850, UNIT, 1);
    let (creator_membership_public, creator_membership_proof) = registry_membership_proof(&oracle, &p, circle_creator_ic);
    let circle_id = p
        .create_circle(
            creator_membership_public,
            &creator_membership_proof,
            850,
            CircleParams { max_members: 4, monthly_amount: UNIT, total_rounds: 4, interest_rate_bp: 200, stake_requirement: UNIT },
            1,
            b"scenario3",
        )
        .unwrap();

    let creator_ic = identity(1).1;
    let proposal_id = p
        .create_proposal(
            creator_ic,
            850,
            ProposalParams {
                proposal_type: ProposalType::InterestRate,
                scope: ProposalScope::ProtocolWide,
                encrypted_payload: vec![1, 2, 3],
                voting_period_secs: 1000,
                quorum_pct: 60,
                min_trust_score: 400,
                eligible_count: 5,
            },
            0,
            b"scenario3",
        )
        .unwrap();

    let voters = [(10u8, 850u32, true), (11, 720, true), (12, 650, false), (13, 480, true)];
    let voter_ics: Vec<Hash32> = voters.iter().map(|(b, _, _)| identity(*b).1).collect();

    for (byte, score, choice) in voters {
        let (secret, voter_ic) = identity(byte);
        let (root, merkle_proof) = merkle_proof_for(&voter_ics, &voter_ic);

        let vote_secret = Secret(secret.commitment().as_hash().to_bytes());
        let vote_nullifier = nullifier(&vote_secret, b"vote", &[proposal_id.as_ref()]);
        let mut rng = ChaCha20Rng::seed_from_u64(byte as u64);
        let randomness = Randomness::random(&mut rng);
        let vote_commit = commit(&[choice as u8], randomness);

        let public = VoteValidityPublic { root, nullifier: vote_nullifier, proposal_id, min_trust_score: 400, vote_commit };
        let witness = VoteValidityWitness { voter_ic, merkle_proof, secret: vote_secret, trust_score: score, choice, randomness };
        let proof = oracle.prove(CircuitId::VoteValidity, &Witness::VoteValidity(witness), &PublicInputs::VoteValidity(public.clone())).unwrap();

        p.cast_vote(public, &proof, score, choice, 10).unwrap();
    }

    let tally = p.tally_proposal(proposal_id, 1001).unwrap();
    assert_eq!(tally.yes_weight, 850 + 720 + 480);
    assert_eq!(tally.no_weight, 650);
    assert_eq!(tally.participation_pct, 80);
    assert!(tally.passed);

    p.execute_proposal(proposal_id, Some(circle_id), Some(350), 1002).unwrap();
    assert_eq!(p.circles().get(&circle_id).unwrap().interest_rate_bp, 350);
}

/// scenario 4 (spec.md 8): a routed, mixed cross-chain transfer settles
/// with an ETA that accounts for both the route's delay and the caller's
/// requested mixing delay, and its nullifier cannot be replayed.
#[test]
fn scenario_4_cross_chain_transfer_with_mixing_is_not_replayable() {
    let mut p = protocol(4);
    p.add_supported_chain("ethereum");
    p.add_supported_chain("midnight");
    p.connect_chains("ethereum", "midnight", EdgeParams { delay_seconds: 45, fee_bp: 5, privacy_bonus: 60 });

    let mut rng = ChaCha20Rng::seed_from_u64(400);
    let sender_secret = Secret([7u8; 32]);
    let amount = 5u128 * UNIT;
    let recipient_commit = Hash32::from_bytes([8u8; 32]);
    let randomness = Randomness::random(&mut rng);
    let transfer_nullifier = nullifier(&sender_secret, b"transfer", &[b"ethereum", b"midnight"]);
    let mut preimage = Vec::new();
    preimage.extend_from_slice(&amount.to_le_bytes());
    preimage.extend_from_slice(recipient_commit.as_ref());
    let commitment = commit(&preimage, randomness);

    let public = TransferPublic { nullifier: transfer_nullifier, commitment, source_chain: "ethereum".to_string(), target_chain: "midnight".to_string() };
    let witness = TransferWitness { sender_secret, amount, recipient_commit, randomness };
    let proof = DeterministicOracle
        .prove(CircuitId::Transfer, &Witness::Transfer(witness), &PublicInputs::Transfer(public.clone()))
        .unwrap();

    let mixing_delay = 120u64;
    let now = 5000u64;
    let transfer = p.initiate_transfer(public.clone(), &proof, mixing_delay, sender_secret, amount, randomness, now).unwrap();
    assert!(transfer.mixed);
    assert_eq!(transfer.nullifier, transfer_nullifier);
    assert_eq!(transfer.eta_seconds, now + 45 + mixing_delay);
    assert_eq!(p.mix_queue_len("ethereum", "midnight"), 1, "a mixed transfer must actually enqueue its leg in the mixer");

    let replay = p.initiate_transfer(public, &proof, mixing_delay, sender_secret, amount, randomness, now);
    assert!(matches!(replay, Err(ProtocolError::Bridge(circles_bridge::BridgeError::NullifierReused(n))) if n == transfer_nullifier));
    assert_eq!(p.mix_queue_len("ethereum", "midnight"), 1, "a rejected replay must not enqueue a second leg");
}

/// scenario 5 (spec.md 8): a contributor with 0.3 units against a 1-unit
/// requirement, with partial payments allowed, settles short by exactly
/// 0.7 units and gets a week's grace before the next attempt.
#[test]
fn scenario_5_partial_payment_records_the_shortfall() {
    let mut p = protocol(5);
    p.add_supported_chain("ethereum");

    let ic = identity(7).1;
    let secret = Secret([3u8; 32]);
    let ownership_tag = nullifier(&secret, b"wallet_ownership", &[ic.as_ref(), b"ethereum"]);
    let ownership_public = WalletOwnershipPublic { ic, chain: "ethereum".to_string(), ownership_tag };
    let ownership_proof = DeterministicOracle
        .prove(CircuitId::WalletOwnership, &Witness::WalletOwnership(WalletOwnershipWitness { secret }), &PublicInputs::WalletOwnership(ownership_public.clone()))
        .unwrap();

    let mut rng = ChaCha20Rng::seed_from_u64(500);
    let balance = 3 * UNIT / 10; // 0.3u
    let randomness = Randomness::random(&mut rng);
    let balance_public = BalancePublic { balance_commit: commit(&balance.to_le_bytes(), randomness), ceiling: UNIT * 2 };
    let balance_proof = DeterministicOracle
        .prove(CircuitId::Balance, &Witness::Balance(BalanceWitness { balance, randomness }), &PublicInputs::Balance(balance_public.clone()))
        .unwrap();

    p.connect_wallet(ic, ownership_public, &ownership_proof, balance_public, &balance_proof, balance, randomness, secret, 40, 0)
        .unwrap();

    let params = CollectionParams {
        contributor: ic,
        circle_id: Hash32::from_bytes([9u8; 32]),
        round: 1,
        required_amount: UNIT,
        recipient_commit: Hash32::from_bytes([2u8; 32]),
        allow_partial: true,
        settlement_chain: "polygon".to_string(),
    };
    let attempt = p.collect_payment(&params, 0).unwrap();
    match attempt.outcome {
        circles_payments::CollectionOutcome::PartialSuccess { total_collected, shortfall, next_payment_due } => {
            assert_eq!(total_collected, balance);
            assert_eq!(shortfall, UNIT - balance);
            assert_eq!(next_payment_due, circles_payments::PARTIAL_GRACE_SECS);
        }
        other => panic!("expected a partial success, got {other:?}"),
    }
}

/// scenario 6 (spec.md 8): five equal-denomination legs mixed with a
/// declared 25-participant anonymity set yield a batch whose privacy score
/// clears 80 and whose fee is exactly the basis-point cut of the total.
#[test]
fn scenario_6_mix_batch_clears_the_anonymity_target() {
    let mut p = protocol(6);
    let mut rng = ChaCha20Rng::seed_from_u64(600);

    let value = 10_000u128;
    for tag in 0..5u8 {
        let randomness = Randomness::random(&mut rng);
        p.enqueue_mix("ethereum", "polygon", Secret([tag + 1; 32]), value, randomness).unwrap();
    }
    assert_eq!(p.mix_queue_len("ethereum", "polygon"), 5);

    let settlement = p.execute_mix("ethereum", "polygon", vec![4, 3, 2, 1, 0], 25).unwrap();
    assert_eq!(settlement.input_commitments.len(), 5);
    assert_eq!(settlement.output_commitments.len(), 5);
    assert_eq!(settlement.nullifiers.len(), 5);
    assert_eq!(settlement.fee, 5 * (value * circles_bridge::MIX_FEE_BP / 10_000));
    assert!(settlement.privacy_score >= 80, "privacy_score was {}", settlement.privacy_score);
}
