//! the uniform `prove`/`verify` facade (spec.md 4.2)
//!
//! `circles-protocol` and every sub-engine talk to proofs only through
//! `ProofOracle`, never through a circuit-specific type — this is the one
//! piece the spec asks to be generalized relative to the teacher's
//! per-proof-type structs (`SpendProof`, `OutputProof`, ...). An injected
//! trait also means the facade is testable without any real SNARK backend
//! and a conforming implementation can later swap in a real verifier
//! without touching call sites.

use crate::circuit::CircuitId;
use crate::circuits::bidding::{
    bid_fairness_binding_tag, bid_fairness_relation, bid_range_binding_tag, bid_range_relation,
    payment_binding_tag, payment_relation, winner_selection_binding_tag, winner_selection_relation,
    BidFairnessPublic, BidFairnessWitness, BidRangePublic, BidRangeWitness, PaymentPublic,
    PaymentWitness, WinnerSelectionPublic, WinnerSelectionWitness,
};
use crate::circuits::bridge::{
    balance_binding_tag, balance_relation, mix_binding_tag, mix_relation, route_binding_tag,
    route_relation, transfer_binding_tag, transfer_relation, wallet_ownership_binding_tag,
    wallet_ownership_relation, BalancePublic, BalanceWitness, MixPublic, MixWitness, RoutePublic,
    RouteWitness, TransferPublic, TransferWitness, WalletOwnershipPublic, WalletOwnershipWitness,
};
use crate::circuits::governance::{
    vote_validity_binding_tag, vote_validity_relation, VoteValidityPublic, VoteValidityWitness,
};
use crate::circuits::membership::{binding_tag as membership_binding_tag, relation as membership_relation, MembershipPublic, MembershipWitness};
use crate::circuits::risk::{
    default_detection_binding_tag, default_detection_relation, insurance_binding_tag,
    insurance_relation, liquidation_binding_tag, liquidation_relation, penalty_binding_tag,
    penalty_relation, stake_adequacy_binding_tag, stake_adequacy_relation, DefaultDetectionPublic,
    DefaultDetectionWitness, InsurancePublic, InsuranceWitness, LiquidationPublic, LiquidationWitness,
    PenaltyPublic, PenaltyWitness, StakeAdequacyPublic, StakeAdequacyWitness,
};
use crate::circuits::trust::{trust_score_binding_tag, trust_score_relation, TrustScorePublic, TrustScoreWitness};
use crate::error::ZkError;
use crate::proof::Proof;

/// the hidden half of a circuit's relation. one variant per `CircuitId`.
#[derive(Clone, Debug)]
pub enum Witness {
    Membership(MembershipWitness),
    BidRange(BidRangeWitness),
    BidFairness(BidFairnessWitness),
    WinnerSelection(WinnerSelectionWitness),
    Payment(PaymentWitness),
    TrustScore(TrustScoreWitness),
    VoteValidity(VoteValidityWitness),
    Transfer(TransferWitness),
    Balance(BalanceWitness),
    Mix(MixWitness),
    WalletOwnership(WalletOwnershipWitness),
    Route(RouteWitness),
    AnonymityPoolMembership(MembershipWitness),
    StakeAdequacy(StakeAdequacyWitness),
    DefaultDetection(DefaultDetectionWitness),
    Liquidation(LiquidationWitness),
    Penalty(PenaltyWitness),
    Insurance(InsuranceWitness),
}

/// the public half of a circuit's relation, echoed back by `verify`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PublicInputs {
    Membership(MembershipPublic),
    BidRange(BidRangePublic),
    BidFairness(BidFairnessPublic),
    WinnerSelection(WinnerSelectionPublic),
    Payment(PaymentPublic),
    TrustScore(TrustScorePublic),
    VoteValidity(VoteValidityPublic),
    Transfer(TransferPublic),
    Balance(BalancePublic),
    Mix(MixPublic),
    WalletOwnership(WalletOwnershipPublic),
    Route(RoutePublic),
    AnonymityPoolMembership(MembershipPublic),
    StakeAdequacy(StakeAdequacyPublic),
    DefaultDetection(DefaultDetectionPublic),
    Liquidation(LiquidationPublic),
    Penalty(PenaltyPublic),
    Insurance(InsurancePublic),
}

/// the circuit name a `(Witness, PublicInputs)` pair declares itself for.
/// used to check the caller's `circuit` argument against what they actually
/// supplied.
fn declared_circuit(witness: &Witness) -> CircuitId {
    match witness {
        Witness::Membership(_) => CircuitId::Membership,
        Witness::BidRange(_) => CircuitId::BidRange,
        Witness::BidFairness(_) => CircuitId::BidFairness,
        Witness::WinnerSelection(_) => CircuitId::WinnerSelection,
        Witness::Payment(_) => CircuitId::Payment,
        Witness::TrustScore(_) => CircuitId::TrustScore,
        Witness::VoteValidity(_) => CircuitId::VoteValidity,
        Witness::Transfer(_) => CircuitId::Transfer,
        Witness::Balance(_) => CircuitId::Balance,
        Witness::Mix(_) => CircuitId::Mix,
        Witness::WalletOwnership(_) => CircuitId::WalletOwnership,
        Witness::Route(_) => CircuitId::Route,
        Witness::AnonymityPoolMembership(_) => CircuitId::AnonymityPoolMembership,
        Witness::StakeAdequacy(_) => CircuitId::StakeAdequacy,
        Witness::DefaultDetection(_) => CircuitId::DefaultDetection,
        Witness::Liquidation(_) => CircuitId::Liquidation,
        Witness::Penalty(_) => CircuitId::Penalty,
        Witness::Insurance(_) => CircuitId::Insurance,
    }
}

/// the uniform proving/verifying facade described in spec.md 4.2.
pub trait ProofOracle {
    fn prove(&self, circuit: CircuitId, witness: &Witness, public: &PublicInputs) -> Result<Proof, ZkError>;
    fn verify(&self, circuit: CircuitId, proof: &Proof, public: &PublicInputs) -> bool;
}

/// in-process deterministic oracle. Non-goal: the real SNARK system is an
/// abstract oracle (spec.md 1); this realizes that oracle's *interface*
/// with a relation checker that actually recomputes each circuit's relation
/// from the witness, per spec.md 9's redesign flags — no proof is ever
/// minted for a witness that fails its relation, and no permissive blob is
/// ever accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicOracle;

macro_rules! circuit_arm {
    ($circuit:expr, $witness:expr, $public:expr, $wvariant:path, $pvariant:path, $relation:path, $tag:path) => {
        match ($witness, $public) {
            ($wvariant(w), $pvariant(p)) => {
                if $relation(w, p) {
                    Ok(Proof::new($circuit, $tag($circuit, p)))
                } else {
                    Err(ZkError::RelationUnsatisfied($circuit))
                }
            }
            _ => Err(ZkError::CircuitMismatch($circuit)),
        }
    };
}

impl ProofOracle for DeterministicOracle {
    fn prove(&self, circuit: CircuitId, witness: &Witness, public: &PublicInputs) -> Result<Proof, ZkError> {
        if declared_circuit(witness) != circuit {
            return Err(ZkError::CircuitMismatch(circuit));
        }
        match circuit {
            CircuitId::Membership => circuit_arm!(
                circuit, witness, public, Witness::Membership, PublicInputs::Membership,
                membership_relation, membership_binding_tag
            ),
            CircuitId::AnonymityPoolMembership => circuit_arm!(
                circuit, witness, public, Witness::AnonymityPoolMembership, PublicInputs::AnonymityPoolMembership,
                membership_relation, membership_binding_tag
            ),
            CircuitId::BidRange => circuit_arm!(
                circuit, witness, public, Witness::BidRange, PublicInputs::BidRange,
                bid_range_relation, bid_range_binding_tag
            ),
            CircuitId::BidFairness => circuit_arm!(
                circuit, witness, public, Witness::BidFairness, PublicInputs::BidFairness,
                bid_fairness_relation, bid_fairness_binding_tag
            ),
            CircuitId::WinnerSelection => circuit_arm!(
                circuit, witness, public, Witness::WinnerSelection, PublicInputs::WinnerSelection,
                winner_selection_relation, winner_selection_binding_tag
            ),
            CircuitId::Payment => circuit_arm!(
                circuit, witness, public, Witness::Payment, PublicInputs::Payment,
                payment_relation, payment_binding_tag
            ),
            CircuitId::TrustScore => circuit_arm!(
                circuit, witness, public, Witness::TrustScore, PublicInputs::TrustScore,
                trust_score_relation, trust_score_binding_tag
            ),
            CircuitId::VoteValidity => circuit_arm!(
                circuit, witness, public, Witness::VoteValidity, PublicInputs::VoteValidity,
                vote_validity_relation, vote_validity_binding_tag
            ),
            CircuitId::Transfer => circuit_arm!(
                circuit, witness, public, Witness::Transfer, PublicInputs::Transfer,
                transfer_relation, transfer_binding_tag
            ),
            CircuitId::Balance => circuit_arm!(
                circuit, witness, public, Witness::Balance, PublicInputs::Balance,
                balance_relation, balance_binding_tag
            ),
            CircuitId::Mix => circuit_arm!(
                circuit, witness, public, Witness::Mix, PublicInputs::Mix,
                mix_relation, mix_binding_tag
            ),
            CircuitId::WalletOwnership => circuit_arm!(
                circuit, witness, public, Witness::WalletOwnership, PublicInputs::WalletOwnership,
                wallet_ownership_relation, wallet_ownership_binding_tag
            ),
            CircuitId::Route => circuit_arm!(
                circuit, witness, public, Witness::Route, PublicInputs::Route,
                route_relation, route_binding_tag
            ),
            CircuitId::StakeAdequacy => circuit_arm!(
                circuit, witness, public, Witness::StakeAdequacy, PublicInputs::StakeAdequacy,
                stake_adequacy_relation, stake_adequacy_binding_tag
            ),
            CircuitId::DefaultDetection => circuit_arm!(
                circuit, witness, public, Witness::DefaultDetection, PublicInputs::DefaultDetection,
                default_detection_relation, default_detection_binding_tag
            ),
            CircuitId::Liquidation => circuit_arm!(
                circuit, witness, public, Witness::Liquidation, PublicInputs::Liquidation,
                liquidation_relation, liquidation_binding_tag
            ),
            CircuitId::Penalty => circuit_arm!(
                circuit, witness, public, Witness::Penalty, PublicInputs::Penalty,
                penalty_relation, penalty_binding_tag
            ),
            CircuitId::Insurance => circuit_arm!(
                circuit, witness, public, Witness::Insurance, PublicInputs::Insurance,
                insurance_relation, insurance_binding_tag
            ),
        }
    }

    fn verify(&self, circuit: CircuitId, proof: &Proof, public: &PublicInputs) -> bool {
        if proof.circuit() != circuit {
            return false;
        }
        let expected = match (circuit, public) {
            (CircuitId::Membership, PublicInputs::Membership(p)) => membership_binding_tag(circuit, p),
            (CircuitId::AnonymityPoolMembership, PublicInputs::AnonymityPoolMembership(p)) => membership_binding_tag(circuit, p),
            (CircuitId::BidRange, PublicInputs::BidRange(p)) => bid_range_binding_tag(circuit, p),
            (CircuitId::BidFairness, PublicInputs::BidFairness(p)) => bid_fairness_binding_tag(circuit, p),
            (CircuitId::WinnerSelection, PublicInputs::WinnerSelection(p)) => winner_selection_binding_tag(circuit, p),
            (CircuitId::Payment, PublicInputs::Payment(p)) => payment_binding_tag(circuit, p),
            (CircuitId::TrustScore, PublicInputs::TrustScore(p)) => trust_score_binding_tag(circuit, p),
            (CircuitId::VoteValidity, PublicInputs::VoteValidity(p)) => vote_validity_binding_tag(circuit, p),
            (CircuitId::Transfer, PublicInputs::Transfer(p)) => transfer_binding_tag(circuit, p),
            (CircuitId::Balance, PublicInputs::Balance(p)) => balance_binding_tag(circuit, p),
            (CircuitId::Mix, PublicInputs::Mix(p)) => mix_binding_tag(circuit, p),
            (CircuitId::WalletOwnership, PublicInputs::WalletOwnership(p)) => wallet_ownership_binding_tag(circuit, p),
            (CircuitId::Route, PublicInputs::Route(p)) => route_binding_tag(circuit, p),
            (CircuitId::StakeAdequacy, PublicInputs::StakeAdequacy(p)) => stake_adequacy_binding_tag(circuit, p),
            (CircuitId::DefaultDetection, PublicInputs::DefaultDetection(p)) => default_detection_binding_tag(circuit, p),
            (CircuitId::Liquidation, PublicInputs::Liquidation(p)) => liquidation_binding_tag(circuit, p),
            (CircuitId::Penalty, PublicInputs::Penalty(p)) => penalty_binding_tag(circuit, p),
            (CircuitId::Insurance, PublicInputs::Insurance(p)) => insurance_binding_tag(circuit, p),
            _ => return false,
        };
        expected == proof.binding_tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circles_crypto::{commit, Randomness};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn prove_then_verify_round_trips() {
        let oracle = DeterministicOracle;
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let r = Randomness::random(&mut rng);
        let witness = Witness::BidRange(BidRangeWitness { value: 5, randomness: r });
        let public = PublicInputs::BidRange(BidRangePublic {
            commitment: commit(&5u128.to_le_bytes(), r),
            min: 0,
            max: 10,
        });
        let proof = oracle.prove(CircuitId::BidRange, &witness, &public).unwrap();
        assert!(oracle.verify(CircuitId::BidRange, &proof, &public));
    }

    #[test]
    fn prove_rejects_unsatisfied_relation() {
        let oracle = DeterministicOracle;
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let r = Randomness::random(&mut rng);
        let witness = Witness::BidRange(BidRangeWitness { value: 500, randomness: r });
        let public = PublicInputs::BidRange(BidRangePublic {
            commitment: commit(&500u128.to_le_bytes(), r),
            min: 0,
            max: 10,
        });
        assert_eq!(
            oracle.prove(CircuitId::BidRange, &witness, &public),
            Err(ZkError::RelationUnsatisfied(CircuitId::BidRange))
        );
    }

    #[test]
    fn verify_rejects_proof_replayed_on_different_public_inputs() {
        let oracle = DeterministicOracle;
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let r = Randomness::random(&mut rng);
        let witness = Witness::BidRange(BidRangeWitness { value: 5, randomness: r });
        let public = PublicInputs::BidRange(BidRangePublic {
            commitment: commit(&5u128.to_le_bytes(), r),
            min: 0,
            max: 10,
        });
        let proof = oracle.prove(CircuitId::BidRange, &witness, &public).unwrap();
        let other_public = PublicInputs::BidRange(BidRangePublic {
            commitment: commit(&5u128.to_le_bytes(), r),
            min: 0,
            max: 1000,
        });
        assert!(!oracle.verify(CircuitId::BidRange, &proof, &other_public));
    }

    #[test]
    fn verify_rejects_wrong_circuit() {
        let oracle = DeterministicOracle;
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let r = Randomness::random(&mut rng);
        let witness = Witness::BidRange(BidRangeWitness { value: 5, randomness: r });
        let public = PublicInputs::BidRange(BidRangePublic {
            commitment: commit(&5u128.to_le_bytes(), r),
            min: 0,
            max: 10,
        });
        let proof = oracle.prove(CircuitId::BidRange, &witness, &public).unwrap();
        assert!(!oracle.verify(CircuitId::BidFairness, &proof, &public));
    }
}
