//! stable circuit names (spec.md 4.2)

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CircuitId {
    Membership,
    BidRange,
    BidFairness,
    WinnerSelection,
    Payment,
    TrustScore,
    VoteValidity,
    Transfer,
    Balance,
    Mix,
    WalletOwnership,
    Route,
    AnonymityPoolMembership,
    StakeAdequacy,
    DefaultDetection,
    Liquidation,
    Penalty,
    Insurance,
}

impl CircuitId {
    /// stable domain-separation tag, used everywhere a circuit-specific hash
    /// is derived (binding tags, and nowhere else — this is not a secret).
    pub fn domain_tag(&self) -> &'static [u8] {
        match self {
            Self::Membership => b"circles.zk.membership.v1",
            Self::BidRange => b"circles.zk.bid_range.v1",
            Self::BidFairness => b"circles.zk.bid_fairness.v1",
            Self::WinnerSelection => b"circles.zk.winner_selection.v1",
            Self::Payment => b"circles.zk.payment.v1",
            Self::TrustScore => b"circles.zk.trust_score.v1",
            Self::VoteValidity => b"circles.zk.vote_validity.v1",
            Self::Transfer => b"circles.zk.transfer.v1",
            Self::Balance => b"circles.zk.balance.v1",
            Self::Mix => b"circles.zk.mix.v1",
            Self::WalletOwnership => b"circles.zk.wallet_ownership.v1",
            Self::Route => b"circles.zk.route.v1",
            Self::AnonymityPoolMembership => b"circles.zk.anonymity_pool_membership.v1",
            Self::StakeAdequacy => b"circles.zk.stake_adequacy.v1",
            Self::DefaultDetection => b"circles.zk.default_detection.v1",
            Self::Liquidation => b"circles.zk.liquidation.v1",
            Self::Penalty => b"circles.zk.penalty.v1",
            Self::Insurance => b"circles.zk.insurance.v1",
        }
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
