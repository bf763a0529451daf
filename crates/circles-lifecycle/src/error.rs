//! lifecycle-level errors (circle, auction, governance)
//!
//! hand-rolled `Display`, matching the low-level crate convention
//! (`circles_membership::MembershipError`, `osst::error::OsstError`) since
//! this crate sits below the `circles-protocol` facade that wraps it with
//! `thiserror`.

use circles_crypto::{Hash32, Nullifier};
use circles_membership::MembershipError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    Membership(MembershipError),
    CircleNotFound(Hash32),
    CircleInactive(Hash32),
    CircleFull,
    Unauthorized,
    AuctionNotFound(Hash32),
    IllegalAuctionState { op: &'static str },
    AuctionExpired,
    NullifierReused(Nullifier),
    EmptyAuction,
    WinnerIndexOutOfRange,
    ProofInvalid(&'static str),
    ProposalNotFound(Hash32),
    IllegalProposalState { op: &'static str },
    ProposalExpired,
    ExecutionDeadlinePassed,
    QuorumOrTrustUnmet,
}

impl From<MembershipError> for LifecycleError {
    fn from(e: MembershipError) -> Self {
        Self::Membership(e)
    }
}

impl std::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Membership(e) => write!(f, "{e}"),
            Self::CircleNotFound(id) => write!(f, "circle {id} not found"),
            Self::CircleInactive(id) => write!(f, "circle {id} is not active"),
            Self::CircleFull => write!(f, "circle is at max_members"),
            Self::Unauthorized => write!(f, "caller lacks the required tier/trust score"),
            Self::AuctionNotFound(id) => write!(f, "auction {id} not found"),
            Self::IllegalAuctionState { op } => write!(f, "illegal auction state transition for {op}"),
            Self::AuctionExpired => write!(f, "auction deadline has passed"),
            Self::NullifierReused(n) => write!(f, "nullifier {n} already accepted"),
            Self::EmptyAuction => write!(f, "auction has no accepted bids"),
            Self::WinnerIndexOutOfRange => write!(f, "claimed winner index is out of range"),
            Self::ProofInvalid(circuit) => write!(f, "{circuit} proof failed verification"),
            Self::ProposalNotFound(id) => write!(f, "proposal {id} not found"),
            Self::IllegalProposalState { op } => write!(f, "illegal proposal state transition for {op}"),
            Self::ProposalExpired => write!(f, "proposal voting deadline has passed"),
            Self::ExecutionDeadlinePassed => write!(f, "proposal execution deadline has passed"),
            Self::QuorumOrTrustUnmet => write!(f, "caller's trust score is below the required threshold"),
        }
    }
}

impl std::error::Error for LifecycleError {}
