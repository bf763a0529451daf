//! circle lifecycle, sealed-bid auction and governance state machines
//! (C5, C6, C7 — spec.md 4.4, 4.5, 4.6)

mod auction;
mod circle;
mod error;
mod governance;

pub use auction::{bidder_commitment, Auction, AuctionResult, AuctionStore, Bid, BiddingPhase};
pub use circle::{Circle, CircleParams, CircleSizeClass, CircleStore, MAX_MEDIUM_CIRCLE, MAX_SMALL_CIRCLE};
pub use error::LifecycleError;
pub use governance::{
    GovernanceStore, Proposal, ProposalParams, ProposalScope, ProposalStatus, ProposalType,
    TallyResult, VoteRecord, CIRCLE_SCOPED_PROPOSAL_THRESHOLD, PROTOCOL_WIDE_PROPOSAL_THRESHOLD,
};
