//! sealed-bid auction surface (spec.md 4.5, 6)
//!
//! `submit_bid` is where the facade earns its keep: the lower store only
//! enforces auction-state and double-bid rules, so every proof a bidder
//! brings (eligibility, bid range, bid fairness) is verified here first.

use circles_crypto::{Commitment, Hash32};
use circles_lifecycle::{bidder_commitment, Auction, AuctionResult, BiddingPhase};
use circles_zk::circuits::bidding::{BidFairnessPublic, BidOpening, BidRangePublic};
use circles_zk::circuits::membership::MembershipPublic;
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs};
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    pub fn auction(&self, auction_id: &Hash32) -> Option<&Auction> {
        self.auctions.get(auction_id)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn start_auction_round(
        &mut self,
        circle_id: Hash32,
        round: u64,
        eligible_root: Hash32,
        min_bid: u128,
        max_bid: u128,
        period_hours: u64,
        now: u64,
    ) -> Hash32 {
        self.auctions.start_round(circle_id, round, eligible_root, min_bid, max_bid, period_hours, now)
    }

    /// verify membership, bid-range and bid-fairness proofs before
    /// delegating to the store's state-machine checks (spec.md 4.5 step 4).
    #[allow(clippy::too_many_arguments)]
    pub fn submit_bid(
        &mut self,
        auction_id: Hash32,
        membership_public: MembershipPublic,
        membership_proof: &Proof,
        bid_range_public: BidRangePublic,
        bid_range_proof: &Proof,
        bid_fairness_public: BidFairnessPublic,
        bid_fairness_proof: &Proof,
        bidder_commitment: Hash32,
        now: u64,
    ) -> Result<(), ProtocolError> {
        let auction = self.auctions.get(&auction_id).ok_or(ProtocolError::AuctionNotFound(auction_id))?;
        if membership_public.root != auction.eligible_root {
            return Err(ProtocolError::ProofRejected);
        }

        if !self.oracle.verify(CircuitId::Membership, membership_proof, &PublicInputs::Membership(membership_public)) {
            return Err(ProtocolError::ProofRejected);
        }
        if !self.oracle.verify(CircuitId::BidRange, bid_range_proof, &PublicInputs::BidRange(bid_range_public.clone())) {
            return Err(ProtocolError::ProofRejected);
        }
        if !self
            .oracle
            .verify(CircuitId::BidFairness, bid_fairness_proof, &PublicInputs::BidFairness(bid_fairness_public.clone()))
        {
            return Err(ProtocolError::ProofRejected);
        }
        if bid_range_public.commitment != bid_fairness_public.commitment {
            return Err(ProtocolError::BidCommitmentMismatch);
        }

        self.auctions
            .submit_bid(auction_id, bidder_commitment, bid_range_public.commitment, bid_fairness_public.nullifier, now)
            .map_err(Into::into)
    }

    pub fn close_auction(&mut self, auction_id: Hash32) -> Result<(), ProtocolError> {
        self.auctions.close(auction_id).map_err(Into::into)
    }

    pub fn auction_phase(&self, auction_id: &Hash32) -> Result<BiddingPhase, ProtocolError> {
        self.auctions.phase(auction_id).map_err(Into::into)
    }

    /// `openings` must line up one-to-one with `Auction::bids`, in
    /// submission order (spec.md 4.5 step 5).
    pub fn finalize_auction(&mut self, auction_id: Hash32, openings: &[BidOpening], now: u64) -> Result<AuctionResult, ProtocolError> {
        self.auctions.finalize(auction_id, openings, now, &self.oracle).map_err(Into::into)
    }

    pub fn verify_auction_integrity(&self, auction_id: &Hash32) -> bool {
        self.auctions.verify_integrity(auction_id)
    }
}

/// the bidder's per-round unblinding commitment (spec.md 4.5 step 4), a thin
/// re-export of the lower crate's free function so callers only need to
/// depend on the facade.
pub fn derive_bidder_commitment(member_ic: &Hash32, circle_id: &Hash32, round: u64) -> Hash32 {
    bidder_commitment(member_ic, circle_id, round)
}

/// commitment type alias kept local so call sites read `auctions::Commitment`
/// instead of reaching past the facade into `circles-crypto`.
pub type BidCommitment = Commitment;
