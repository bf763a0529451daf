//! facade error taxonomy (spec.md 7)
//!
//! matches `circles-payments::PaymentError`'s convention of a
//! `thiserror`-backed service-level error wrapping lower crate errors: this
//! is the topmost instance of that pattern, since the facade is the one
//! workspace member that talks to every sub-engine.

use circles_crypto::Hash32;
use circles_zk::ZkError;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("membership error: {0}")]
    Membership(#[from] circles_membership::MembershipError),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] circles_lifecycle::LifecycleError),

    #[error("bridge error: {0}")]
    Bridge(#[from] circles_bridge::BridgeError),

    #[error("payment error: {0}")]
    Payment(#[from] circles_payments::PaymentError),

    #[error("risk error: {0}")]
    Risk(#[from] circles_risk::RiskError),

    #[error("proof verification failed: {0}")]
    Zk(#[from] ZkError),

    #[error("proof did not verify")]
    ProofRejected,

    #[error("bid range and bid fairness proofs disagree on commitment")]
    BidCommitmentMismatch,

    #[error("auction {0} not found")]
    AuctionNotFound(Hash32),
}
