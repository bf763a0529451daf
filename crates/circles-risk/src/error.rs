//! risk-engine errors
//!
//! hand-rolled `Display`, matching the low-level crate convention used by
//! `circles-lifecycle::LifecycleError` and `circles-bridge::BridgeError`
//! since this crate also sits below the `circles-protocol` facade.

use circles_crypto::{Hash32, Nullifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskError {
    ProofInvalid(&'static str),
    NullifierReused(Nullifier),
    SeverityOutOfRange(u32),
    LiquidationNotFound(Hash32),
    PenaltyNotFound(Hash32),
}

impl std::fmt::Display for RiskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProofInvalid(circuit) => write!(f, "{circuit} proof failed verification"),
            Self::NullifierReused(n) => write!(f, "nullifier {n} already flagged"),
            Self::SeverityOutOfRange(s) => write!(f, "severity {s} is outside [0,10]"),
            Self::LiquidationNotFound(id) => write!(f, "liquidation order {id} not found"),
            Self::PenaltyNotFound(id) => write!(f, "penalty record {id} not found"),
        }
    }
}

impl std::error::Error for RiskError {}
