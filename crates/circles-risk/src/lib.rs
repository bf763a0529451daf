//! private stake calculation, anonymous default detection, liquidation and
//! penalty enforcement (C13, spec.md 4.9)
//!
//! grounded on `circles-trust`'s tier/multiplier lookups for the stake
//! ladder and `ligerito-shielded-pool::dispute`'s evidence + severity
//! commitment pattern for the anonymous flag/liquidation/penalty records.

mod default;
mod error;
mod insurance;
mod liquidation;
mod penalty;
mod stake;

pub use default::{DefaultDetectionReport, DefaultFlag, DefaultFlagStore};
pub use error::RiskError;
pub use insurance::{prove_insurance_total, verify_insurance_total};
pub use liquidation::{LiquidationOrder, LiquidationStore};
pub use penalty::{PenaltyRecord, PenaltyStore, PenaltyType};
pub use stake::{base_adjusted_stake, calculate_stake, perturbation, prove_stake_adequacy, size_bracket_label, verify_stake_adequacy, StakeCalculation};
