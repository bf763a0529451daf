//! trust-score engine (C3): weighted factor scoring, tiers, action deltas,
//! and the capability policy every tier-gated write must consult
//! (spec.md 4.3).

mod attestation;
mod engine;
pub mod factors;
mod tier;

pub use attestation::{attest, verify_attestation};
pub use engine::{apply_event, compute_score, ScoreEvent};
pub use factors::FactorInputs;
pub use tier::{may, Action, Tier, UNIT};
