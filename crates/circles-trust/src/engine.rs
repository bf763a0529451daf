//! score computation and action-based updates (spec.md 4.3)

use circles_zk::circuits::trust::aggregate;

use crate::factors::FactorInputs;

/// `Σ weight_i × factor_i / 100`, rounded and scaled by 10, clamped to
/// `[0,1000]` — identical to the relation `circles-zk`'s `trust_score`
/// circuit checks, so a score computed here always has a matching
/// attestation (see `attestation.rs`).
pub fn compute_score(inputs: &FactorInputs) -> u32 {
    aggregate(&inputs.components())
}

/// events that adjust a member's current score (spec.md 4.3)
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScoreEvent {
    PaymentSuccess,
    PaymentLate,
    PaymentDefault,
    CircleCompletion,
    DefiInteraction,
    SocialVerification,
}

/// apply one event's delta policy to `current_score`, clamped to `[0,1000]`
/// (spec.md I6 / testable property: `score_after(A,m) ∈ [0,1000]`).
pub fn apply_event(current_score: u32, event: ScoreEvent) -> u32 {
    let delta: i32 = match event {
        ScoreEvent::PaymentSuccess => {
            if current_score < 300 {
                20
            } else if current_score < 600 {
                15
            } else if current_score < 800 {
                10
            } else {
                7
            }
        }
        ScoreEvent::PaymentLate => -((current_score as f64 * 0.03).floor() as i32).min(30).max(-30),
        ScoreEvent::PaymentDefault => -((current_score as f64 * 0.15).floor() as i32).min(150).max(-150),
        ScoreEvent::CircleCompletion => {
            (((1000 - current_score) as f64 * 0.03).floor() as i32).min(25)
        }
        ScoreEvent::DefiInteraction => {
            (((1000 - current_score) as f64 * 0.02).floor() as i32).min(15)
        }
        ScoreEvent::SocialVerification => {
            (((1000 - current_score) as f64 * 0.01).floor() as i32).min(10)
        }
    };
    let updated = current_score as i64 + delta as i64;
    updated.clamp(0, 1000) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_success_delta_steps_down_as_score_rises() {
        assert_eq!(apply_event(100, ScoreEvent::PaymentSuccess), 120);
        assert_eq!(apply_event(500, ScoreEvent::PaymentSuccess), 515);
        assert_eq!(apply_event(700, ScoreEvent::PaymentSuccess), 710);
        assert_eq!(apply_event(900, ScoreEvent::PaymentSuccess), 907);
    }

    #[test]
    fn default_penalty_capped_at_150() {
        assert_eq!(apply_event(1000, ScoreEvent::PaymentDefault), 850);
    }

    #[test]
    fn updates_clamp_into_0_1000() {
        assert_eq!(apply_event(0, ScoreEvent::PaymentLate), 0);
        assert_eq!(apply_event(1000, ScoreEvent::CircleCompletion), 1000);
    }
}
