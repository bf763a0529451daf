//! domain-specific scoring tables (spec.md 4.3)
//!
//! each factor maps a member's private, domain-specific inputs to an
//! integer in `[0, 100]`. the formulas are deterministic and pure — the
//! inputs never leave the caller, only the resulting `[0,100]` component
//! does (and even that is hidden again behind the `trust_score` circuit's
//! commitment, see `attestation.rs`).

/// on-time rate, consistency, consecutive-on-time run, default count, mean
/// delay — spec.md 4.3's "payment reliability" factor, weight 40.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaymentReliabilityInputs {
    /// percentage of payments made on time, 0-100
    pub on_time_rate: u32,
    /// a 0-100 measure of how consistent payment timing is
    pub consistency: u32,
    pub consecutive_on_time_run: u32,
    pub default_count: u32,
    pub mean_delay_days: u32,
}

pub fn payment_reliability(i: &PaymentReliabilityInputs) -> u32 {
    let base = i.on_time_rate.min(100);
    let consistency_bonus = i.consistency.min(100) / 5;
    let streak_bonus = i.consecutive_on_time_run.min(24);
    let delay_penalty = i.mean_delay_days.min(30);
    let default_penalty = i.default_count.saturating_mul(20);
    (base + consistency_bonus + streak_bonus)
        .saturating_sub(delay_penalty)
        .saturating_sub(default_penalty)
        .min(100)
}

/// completion rate, creator completions, early completions, abandonments —
/// spec.md 4.3's "circle completion" factor, weight 30.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CircleCompletionInputs {
    pub completion_rate: u32,
    pub creator_completions: u32,
    pub early_completions: u32,
    pub abandonments: u32,
}

pub fn circle_completion(i: &CircleCompletionInputs) -> u32 {
    let base = i.completion_rate.min(100);
    let creator_bonus = i.creator_completions.min(10) * 2;
    let early_bonus = i.early_completions.min(10);
    let abandonment_penalty = i.abandonments.saturating_mul(25);
    (base + creator_bonus + early_bonus)
        .saturating_sub(abandonment_penalty)
        .min(100)
}

/// protocol count, activity, volume, cross-chain count, tenure, risk flag —
/// spec.md 4.3's "DeFi experience" factor, weight 20.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DefiExperienceInputs {
    pub protocol_count: u32,
    pub active: bool,
    /// coarse volume tier, 0-10 (caller maps raw volume into tiers)
    pub volume_tier: u32,
    pub cross_chain_count: u32,
    pub tenure_months: u32,
    pub risk_flag: bool,
}

pub fn defi_experience(i: &DefiExperienceInputs) -> u32 {
    let protocol_score = i.protocol_count.min(20) * 2;
    let activity_bonus = if i.active { 10 } else { 0 };
    let volume_score = i.volume_tier.min(10) * 3;
    let cross_chain_bonus = i.cross_chain_count.min(10) * 2;
    let tenure_bonus = i.tenure_months.min(24);
    let risk_penalty = if i.risk_flag { 30 } else { 0 };
    (protocol_score + activity_bonus + volume_score + cross_chain_bonus + tenure_bonus)
        .saturating_sub(risk_penalty)
        .min(100)
}

/// identity/phone/email flags, endorsements, reports — spec.md 4.3's
/// "social verification" factor, weight 10.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SocialVerificationInputs {
    pub identity_verified: bool,
    pub phone_verified: bool,
    pub email_verified: bool,
    pub endorsements: u32,
    pub reports: u32,
}

pub fn social_verification(i: &SocialVerificationInputs) -> u32 {
    let identity_bonus = if i.identity_verified { 40 } else { 0 };
    let phone_bonus = if i.phone_verified { 20 } else { 0 };
    let email_bonus = if i.email_verified { 10 } else { 0 };
    let endorsement_bonus = i.endorsements.min(10) * 3;
    let report_penalty = i.reports.saturating_mul(15);
    (identity_bonus + phone_bonus + email_bonus + endorsement_bonus)
        .saturating_sub(report_penalty)
        .min(100)
}

/// the four raw factor inputs backing a single trust-score computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FactorInputs {
    pub payment_reliability: PaymentReliabilityInputs,
    pub circle_completion: CircleCompletionInputs,
    pub defi_experience: DefiExperienceInputs,
    pub social_verification: SocialVerificationInputs,
}

impl FactorInputs {
    /// the four `[0,100]` components, in the fixed weight order
    /// (payment reliability, circle completion, defi experience, social
    /// verification) that `circles_zk::circuits::trust::FACTOR_WEIGHTS`
    /// expects.
    pub fn components(&self) -> [u32; 4] {
        [
            payment_reliability(&self.payment_reliability),
            circle_completion(&self.circle_completion),
            defi_experience(&self.defi_experience),
            social_verification(&self.social_verification),
        ]
    }
}
