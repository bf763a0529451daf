//! member records (spec.md 3)

use crate::identity::IdentityCommitment;

/// `(IC, trust_score, stake_amount, joined_height)` — exclusively owned by
/// the membership store; mutated only by stake and trust-score updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberRecord {
    pub ic: IdentityCommitment,
    pub trust_score: u32,
    pub stake_amount: u128,
    pub joined_height: u64,
}

impl MemberRecord {
    pub fn new(ic: IdentityCommitment, trust_score: u32, stake_amount: u128, joined_height: u64) -> Self {
        Self { ic, trust_score, stake_amount, joined_height }
    }
}
