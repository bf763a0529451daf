//! circle lifecycle (C5, spec.md 4.4)
//!
//! grounded on `ligerito-shielded-pool::channel::ChannelState`'s
//! monotonic-nonce state record, generalized from a two-party payment
//! channel to a closed group with a round counter and an insurance pool.

use circles_crypto::{hash, Hash32};
use circles_membership::MembershipStore;
use circles_trust::{may, Action, Tier};

use crate::error::LifecycleError;

/// members ≤ 4 => small, ≤ 8 => medium, > 8 => large (spec.md 4.3's
/// Builder/Guardian/Sage capability table implies these thresholds; named
/// here as constants rather than left as magic numbers, per SPEC_FULL 4).
pub const MAX_SMALL_CIRCLE: usize = 4;
pub const MAX_MEDIUM_CIRCLE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CircleParams {
    pub max_members: usize,
    pub monthly_amount: u128,
    pub total_rounds: u32,
    pub interest_rate_bp: u32,
    pub stake_requirement: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    pub circle_id: Hash32,
    pub max_members: usize,
    pub monthly_amount: u128,
    pub total_rounds: u32,
    pub current_round: u32,
    pub interest_rate_bp: u32,
    pub active: bool,
    pub membership_root: Hash32,
    pub insurance_pool: u128,
}

impl Circle {
    pub fn member_size_class(&self) -> CircleSizeClass {
        CircleSizeClass::of(self.max_members)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircleSizeClass {
    Small,
    Medium,
    Large,
}

impl CircleSizeClass {
    pub fn of(max_members: usize) -> Self {
        if max_members <= MAX_SMALL_CIRCLE {
            Self::Small
        } else if max_members <= MAX_MEDIUM_CIRCLE {
            Self::Medium
        } else {
            Self::Large
        }
    }

    fn create_action(self) -> Action {
        match self {
            Self::Small => Action::CreateSmallCircle,
            Self::Medium => Action::CreateMediumCircle,
            Self::Large => Action::CreateLargeCircle,
        }
    }
}

/// owner of every `Circle` aggregate in the protocol instance (spec.md 3:
/// "exclusively owned by its manager").
#[derive(Clone, Debug, Default)]
pub struct CircleStore {
    circles: std::collections::BTreeMap<Hash32, Circle>,
}

impl CircleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, circle_id: &Hash32) -> Option<&Circle> {
        self.circles.get(circle_id)
    }

    /// `create_circle` (spec.md 4.4). the caller (the `circles-protocol`
    /// facade) has already verified `creator_proof` against the creator's
    /// identity commitment via `circles-zk`'s oracle before calling this —
    /// this method enforces the remaining, plain-data preconditions: tier
    /// permits creating a circle of this size, and the declared stake
    /// requirement is not set below what the creator's own tier demands.
    pub fn create_circle(
        &mut self,
        members: &mut MembershipStore,
        creator_score: u32,
        params: CircleParams,
        now_height: u64,
        salt: &[u8],
    ) -> Result<Hash32, LifecycleError> {
        let tier = Tier::from_score(creator_score);
        let size_class = CircleSizeClass::of(params.max_members);
        if !may(tier, size_class.create_action()) {
            return Err(LifecycleError::Unauthorized);
        }
        if params.stake_requirement < tier.stake_requirement() {
            return Err(LifecycleError::Unauthorized);
        }

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&creator_score.to_le_bytes());
        bytes.extend_from_slice(&params.max_members.to_le_bytes());
        bytes.extend_from_slice(&params.monthly_amount.to_le_bytes());
        bytes.extend_from_slice(&now_height.to_le_bytes());
        bytes.extend_from_slice(salt);
        let circle_id = hash(b"circles.circle_id.v1", &bytes);

        members.create_circle_accumulator(circle_id);
        let circle = Circle {
            circle_id,
            max_members: params.max_members,
            monthly_amount: params.monthly_amount,
            total_rounds: params.total_rounds,
            current_round: 0,
            interest_rate_bp: params.interest_rate_bp,
            active: true,
            membership_root: members.root(&circle_id).unwrap_or(Hash32::ZERO),
            insurance_pool: 0,
        };
        self.circles.insert(circle_id, circle);
        tracing::info!(circle = %circle_id, "circle created");
        Ok(circle_id)
    }

    /// `join_circle` (spec.md 4.4). stake/score gating is delegated to
    /// `MembershipStore::join_circle`; this updates the circle's cached
    /// root and credits the insurance pool with the member's stake.
    pub fn join_circle(
        &mut self,
        members: &mut MembershipStore,
        circle_id: Hash32,
        ic: circles_membership::IdentityCommitment,
        stake_amount: u128,
    ) -> Result<Hash32, LifecycleError> {
        let circle = self.circles.get_mut(&circle_id).ok_or(LifecycleError::CircleNotFound(circle_id))?;
        if !circle.active {
            return Err(LifecycleError::CircleInactive(circle_id));
        }
        if members.member_count(&circle_id).unwrap_or(0) >= circle.max_members {
            return Err(LifecycleError::CircleFull);
        }
        members.update_stake(&ic, stake_amount)?;
        let large = circles_membership::MembershipStore::is_large_circle(circle.max_members);
        let root = members.join_circle(circle_id, ic, circle.max_members, large)?;
        circle.membership_root = root;
        circle.insurance_pool = circle.insurance_pool.saturating_add(stake_amount);
        tracing::info!(circle = %circle_id, members = members.member_count(&circle_id), "member joined");
        Ok(root)
    }

    /// apply a passed `INTEREST_RATE` governance proposal's side effect
    /// (spec.md 4.6's execute step / 8's scenario 3: "circle's
    /// `interest_rate_bp` becomes 350").
    pub fn set_interest_rate_bp(&mut self, circle_id: Hash32, new_rate_bp: u32) -> Result<(), LifecycleError> {
        let circle = self.circles.get_mut(&circle_id).ok_or(LifecycleError::CircleNotFound(circle_id))?;
        circle.interest_rate_bp = new_rate_bp;
        Ok(())
    }

    /// advance the round counter once an auction for the current round has
    /// finalized and its payout has settled (spec.md 4.4's "Round advance").
    pub fn advance_round(&mut self, circle_id: Hash32) -> Result<u32, LifecycleError> {
        let circle = self.circles.get_mut(&circle_id).ok_or(LifecycleError::CircleNotFound(circle_id))?;
        circle.current_round += 1;
        if circle.current_round >= circle.total_rounds {
            circle.active = false;
        }
        Ok(circle.current_round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circles_membership::{IdentityCommitment, MemberRecord};

    fn ic(b: u8) -> IdentityCommitment {
        IdentityCommitment::from(Hash32::from_bytes([b; 32]))
    }

    fn small_params() -> CircleParams {
        CircleParams {
            max_members: 4,
            monthly_amount: 1_000_000_000_000_000_000,
            total_rounds: 4,
            interest_rate_bp: 200,
            stake_requirement: Tier::Builder.stake_requirement(),
        }
    }

    #[test]
    fn create_requires_tier_for_size_class() {
        let mut members = MembershipStore::new();
        let mut store = CircleStore::new();
        // Newcomer (score 50) cannot create even a small circle
        let result = store.create_circle(&mut members, 50, small_params(), 1, b"salt");
        assert_eq!(result, Err(LifecycleError::Unauthorized));
    }

    #[test]
    fn create_and_join_recomputes_root() {
        let mut members = MembershipStore::new();
        let mut store = CircleStore::new();
        let circle_id = store.create_circle(&mut members, 450, small_params(), 1, b"salt").unwrap();

        members.register(MemberRecord::new(ic(1), 450, Tier::Builder.stake_requirement(), 1));
        let root = store.join_circle(&mut members, circle_id, ic(1), Tier::Builder.stake_requirement()).unwrap();
        let circle = store.get(&circle_id).unwrap();
        assert_eq!(circle.membership_root, root);
        assert_eq!(circle.insurance_pool, Tier::Builder.stake_requirement());
    }

    #[test]
    fn join_rejects_full_circle() {
        let mut members = MembershipStore::new();
        let mut store = CircleStore::new();
        let mut params = small_params();
        params.max_members = 1;
        let circle_id = store.create_circle(&mut members, 450, params, 1, b"salt").unwrap();
        members.register(MemberRecord::new(ic(1), 450, Tier::Builder.stake_requirement(), 1));
        members.register(MemberRecord::new(ic(2), 450, Tier::Builder.stake_requirement(), 1));
        store.join_circle(&mut members, circle_id, ic(1), Tier::Builder.stake_requirement()).unwrap();
        assert_eq!(
            store.join_circle(&mut members, circle_id, ic(2), Tier::Builder.stake_requirement()),
            Err(LifecycleError::CircleFull)
        );
    }

    #[test]
    fn advance_round_deactivates_after_total_rounds() {
        let mut members = MembershipStore::new();
        let mut store = CircleStore::new();
        let mut params = small_params();
        params.total_rounds = 1;
        let circle_id = store.create_circle(&mut members, 450, params, 1, b"salt").unwrap();
        store.advance_round(circle_id).unwrap();
        assert!(!store.get(&circle_id).unwrap().active);
    }
}
