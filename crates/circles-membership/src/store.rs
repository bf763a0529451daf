//! membership store (C4): identity commitments plus a per-circle merkle
//! accumulator gated by the caller's trust tier (spec.md 4.4)
//!
//! grounded on `circles-merkle`'s canonical-root tree and
//! `ligerito-shielded-pool::keys`'s registry-of-addresses shape, generalized
//! to one accumulator per circle rather than one global address book.

use std::collections::BTreeMap;

use circles_crypto::Hash32;
use circles_merkle::MerkleTree;

use crate::identity::IdentityCommitment;
use crate::member::MemberRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipError {
    /// the identity commitment has no registered member record
    UnknownMember,
    /// the circle has no accumulator yet (never created)
    UnknownCircle,
    /// the member is already present in the circle's accumulator
    AlreadyMember,
    /// the circle's accumulator is already at `max_members`
    CircleFull,
    /// the member's stake is below the tier's requirement
    InsufficientStake,
    /// the member's trust score does not meet a size-gated threshold
    InsufficientTrustScore,
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMember => write!(f, "identity commitment is not a registered member"),
            Self::UnknownCircle => write!(f, "circle has no membership accumulator"),
            Self::AlreadyMember => write!(f, "identity commitment is already a member of this circle"),
            Self::CircleFull => write!(f, "circle accumulator is at max_members"),
            Self::InsufficientStake => write!(f, "stake below tier requirement"),
            Self::InsufficientTrustScore => write!(f, "trust score below the circle-size threshold"),
        }
    }
}

impl std::error::Error for MembershipError {}

/// members are scored ≥ 400 to join a circle with more than 8 seats
/// (spec.md 4.4's "large circle" join gate).
pub const LARGE_CIRCLE_MIN_TRUST_SCORE: u32 = 400;
const LARGE_CIRCLE_THRESHOLD: u32 = 8;

/// global member registry plus one merkle accumulator per circle. each
/// aggregate (member record, accumulator) is exclusively owned here and
/// mutated only through the methods below (spec.md 3's ownership rule).
#[derive(Clone, Debug, Default)]
pub struct MembershipStore {
    members: BTreeMap<IdentityCommitment, MemberRecord>,
    accumulators: BTreeMap<Hash32, MerkleTree>,
    /// every registered identity commitment, independent of which circle (if
    /// any) it has joined — this is the root `create_circle`/`join_circle`'s
    /// membership proof proves inclusion against (spec.md 4.4).
    registry: MerkleTree,
}

impl MembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// register a brand-new member record, e.g. on first protocol contact.
    /// idempotent: re-registering the same `ic` overwrites the record and
    /// leaves the registry accumulator unchanged (`MerkleTree::insert`
    /// already dedups).
    pub fn register(&mut self, record: MemberRecord) {
        self.registry.insert(record.ic.as_hash());
        self.members.insert(record.ic, record);
    }

    pub fn member(&self, ic: &IdentityCommitment) -> Option<&MemberRecord> {
        self.members.get(ic)
    }

    /// root of the global identity registry, independent of any circle.
    pub fn registry_root(&self) -> Hash32 {
        self.registry.root()
    }

    pub fn registry_proof(&self, ic: &IdentityCommitment) -> Option<circles_merkle::MerkleProof> {
        self.registry.proof(&ic.as_hash())
    }

    /// create an empty accumulator for a freshly created circle.
    pub fn create_circle_accumulator(&mut self, circle_id: Hash32) {
        self.accumulators.entry(circle_id).or_insert_with(MerkleTree::new);
    }

    pub fn root(&self, circle_id: &Hash32) -> Option<Hash32> {
        self.accumulators.get(circle_id).map(|t| t.root())
    }

    pub fn member_count(&self, circle_id: &Hash32) -> Option<usize> {
        self.accumulators.get(circle_id).map(|t| t.len())
    }

    /// join `ic` into `circle_id`'s accumulator (spec.md 4.4's "Join
    /// circle"). the stake-gating and size checks are re-expressed here
    /// from spec.md 4.3's tier table; circle-existence and `max_members`
    /// capacity are the caller's (circles-lifecycle's) responsibility since
    /// this store has no notion of a circle's `params`.
    pub fn join_circle(
        &mut self,
        circle_id: Hash32,
        ic: IdentityCommitment,
        max_members: usize,
        large_circle: bool,
    ) -> Result<Hash32, MembershipError> {
        let record = self.members.get(&ic).ok_or(MembershipError::UnknownMember)?;
        let tier = circles_trust::Tier::from_score(record.trust_score);
        if (record.stake_amount) < tier.stake_requirement() {
            return Err(MembershipError::InsufficientStake);
        }
        if large_circle && record.trust_score < LARGE_CIRCLE_MIN_TRUST_SCORE {
            return Err(MembershipError::InsufficientTrustScore);
        }

        let tree = self.accumulators.get_mut(&circle_id).ok_or(MembershipError::UnknownCircle)?;
        if tree.len() >= max_members {
            return Err(MembershipError::CircleFull);
        }
        if !tree.insert(ic.as_hash()) {
            return Err(MembershipError::AlreadyMember);
        }
        Ok(tree.root())
    }

    /// whether a circle of `member_count` seats is "large" per spec.md 4.4's
    /// `max_members > 8` join gate.
    pub fn is_large_circle(max_members: usize) -> bool {
        max_members > LARGE_CIRCLE_THRESHOLD as usize
    }

    pub fn update_trust_score(&mut self, ic: &IdentityCommitment, new_score: u32) -> Result<(), MembershipError> {
        let record = self.members.get_mut(ic).ok_or(MembershipError::UnknownMember)?;
        record.trust_score = new_score.min(1000);
        Ok(())
    }

    pub fn update_stake(&mut self, ic: &IdentityCommitment, new_stake: u128) -> Result<(), MembershipError> {
        let record = self.members.get_mut(ic).ok_or(MembershipError::UnknownMember)?;
        record.stake_amount = new_stake;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ic(byte: u8) -> IdentityCommitment {
        IdentityCommitment::from(Hash32::from_bytes([byte; 32]))
    }

    #[test]
    fn join_recomputes_root_and_increments_count() {
        let mut store = MembershipStore::new();
        let circle = Hash32::from_bytes([1u8; 32]);
        store.create_circle_accumulator(circle);
        store.register(MemberRecord::new(ic(9), 850, circles_trust::UNIT, 0));

        assert_eq!(store.member_count(&circle), Some(0));
        let root = store.join_circle(circle, ic(9), 5, false).unwrap();
        assert_eq!(store.member_count(&circle), Some(1));
        assert_eq!(store.root(&circle), Some(root));
    }

    #[test]
    fn join_rejects_insufficient_stake() {
        let mut store = MembershipStore::new();
        let circle = Hash32::from_bytes([2u8; 32]);
        store.create_circle_accumulator(circle);
        store.register(MemberRecord::new(ic(1), 100, 1, 0));

        assert_eq!(
            store.join_circle(circle, ic(1), 5, false),
            Err(MembershipError::InsufficientStake)
        );
    }

    #[test]
    fn join_rejects_low_score_for_large_circle() {
        let mut store = MembershipStore::new();
        let circle = Hash32::from_bytes([3u8; 32]);
        store.create_circle_accumulator(circle);
        store.register(MemberRecord::new(ic(1), 350, circles_trust::UNIT, 0));

        assert_eq!(
            store.join_circle(circle, ic(1), 10, true),
            Err(MembershipError::InsufficientTrustScore)
        );
    }

    #[test]
    fn join_rejects_full_circle() {
        let mut store = MembershipStore::new();
        let circle = Hash32::from_bytes([4u8; 32]);
        store.create_circle_accumulator(circle);
        for i in 0..2u8 {
            store.register(MemberRecord::new(ic(i), 850, circles_trust::UNIT, 0));
            store.join_circle(circle, ic(i), 2, false).unwrap();
        }
        store.register(MemberRecord::new(ic(9), 850, circles_trust::UNIT, 0));
        assert_eq!(store.join_circle(circle, ic(9), 2, false), Err(MembershipError::CircleFull));
    }

    #[test]
    fn join_rejects_duplicate_member() {
        let mut store = MembershipStore::new();
        let circle = Hash32::from_bytes([5u8; 32]);
        store.create_circle_accumulator(circle);
        store.register(MemberRecord::new(ic(1), 850, circles_trust::UNIT, 0));
        store.join_circle(circle, ic(1), 5, false).unwrap();
        assert_eq!(store.join_circle(circle, ic(1), 5, false), Err(MembershipError::AlreadyMember));
    }

    #[test]
    fn large_circle_threshold_matches_spec() {
        assert!(!MembershipStore::is_large_circle(8));
        assert!(MembershipStore::is_large_circle(9));
    }
}
