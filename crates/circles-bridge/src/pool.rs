//! fixed-denomination anonymity pools (C8, spec.md 4.7)
//!
//! grounded on `ligerito-shielded-pool::{commitment,nullifier}`'s
//! commitment/nullifier-set bookkeeping, generalized to a denomination
//! ladder snapped per spec.md 3's "immutable denomination snapped to a
//! standard tier."

use circles_crypto::{hash, Hash32, Nullifier};
use circles_merkle::MerkleTree;

use crate::error::BridgeError;

/// the standard denomination ladder, in base units of `u` (spec.md 4.7).
pub const DENOMINATION_LADDER: [u128; 4] = [1, 10, 100, 1000];

pub fn snap_denomination(amount: u128, unit: u128) -> u128 {
    DENOMINATION_LADDER
        .iter()
        .map(|tier| tier * unit)
        .min_by_key(|&d| d.abs_diff(amount))
        .unwrap_or(unit)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnonymityPool {
    pub pool_id: Hash32,
    pub chain_id: String,
    pub fixed_denomination: u128,
    #[serde(skip)]
    tree: MerkleTree,
    nullifiers: std::collections::BTreeSet<Nullifier>,
}

impl AnonymityPool {
    pub fn new(chain_id: String, fixed_denomination: u128) -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(chain_id.as_bytes());
        bytes.extend_from_slice(&fixed_denomination.to_le_bytes());
        let pool_id = hash(b"circles.pool_id.v1", &bytes);
        Self { pool_id, chain_id, fixed_denomination, tree: MerkleTree::new(), nullifiers: Default::default() }
    }

    pub fn merkle_root(&self) -> Hash32 {
        self.tree.root()
    }

    pub fn size(&self) -> usize {
        self.tree.len()
    }

    /// `add` (spec.md 4.7): append a deposit commitment to the pool.
    pub fn add(&mut self, commitment: Hash32) {
        self.tree.insert(commitment);
    }

    /// `spend` (spec.md 4.7): the caller has already verified the
    /// `anonymity_pool_membership` proof; this enforces the nullifier
    /// double-spend check.
    pub fn spend(&mut self, nullifier: Nullifier) -> Result<(), BridgeError> {
        if !self.nullifiers.insert(nullifier) {
            return Err(BridgeError::NullifierReused(nullifier));
        }
        Ok(())
    }

    pub fn has_spent(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.contains(nullifier)
    }
}

/// owner of every pool, keyed by chain (spec.md 3: pools are exclusively
/// owned by their manager).
#[derive(Clone, Debug, Default)]
pub struct PoolRegistry {
    pools: std::collections::BTreeMap<Hash32, AnonymityPool>,
    unit: u128,
}

impl PoolRegistry {
    pub fn new(unit: u128) -> Self {
        Self { pools: Default::default(), unit }
    }

    /// ensure a pool exists for `(chain_id, denomination_tier)`, creating
    /// it on first use.
    pub fn ensure_pool(&mut self, chain_id: &str, denomination_tier: u128) -> Hash32 {
        let denomination = denomination_tier * self.unit;
        let pool = AnonymityPool::new(chain_id.to_string(), denomination);
        let pool_id = pool.pool_id;
        self.pools.entry(pool_id).or_insert(pool);
        pool_id
    }

    pub fn get(&self, pool_id: &Hash32) -> Option<&AnonymityPool> {
        self.pools.get(pool_id)
    }

    pub fn get_mut(&mut self, pool_id: &Hash32) -> Option<&mut AnonymityPool> {
        self.pools.get_mut(pool_id)
    }

    /// `find_optimal_pool(chain, amount)` (spec.md 4.7): the pool whose
    /// denomination is within ±10% of `amount`, preferring larger `size`.
    pub fn find_optimal_pool(&self, chain_id: &str, amount: u128) -> Result<Hash32, BridgeError> {
        let tolerance = amount / 10;
        self.pools
            .values()
            .filter(|p| p.chain_id == chain_id)
            .filter(|p| p.fixed_denomination.abs_diff(amount) <= tolerance)
            .max_by_key(|p| (p.size(), std::cmp::Reverse(p.fixed_denomination.abs_diff(amount))))
            .map(|p| p.pool_id)
            .ok_or(BridgeError::NoSuitableDenomination)
    }
}
