//! merkle accumulator for membership sets
//!
//! grounded on `ligerito-merkle`'s layered tree and
//! `ligerito-shielded-pool::commitment::StateCommitmentTree`, but recomputed
//! from a canonically *sorted* leaf set on every mutation (spec.md 4.1):
//! leaves are sorted ascending before tree construction, and
//! `circles_crypto::hash_pair` canonicalizes sibling order at every level,
//! so a proof verifies independent of whether the sibling happened to sit
//! to the left or right — there is no position bookkeeping at all, unlike
//! the teacher's position-indexed `MerkleProof`.

use circles_crypto::{hash_pair, Hash32};

const MERKLE_DOMAIN: &[u8] = b"circles.merkle.v1";

/// an inclusion proof: the list of sibling hashes from leaf to root
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MerkleProof {
    siblings: Vec<Hash32>,
}

impl MerkleProof {
    /// verify that `leaf` is included in a tree with the given `root`
    pub fn verify(&self, leaf: &Hash32, root: &Hash32) -> bool {
        let mut current = *leaf;
        for sibling in &self.siblings {
            current = hash_pair(MERKLE_DOMAIN, &current, sibling);
        }
        current == *root
    }
}

/// merkle accumulator over a set of 32-byte leaves (identity commitments,
/// note commitments, ...). the leaf set is kept sorted so that the root is
/// a pure function of the set, never of insertion order.
#[derive(Clone, Debug, Default)]
pub struct MerkleTree {
    leaves: Vec<Hash32>,
}

impl MerkleTree {
    pub fn new() -> Self {
        Self { leaves: Vec::new() }
    }

    /// build a tree from an existing leaf set, deduplicating
    pub fn from_leaves(mut leaves: Vec<Hash32>) -> Self {
        leaves.sort();
        leaves.dedup();
        Self { leaves }
    }

    /// number of leaves (spec.md I2: must equal the circle's member_count)
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn contains(&self, leaf: &Hash32) -> bool {
        self.leaves.binary_search(leaf).is_ok()
    }

    /// insert a leaf, keeping the set sorted. returns `false` if the leaf
    /// was already present (the set never advances with a duplicate
    /// commitment, matching the membership accumulator invariant).
    pub fn insert(&mut self, leaf: Hash32) -> bool {
        match self.leaves.binary_search(&leaf) {
            Ok(_) => false,
            Err(pos) => {
                self.leaves.insert(pos, leaf);
                true
            }
        }
    }

    /// current merkle root. the empty tree's root is the zero hash.
    pub fn root(&self) -> Hash32 {
        compute_root(&self.leaves)
    }

    /// inclusion proof for `leaf`, if present
    pub fn proof(&self, leaf: &Hash32) -> Option<MerkleProof> {
        let pos = self.leaves.binary_search(leaf).ok()?;
        Some(build_proof(&self.leaves, pos))
    }

    /// the sorted leaf set, e.g. for persistence
    pub fn leaves(&self) -> &[Hash32] {
        &self.leaves
    }
}

fn compute_root(leaves: &[Hash32]) -> Hash32 {
    if leaves.is_empty() {
        return Hash32::ZERO;
    }
    let mut level = leaves.to_vec();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(Hash32::ZERO);
        }
        level = level
            .chunks(2)
            .map(|pair| hash_pair(MERKLE_DOMAIN, &pair[0], &pair[1]))
            .collect();
    }
    level[0]
}

fn build_proof(leaves: &[Hash32], mut pos: usize) -> MerkleProof {
    let mut level = leaves.to_vec();
    let mut siblings = Vec::new();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(Hash32::ZERO);
        }
        let sibling_pos = if pos % 2 == 0 { pos + 1 } else { pos - 1 };
        siblings.push(level[sibling_pos]);
        level = level
            .chunks(2)
            .map(|pair| hash_pair(MERKLE_DOMAIN, &pair[0], &pair[1]))
            .collect();
        pos /= 2;
    }
    MerkleProof { siblings }
}

/// recompute a root directly from a leaf set, without keeping a `MerkleTree`
/// around — used by callers (e.g. circle membership) that persist only the
/// member list and want to check it against a stored root.
pub fn root_of(leaves: &[Hash32]) -> Hash32 {
    let mut sorted = leaves.to_vec();
    sorted.sort();
    sorted.dedup();
    compute_root(&sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(byte: u8) -> Hash32 {
        Hash32::from_bytes([byte; 32])
    }

    #[test]
    fn empty_tree_root_is_zero() {
        assert_eq!(MerkleTree::new().root(), Hash32::ZERO);
    }

    #[test]
    fn root_is_order_independent() {
        let mut t1 = MerkleTree::new();
        t1.insert(leaf(3));
        t1.insert(leaf(1));
        t1.insert(leaf(2));

        let mut t2 = MerkleTree::new();
        t2.insert(leaf(1));
        t2.insert(leaf(2));
        t2.insert(leaf(3));

        assert_eq!(t1.root(), t2.root());
    }

    #[test]
    fn proofs_verify() {
        let mut tree = MerkleTree::new();
        for i in 1..=7u8 {
            tree.insert(leaf(i));
        }
        let root = tree.root();
        for i in 1..=7u8 {
            let proof = tree.proof(&leaf(i)).unwrap();
            assert!(proof.verify(&leaf(i), &root));
        }
    }

    #[test]
    fn wrong_leaf_rejected() {
        let mut tree = MerkleTree::new();
        tree.insert(leaf(1));
        tree.insert(leaf(2));
        let root = tree.root();
        let proof = tree.proof(&leaf(1)).unwrap();
        assert!(!proof.verify(&leaf(2), &root));
    }

    #[test]
    fn duplicate_insert_does_not_advance_set() {
        let mut tree = MerkleTree::new();
        assert!(tree.insert(leaf(9)));
        let root_after_first = tree.root();
        assert!(!tree.insert(leaf(9)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), root_after_first);
    }

    #[test]
    fn len_matches_leaf_count_invariant() {
        let mut tree = MerkleTree::new();
        for i in 0..5u8 {
            tree.insert(leaf(i));
        }
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root(), root_of(tree.leaves()));
    }
}
