//! nullifiers
//!
//! a nullifier is a deterministic derivation from a secret and a set of
//! public context fields (domain tag plus whatever ties the action to a
//! specific round/circle/proposal). it lets the protocol reject a second
//! bid/vote/spend from the same secret without ever learning the secret
//! itself — grounded on `ligerito-shielded-pool::nullifier::Nullifier::derive`,
//! generalized from "note commitment + position" to an arbitrary ordered
//! list of context parts so bids, votes, mixes and transfers can each pin
//! down their own domain.

use crate::hash::Hash32;

const NULLIFIER_DOMAIN: &[u8] = b"circles.nullifier.v1";

/// a per-principal secret (e.g. the per-user value backing an identity
/// commitment). never leaves the holder; only nullifiers derived from it
/// are published.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secret(pub [u8; 32]);

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(..)")
    }
}

pub type Nullifier = Hash32;

/// derive a nullifier from a secret, a domain tag (e.g. `"bid"`, `"vote"`,
/// `"mix"`, `"spend"`) and an arbitrary list of public context parts
/// (circle id, round, proposal id, ...). order of `parts` is significant.
pub fn nullifier(secret: &Secret, domain_tag: &[u8], parts: &[&[u8]]) -> Nullifier {
    let mut hasher = blake3::Hasher::new();
    hasher.update(NULLIFIER_DOMAIN);
    hasher.update(domain_tag);
    hasher.update(&secret.0);
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    Hash32(*hasher.finalize().as_bytes())
}
