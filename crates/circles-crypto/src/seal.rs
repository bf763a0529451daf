//! symmetric sealing for at-rest ciphertexts
//!
//! several records in the protocol are stored encrypted rather than hidden
//! behind a ZK proof — governance payloads, payment history, liquidation and
//! penalty reasons (spec.md 3/4.6/4.8/4.9). the spec treats the encryption
//! scheme itself as an abstract primitive (same posture as the commitment
//! scheme and the SNARK oracle), so this realizes it the way the rest of
//! this crate realizes "abstract" primitives: a blake3-keyed keystream
//! xor'd with the plaintext, grounded on `hash`/`hash_pair`'s construction
//! style rather than pulling in a dedicated AEAD crate.

use crate::hash::Hash32;

const SEAL_DOMAIN: &[u8] = b"circles.seal.v1";

/// a symmetric sealing key, e.g. derived from a commitment or a
/// protocol-held decryption key (spec.md 4.8's `history(ic, decrypt_key?)`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SealKey(pub [u8; 32]);

impl std::fmt::Debug for SealKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SealKey(..)")
    }
}

impl SealKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// derive a sealing key from a commitment plus a context tag, e.g. so a
    /// winning bidder can derive the same key the auction sealed their
    /// payout amount under (spec.md 4.5's "encrypt a_w to the winner's
    /// commitment").
    pub fn derive(commitment: &Hash32, context: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(SEAL_DOMAIN);
        hasher.update(b"derive");
        hasher.update(commitment.as_ref());
        hasher.update(context);
        Self(*hasher.finalize().as_bytes())
    }
}

fn keystream(key: &SealKey, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut counter: u64 = 0;
    while out.len() < len {
        let mut hasher = blake3::Hasher::new_keyed(&key.0);
        hasher.update(SEAL_DOMAIN);
        hasher.update(&counter.to_le_bytes());
        out.extend_from_slice(hasher.finalize().as_bytes());
        counter += 1;
    }
    out.truncate(len);
    out
}

/// seal `plaintext` under `key`. the same function reverses the operation
/// (xor is its own inverse), so `open` is just `seal` renamed for call-site
/// clarity.
pub fn seal(key: &SealKey, plaintext: &[u8]) -> Vec<u8> {
    let ks = keystream(key, plaintext.len());
    plaintext.iter().zip(ks.iter()).map(|(p, k)| p ^ k).collect()
}

pub fn open(key: &SealKey, ciphertext: &[u8]) -> Vec<u8> {
    seal(key, ciphertext)
}
