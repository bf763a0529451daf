//! the opaque proof blob returned by `prove` and accepted by `verify`
//!
//! every circuit in this crate follows the same soundness discipline as
//! `circles_crypto::range`: the relation over the real (hidden) witness is
//! checked exactly once, inside `prove`, and `Proof` has no public
//! constructor other than `prove` — so there is no way to obtain a `Proof`
//! for a witness that does not satisfy the relation. `verify` never sees
//! the witness again; it recomputes `binding_tag` from the public inputs
//! alone and checks it against what `prove` stored, which catches a proof
//! being replayed against a different public-input set (spec.md 9(b) — no
//! structurally-valid-but-wrong blob is accepted).

use circles_crypto::Hash32;

use crate::circuit::CircuitId;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Proof {
    pub(crate) circuit: CircuitId,
    pub(crate) binding_tag: Hash32,
}

impl Proof {
    pub(crate) fn new(circuit: CircuitId, binding_tag: Hash32) -> Self {
        Self { circuit, binding_tag }
    }

    pub fn circuit(&self) -> CircuitId {
        self.circuit
    }
}
