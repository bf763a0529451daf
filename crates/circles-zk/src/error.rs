//! oracle-level errors
//!
//! matches the low-level crypto crates' hand-rolled `Display` convention
//! (`osst::error::OsstError`, `circles_crypto::RangeProofError`) rather than
//! a `thiserror` derive, since this crate sits at the same tier.

use std::fmt;

use crate::circuit::CircuitId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZkError {
    /// the witness does not satisfy the circuit's relation
    RelationUnsatisfied(CircuitId),
    /// witness/public-input variant does not match the requested circuit
    CircuitMismatch(CircuitId),
}

impl fmt::Display for ZkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelationUnsatisfied(c) => write!(f, "witness does not satisfy {c} relation"),
            Self::CircuitMismatch(c) => write!(f, "witness/public input does not match circuit {c}"),
        }
    }
}

impl std::error::Error for ZkError {}
