//! zero-knowledge proving/verifying oracle facade (spec.md 4.2)
//!
//! every subsystem above this crate proves and verifies through one
//! uniform interface — `ProofOracle::prove`/`verify` keyed by `CircuitId` —
//! rather than a per-circuit Rust type. the underlying SNARK math is an
//! abstract oracle per spec.md's Non-goals; `DeterministicOracle` realizes
//! the oracle's *contract* (sound, binding, no permissive blobs) without a
//! real proving backend, and is swappable behind the trait.

mod circuit;
pub mod circuits;
mod error;
mod oracle;
mod proof;

pub use circuit::CircuitId;
pub use error::ZkError;
pub use oracle::{DeterministicOracle, PublicInputs, ProofOracle, Witness};
pub use proof::Proof;
