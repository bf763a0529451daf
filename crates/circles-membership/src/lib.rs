//! identity commitments and per-circle membership accumulators (C4,
//! spec.md 4.4)

mod identity;
mod member;
mod store;

pub use identity::{IdentityCommitment, IdentitySecret};
pub use member::MemberRecord;
pub use store::{MembershipError, MembershipStore, LARGE_CIRCLE_MIN_TRUST_SCORE};
