//! bridge-level errors (pool, mixer, router, bridge)

use circles_crypto::{Hash32, Nullifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeError {
    PoolNotFound(Hash32),
    NoSuitableDenomination,
    NullifierReused(Nullifier),
    ProofInvalid(&'static str),
    BelowMinMix(usize),
    AboveMaxMix(usize),
    InvalidPermutation,
    UnsupportedChain,
    IdenticalEndpoints,
    Disconnected,
    HopsExceedMax,
    NoPrivateRoute,
    TransferNotFound(Hash32),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PoolNotFound(id) => write!(f, "pool {id} not found"),
            Self::NoSuitableDenomination => write!(f, "no pool denomination within 10% of amount"),
            Self::NullifierReused(n) => write!(f, "nullifier {n} already spent"),
            Self::ProofInvalid(circuit) => write!(f, "{circuit} proof failed verification"),
            Self::BelowMinMix(n) => write!(f, "mix queue has only {n} entries, below MIN_MIX"),
            Self::AboveMaxMix(n) => write!(f, "mix batch of {n} exceeds MAX_MIX"),
            Self::InvalidPermutation => write!(f, "permutation is not a bijection over the batch"),
            Self::UnsupportedChain => write!(f, "chain is outside the supported set"),
            Self::IdenticalEndpoints => write!(f, "source and target chain are identical"),
            Self::Disconnected => write!(f, "no path exists between source and target"),
            Self::HopsExceedMax => write!(f, "route exceeds max_hops"),
            Self::NoPrivateRoute => write!(f, "no route meets the minimum privacy score"),
            Self::TransferNotFound(id) => write!(f, "transfer {id} not found"),
        }
    }
}

impl std::error::Error for BridgeError {}
