//! payment processor errors
//!
//! matches `zeratul-server`'s convention of a `thiserror`-backed
//! service-level error wrapping lower crate errors, since this crate is the
//! one workspace member other than the façade that talks to a sub-engine
//! (`circles-bridge`) it does not own.

use circles_crypto::Hash32;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("no wallet connected for chain {0}")]
    NoWalletForChain(String),
    #[error("wallet ownership proof invalid for chain {0}")]
    OwnershipProofInvalid(String),
    #[error("balance proof invalid for chain {0}")]
    BalanceProofInvalid(String),
    #[error("insufficient balance: collected {collected}, required {required}")]
    InsufficientBalance { collected: u128, required: u128 },
    #[error("partial payment {collected}/{required} below the 10% minimum threshold")]
    BelowPartialThreshold { collected: u128, required: u128 },
    #[error("bridge error initiating transfer: {0}")]
    Bridge(#[from] circles_bridge::BridgeError),
    #[error("collection attempt {0} not found")]
    AttemptNotFound(Hash32),
    #[error("retry attempt {0} not found")]
    RetryNotFound(Hash32),
    #[error("retry attempt {0} exhausted its retry budget")]
    RetryExhausted(Hash32),
    #[error("decryption key does not open record {0}")]
    DecryptionFailed(Hash32),
}
