//! wallet connection registry, collection planning, retry queue and
//! encrypted payment history (C12, spec.md 4.8)

mod collection;
mod error;
mod history;
mod retry;
mod wallet;

pub use collection::{
    collect, AttemptStatus, CollectionAttempt, CollectionOutcome, CollectionParams, EncryptedPaymentRecord,
    COLLECTION_MIXING_DELAY_SECS, MIN_PARTIAL_FRACTION_PCT, PARTIAL_GRACE_SECS,
};
pub use error::PaymentError;
pub use history::{HistoryView, PaymentHistory};
pub use retry::{
    RetryAttempt, RetryQueue, RetryStatus, RetryableReason, RETRY_BACKOFF, RETRY_BASE_SECS, RETRY_MAX_ATTEMPTS,
    RETRY_MAX_DELAY_SECS,
};
pub use wallet::{WalletConnection, WalletRegistry};
