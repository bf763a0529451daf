//! monthly collection, retry queue and payment history surface (spec.md
//! 4.8, 6)

use circles_crypto::Hash32;
use circles_payments::{CollectionAttempt, CollectionOutcome, CollectionParams, HistoryView, RetryableReason};
use circles_zk::ProofOracle;
use rand::RngCore;

use crate::error::ProtocolError;
use crate::Protocol;

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    /// run one `collect` attempt; a `Success` outcome is appended to the
    /// contributor's encrypted history immediately (spec.md 4.8 step 6).
    pub fn collect_payment(&mut self, params: &CollectionParams, now: u64) -> Result<CollectionAttempt, ProtocolError> {
        let attempt = circles_payments::collect(&self.wallets, &mut self.bridge, params, &self.config.master_key, now, &mut self.rng, &self.oracle)?;
        if let CollectionOutcome::Success { record } = &attempt.outcome {
            self.history.record(params.contributor, record.clone());
        }
        Ok(attempt)
    }

    /// queue a failed collection attempt for retry with exponential backoff
    /// (spec.md 4.8, 5).
    pub fn queue_retry(&mut self, attempt_id: Hash32, params: CollectionParams, reason: RetryableReason, now: u64) {
        self.retry_queue.enqueue(attempt_id, params, reason, now);
    }

    pub fn cancel_retry(&mut self, attempt_id: &Hash32) -> Result<(), ProtocolError> {
        self.retry_queue.cancel(attempt_id).map_err(Into::into)
    }

    /// `reveal = true` decrypts every record with the facade's master key;
    /// otherwise only the opaque metadata (anonymity score, settlement
    /// proof) is returned (spec.md 4.8's encrypted-by-default history).
    pub fn payment_history(&self, contributor: &Hash32, reveal: bool) -> Result<HistoryView, ProtocolError> {
        let key = reveal.then_some(&self.config.master_key);
        self.history.history(contributor, key).map_err(Into::into)
    }
}
