//! exponential-backoff retry queue (C12, spec.md 4.8, 5)
//!
//! a cooperative sweep, not a spawned task: the caller drives `sweep` on its
//! own tick per spec.md 5's "background sweepers run on a single dedicated
//! cooperative task," matching the teacher's preference for caller-driven
//! scheduling over crate-owned background threads.

use std::collections::BTreeMap;

use circles_crypto::Hash32;

use crate::collection::CollectionParams;
use crate::error::PaymentError;

/// reasons that land a failed collection in the retry queue; anything else
/// is fatal for the triggering call per spec.md 7's propagation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryableReason {
    NetworkError,
    TemporaryFailure,
    InsufficientGas,
}

pub const RETRY_BASE_SECS: u64 = 30;
pub const RETRY_BACKOFF: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 300;
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryStatus {
    Pending,
    Succeeded,
    Exhausted,
    Cancelled,
}

#[derive(Clone, Debug)]
pub struct RetryAttempt {
    pub attempt_id: Hash32,
    pub params: CollectionParams,
    pub reason: RetryableReason,
    pub attempt_count: u32,
    pub next_attempt_at: u64,
    pub status: RetryStatus,
}

#[derive(Clone, Debug, Default)]
pub struct RetryQueue {
    attempts: BTreeMap<Hash32, RetryAttempt>,
}

fn backoff_delay(attempt_count: u32) -> u64 {
    let delay = RETRY_BASE_SECS.saturating_mul(RETRY_BACKOFF.saturating_pow(attempt_count.saturating_sub(1)));
    delay.min(RETRY_MAX_DELAY_SECS)
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// enqueue a failed collection attempt for retry.
    pub fn enqueue(&mut self, attempt_id: Hash32, params: CollectionParams, reason: RetryableReason, now: u64) {
        let attempt = RetryAttempt {
            attempt_id,
            params,
            reason,
            attempt_count: 1,
            next_attempt_at: now + backoff_delay(1),
            status: RetryStatus::Pending,
        };
        tracing::warn!(attempt = %attempt_id, ?reason, "collection queued for retry");
        self.attempts.insert(attempt_id, attempt);
    }

    pub fn get(&self, attempt_id: &Hash32) -> Option<&RetryAttempt> {
        self.attempts.get(attempt_id)
    }

    /// cancel a pending retry (spec.md 5: "callers may cancel a pending
    /// retry by providing its attempt_id").
    pub fn cancel(&mut self, attempt_id: &Hash32) -> Result<(), PaymentError> {
        let attempt = self.attempts.get_mut(attempt_id).ok_or(PaymentError::RetryNotFound(*attempt_id))?;
        attempt.status = RetryStatus::Cancelled;
        Ok(())
    }

    /// `process_retry_queue` driven by `Protocol::tick` (spec.md 4.8, 6):
    /// every attempt due at or before `now` is retried via `retry_fn`; a
    /// successful retry marks the entry `Succeeded`, a failure re-queues it
    /// with the next backoff delay, and exhausting `RETRY_MAX_ATTEMPTS`
    /// evicts the entry.
    pub fn process_retry_queue<F>(&mut self, now: u64, mut retry_fn: F) -> Vec<Hash32>
    where
        F: FnMut(&CollectionParams) -> Result<(), RetryableReason>,
    {
        let mut evicted = Vec::new();
        let due: Vec<Hash32> = self
            .attempts
            .iter()
            .filter(|(_, a)| a.status == RetryStatus::Pending && a.next_attempt_at <= now)
            .map(|(id, _)| *id)
            .collect();

        for id in due {
            let Some(attempt) = self.attempts.get_mut(&id) else { continue };
            match retry_fn(&attempt.params) {
                Ok(()) => {
                    attempt.status = RetryStatus::Succeeded;
                    tracing::info!(attempt = %id, "retry succeeded");
                }
                Err(reason) => {
                    attempt.reason = reason;
                    attempt.attempt_count += 1;
                    if attempt.attempt_count > RETRY_MAX_ATTEMPTS {
                        tracing::warn!(attempt = %id, "retry budget exhausted, evicting");
                        evicted.push(id);
                    } else {
                        attempt.next_attempt_at = now + backoff_delay(attempt.attempt_count);
                    }
                }
            }
        }

        for id in &evicted {
            if let Some(attempt) = self.attempts.get_mut(id) {
                attempt.status = RetryStatus::Exhausted;
            }
            self.attempts.remove(id);
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(ic: u8) -> CollectionParams {
        CollectionParams {
            contributor: Hash32::from_bytes([ic; 32]),
            circle_id: Hash32::from_bytes([9u8; 32]),
            round: 1,
            required_amount: 1000,
            recipient_commit: Hash32::from_bytes([2u8; 32]),
            allow_partial: false,
            settlement_chain: "polygon".to_string(),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1), 30);
        assert_eq!(backoff_delay(2), 60);
        assert_eq!(backoff_delay(3), 120);
        assert_eq!(backoff_delay(10), RETRY_MAX_DELAY_SECS);
    }

    #[test]
    fn retry_succeeds_on_second_attempt() {
        let mut queue = RetryQueue::new();
        let id = Hash32::from_bytes([1u8; 32]);
        queue.enqueue(id, params(1), RetryableReason::NetworkError, 0);

        let evicted = queue.process_retry_queue(30, |_| Ok(()));
        assert!(evicted.is_empty());
        assert_eq!(queue.get(&id).unwrap().status, RetryStatus::Succeeded);
    }

    #[test]
    fn retry_exhausts_after_max_attempts() {
        let mut queue = RetryQueue::new();
        let id = Hash32::from_bytes([1u8; 32]);
        queue.enqueue(id, params(1), RetryableReason::NetworkError, 0);

        let mut now = 0u64;
        let mut evicted = Vec::new();
        for _ in 0..(RETRY_MAX_ATTEMPTS + 1) {
            now += 300;
            evicted = queue.process_retry_queue(now, |_| Err(RetryableReason::NetworkError));
            if !evicted.is_empty() {
                break;
            }
        }
        assert_eq!(evicted, vec![id]);
        assert!(queue.get(&id).is_none());
    }

    #[test]
    fn cancel_prevents_further_retries() {
        let mut queue = RetryQueue::new();
        let id = Hash32::from_bytes([1u8; 32]);
        queue.enqueue(id, params(1), RetryableReason::NetworkError, 0);
        queue.cancel(&id).unwrap();
        let evicted = queue.process_retry_queue(1000, |_| Err(RetryableReason::NetworkError));
        assert!(evicted.is_empty());
        assert_eq!(queue.get(&id).unwrap().status, RetryStatus::Cancelled);
    }
}
