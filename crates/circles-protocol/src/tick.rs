//! cooperative sweep (spec.md 5, 6): the facade spawns nothing; callers
//! drive the retry queue and mixer batching forward by calling `tick` on
//! their own schedule.

use circles_bridge::MixSettlement;
use circles_crypto::Hash32;
use circles_payments::CollectionOutcome;
use circles_zk::ProofOracle;
use rand::RngCore;

use crate::Protocol;

#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub retries_succeeded: u32,
    pub retries_evicted: Vec<Hash32>,
    /// one entry per corridor that cleared `MIN_MIX` and settled this tick;
    /// a corridor above `MAX_MIX` at enqueue time never accumulates past it,
    /// so a single tick always drains what's there in one batch.
    pub mix_batches_settled: Vec<MixSettlement>,
}

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    /// `tick` (spec.md 5): sweep due retries, then settle one mix batch if
    /// the queue has crossed its minimum anonymity set.
    pub fn tick(&mut self, now: u64) -> TickReport {
        let wallets = &self.wallets;
        let bridge = &mut self.bridge;
        let rng = &mut self.rng;
        let oracle = &self.oracle;
        let history = &mut self.history;
        let key = self.config.master_key;

        let mut retries_succeeded = 0u32;
        let retries_evicted = self.retry_queue.process_retry_queue(now, |params| {
            match circles_payments::collect(wallets, bridge, params, &key, now, rng, oracle) {
                Ok(attempt) => {
                    if let CollectionOutcome::Success { record } = attempt.outcome {
                        history.record(params.contributor, record);
                    }
                    retries_succeeded += 1;
                    Ok(())
                }
                Err(_) => Err(circles_payments::RetryableReason::TemporaryFailure),
            }
        });

        let mut mix_batches_settled = Vec::new();
        for (source_chain, target_chain) in self.bridge.mixer.ready_corridors() {
            let n = self.bridge.mixer.queue_len(&source_chain, &target_chain);
            let permutation = shuffled_indices(n, &mut self.rng);
            if let Ok(settlement) =
                self.bridge
                    .mixer
                    .execute(&source_chain, &target_chain, permutation, self.config.default_mix_target_set_size, &self.oracle)
            {
                mix_batches_settled.push(settlement);
            }
        }

        TickReport { retries_succeeded, retries_evicted, mix_batches_settled }
    }
}

/// Fisher-Yates shuffle of `0..n` driven by the facade's injected RNG
/// (spec.md 4.7 step 2: "permute transfers uniformly at random").
fn shuffled_indices(n: usize, rng: &mut impl RngCore) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = (rng.next_u64() as usize) % (i + 1);
        indices.swap(i, j);
    }
    indices
}
