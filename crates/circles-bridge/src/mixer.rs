//! transaction mixer (C9, spec.md 4.7)
//!
//! grounded on `ligerito-escrow`'s multi-party coordination shape: queue up
//! participants, then settle the whole batch at once through a single
//! relation check rather than pairwise. the balance/bijection relation
//! itself lives in `circles_zk::circuits::bridge::mix_relation`.

use std::collections::BTreeMap;

use circles_crypto::{commit, Commitment, Nullifier, Randomness, Secret};
use circles_zk::circuits::bridge::{is_bijection, MixLeg, MixPublic, MixWitness};
use circles_zk::{CircuitId, Proof, ProofOracle, PublicInputs, Witness};

use crate::error::BridgeError;

/// minimum participants before a batch may settle; below this the
/// anonymity set is too small to be meaningful.
pub const MIN_MIX: usize = 3;
/// largest batch a single settlement will process.
pub const MAX_MIX: usize = 20;
/// mixer fee, in basis points of each leg's value, taken on output.
pub const MIX_FEE_BP: u128 = 10;

#[derive(Clone, Debug)]
struct QueuedLeg {
    leg: MixLeg,
    output_value: u128,
    output_randomness: Randomness,
    output_commitment: Commitment,
    fee: u128,
}

/// one FIFO queue per (source, target) corridor (spec.md 4.7: "queue per
/// (source, target) pair"), so legs never settle in the same batch as a
/// transfer between a different pair of chains.
#[derive(Clone, Debug, Default)]
pub struct Mixer {
    queues: BTreeMap<(String, String), Vec<QueuedLeg>>,
}

#[derive(Clone, Debug)]
pub struct MixSettlement {
    pub proof: Proof,
    pub input_commitments: Vec<Commitment>,
    pub output_commitments: Vec<Commitment>,
    pub nullifiers: Vec<Nullifier>,
    pub fee: u128,
    pub privacy_score: u32,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// enqueue a participant's input commitment for the next settlement on
    /// the `(source_chain, target_chain)` corridor. the per-leg fee is
    /// deducted from the value immediately so the balance relation always
    /// closes regardless of batch composition. rejects once the corridor
    /// already holds `MAX_MIX` legs, so a queue a caller stops draining
    /// cannot grow past the size `execute` is able to settle in one batch.
    pub fn enqueue(
        &mut self,
        source_chain: &str,
        target_chain: &str,
        secret: Secret,
        value: u128,
        input_randomness: Randomness,
        rng: &mut impl rand::RngCore,
    ) -> Result<(), BridgeError> {
        let queue = self.queues.entry((source_chain.to_string(), target_chain.to_string())).or_default();
        if queue.len() >= MAX_MIX {
            return Err(BridgeError::AboveMaxMix(queue.len()));
        }
        let input_commitment = commit(&value.to_le_bytes(), input_randomness);
        let fee = value * MIX_FEE_BP / 10_000;
        let output_value = value - fee;
        let output_randomness = Randomness::random(rng);
        let output_commitment = commit(&output_value.to_le_bytes(), output_randomness);
        queue.push(QueuedLeg {
            leg: MixLeg {
                secret,
                commitment: input_commitment,
                value,
                randomness: input_randomness,
                source_chain: source_chain.to_string(),
                target_chain: target_chain.to_string(),
            },
            output_value,
            output_randomness,
            output_commitment,
            fee,
        });
        Ok(())
    }

    pub fn queue_len(&self, source_chain: &str, target_chain: &str) -> usize {
        self.queues.get(&(source_chain.to_string(), target_chain.to_string())).map_or(0, |q| q.len())
    }

    /// corridors currently holding at least `MIN_MIX` legs, in a stable
    /// order, for `tick` to sweep without needing to know every supported
    /// chain pair in advance.
    pub fn ready_corridors(&self) -> Vec<(String, String)> {
        self.queues.iter().filter(|(_, q)| q.len() >= MIN_MIX).map(|(pair, _)| pair.clone()).collect()
    }

    /// `execute` (spec.md 4.7): settle `(source_chain, target_chain)`'s
    /// queue as a single mix batch once at least `MIN_MIX` legs are queued.
    /// `permutation` is a bijection routing input `i`'s output to public slot
    /// `permutation[i]` (e.g. a Fisher-Yates shuffle) so the public
    /// `output_commitments` order carries no information about which input
    /// funded which output. `target_set_size` is the caller's declared
    /// anonymity-set size (spec.md 6's `mix(transfers, target_set_size)`) and
    /// feeds the privacy score alongside the batch's actual participant
    /// count — a mixer can claim membership in a larger set than the legs it
    /// happens to have queued.
    pub fn execute(
        &mut self,
        source_chain: &str,
        target_chain: &str,
        permutation: Vec<usize>,
        target_set_size: usize,
        oracle: &dyn ProofOracle,
    ) -> Result<MixSettlement, BridgeError> {
        let key = (source_chain.to_string(), target_chain.to_string());
        let n = self.queues.get(&key).map_or(0, |q| q.len());
        if n < MIN_MIX {
            return Err(BridgeError::BelowMinMix(n));
        }
        // `enqueue` caps a corridor at MAX_MIX, so this never actually
        // trips; kept as a guard against a batch exceeding what the caller's
        // permutation was sized for.
        if n > MAX_MIX {
            return Err(BridgeError::AboveMaxMix(n));
        }
        if !is_bijection(&permutation, n) {
            return Err(BridgeError::InvalidPermutation);
        }

        let queue = self.queues.get_mut(&key).expect("checked above");
        let batch: Vec<QueuedLeg> = queue.drain(..).collect();
        let total_fee: u128 = batch.iter().map(|q| q.fee).sum();

        let input_commitments: Vec<_> = batch.iter().map(|q| q.leg.commitment).collect();
        let nullifiers: Vec<_> = batch
            .iter()
            .map(|q| circles_crypto::nullifier(&q.leg.secret, b"mix", &[q.leg.commitment.as_ref()]))
            .collect();
        // input i's output lands at public slot permutation[i], breaking the
        // index correspondence an observer could otherwise use to link them.
        let mut output_commitments = vec![Commitment::ZERO; n];
        for (i, q) in batch.iter().enumerate() {
            output_commitments[permutation[i]] = q.output_commitment;
        }

        let witness = Witness::Mix(MixWitness {
            inputs: batch.iter().map(|q| q.leg.clone()).collect(),
            outputs: batch.iter().map(|q| (q.output_commitment, q.output_value, q.output_randomness)).collect(),
            permutation: permutation.clone(),
            fee: total_fee,
        });
        let public = PublicInputs::Mix(MixPublic {
            input_commitments: input_commitments.clone(),
            output_commitments: output_commitments.clone(),
            nullifiers: nullifiers.clone(),
            fee: total_fee,
            source_chain: source_chain.to_string(),
            target_chain: target_chain.to_string(),
        });
        let proof = oracle
            .prove(CircuitId::Mix, &witness, &public)
            .map_err(|_| BridgeError::ProofInvalid("mix"))?;

        let privacy_score = privacy_score(target_set_size, n);
        tracing::info!(source_chain, target_chain, batch = n, fee = total_fee, privacy_score, "mix batch settled");

        Ok(MixSettlement { proof, input_commitments, output_commitments, nullifiers, fee: total_fee, privacy_score })
    }
}

/// `privacy_score` (spec.md 4.7): anonymity-set size and participant count
/// combine into a 0-100 score; a batch of 10 or more gets a flat bonus.
pub fn privacy_score(anonymity_set_size: usize, participants: usize) -> u32 {
    let mut score = 30 + (2 * anonymity_set_size as u32).min(40) + (3 * participants as u32).min(20);
    if participants >= 10 {
        score += 10;
    }
    score.min(100)
}
