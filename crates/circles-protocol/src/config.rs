//! facade configuration (spec.md 6)

use circles_crypto::SealKey;

/// knobs that apply across every sub-engine the facade owns. `unit` is the
/// minor-unit base every stake/amount table is denominated in (spec.md 4.3's
/// `circles_trust::UNIT` by default); `master_key` seals every encrypted
/// record the facade writes (payment history, liquidation/penalty reasons).
#[derive(Clone, Copy, Debug)]
pub struct ProtocolConfig {
    pub unit: u128,
    pub master_key: SealKey,
    /// anonymity-set size the cooperative tick's auto-triggered mix batches
    /// declare (spec.md 6's `mix(transfers, target_set_size)`); callers
    /// driving `execute_mix` directly choose their own instead.
    pub default_mix_target_set_size: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            unit: circles_trust::UNIT,
            master_key: SealKey::from_bytes([0u8; 32]),
            default_mix_target_set_size: 25,
        }
    }
}
