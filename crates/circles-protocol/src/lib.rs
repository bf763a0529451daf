//! external interface facade (C1, spec.md 6): a single `Protocol` struct
//! owning every sub-engine's state, constructed once per process and driven
//! forward by ordinary method calls plus a cooperative `tick`.
//!
//! grounded on `zeratul-server`'s shape for a stateful service wrapper
//! around several owned engines, but with no HTTP layer and no background
//! threads: spec.md 5 calls for sweepers the caller drives explicitly, so
//! `tick` is the library's only concession to "running" anything.

mod auctions;
mod bridge;
mod config;
mod error;
mod governance;
mod lifecycle;
mod payments;
mod risk;
mod tick;
mod trust;

use circles_bridge::PrivacyBridge;
use circles_lifecycle::{AuctionStore, CircleStore, GovernanceStore};
use circles_membership::MembershipStore;
use circles_payments::{PaymentHistory, RetryQueue, WalletRegistry};
use circles_risk::{DefaultFlagStore, LiquidationStore, PenaltyStore};
use circles_zk::ProofOracle;
use rand::RngCore;

pub use config::ProtocolConfig;
pub use error::ProtocolError;
pub use tick::TickReport;

/// the entire protocol's persisted state, parameterized over the proving
/// backend and the source of randomness the facade injects into every
/// sub-engine call that needs one (spec.md 6: "the facade owns no secret
/// material of its own beyond `master_key`, every member-held secret stays
/// with its caller").
pub struct Protocol<O: ProofOracle, R: RngCore> {
    pub(crate) config: ProtocolConfig,
    pub(crate) oracle: O,
    pub(crate) rng: R,

    pub(crate) membership: MembershipStore,
    pub(crate) circles: CircleStore,
    pub(crate) auctions: AuctionStore,
    pub(crate) governance: GovernanceStore,

    pub(crate) bridge: PrivacyBridge,
    pub(crate) wallets: WalletRegistry,

    pub(crate) history: PaymentHistory,
    pub(crate) retry_queue: RetryQueue,

    pub(crate) defaults: DefaultFlagStore,
    pub(crate) liquidations: LiquidationStore,
    pub(crate) penalties: PenaltyStore,
}

impl<O: ProofOracle, R: RngCore> Protocol<O, R> {
    pub fn new(config: ProtocolConfig, rng: R, oracle: O) -> Self {
        Self {
            config,
            oracle,
            rng,
            membership: MembershipStore::new(),
            circles: CircleStore::new(),
            auctions: AuctionStore::new(),
            governance: GovernanceStore::new(),
            bridge: PrivacyBridge::new(config.unit),
            wallets: WalletRegistry::new(),
            history: PaymentHistory::new(),
            retry_queue: RetryQueue::new(),
            defaults: DefaultFlagStore::new(),
            liquidations: LiquidationStore::new(),
            penalties: PenaltyStore::new(),
        }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn membership(&self) -> &MembershipStore {
        &self.membership
    }

    pub fn circles(&self) -> &CircleStore {
        &self.circles
    }

    pub fn auctions(&self) -> &AuctionStore {
        &self.auctions
    }

    pub fn governance(&self) -> &GovernanceStore {
        &self.governance
    }

    pub fn bridge(&self) -> &PrivacyBridge {
        &self.bridge
    }

    pub fn wallets(&self) -> &WalletRegistry {
        &self.wallets
    }
}
