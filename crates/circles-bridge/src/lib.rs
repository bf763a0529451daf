//! anonymity pools, transaction mixing, cross-chain routing and the
//! privacy bridge facade (C8-C11, spec.md 4.7)

mod bridge;
mod error;
mod mixer;
mod pool;
mod router;

pub use bridge::{BalanceProofResult, PrivacyBridge, RoutedPayment, Transfer};
pub use error::BridgeError;
pub use mixer::{privacy_score, MixSettlement, Mixer, MAX_MIX, MIN_MIX, MIX_FEE_BP};
pub use pool::{snap_denomination, AnonymityPool, PoolRegistry, DENOMINATION_LADDER};
pub use router::{ChainGraph, EdgeParams, Route, RouteMode, MAX_HOPS, MIN_ROUTE_PRIVACY_SCORE};
