//! Pool provisioning and order assembly.

use std::sync::Arc;

use async_trait::async_trait;

use crate::pool::{Pool, PoolFees};
use crate::types::{AssetId, Balance, Hop, TradeType, Transaction};

pub mod static_service;

pub use static_service::StaticPoolService;

/// The router's only view of the outside world: where pools and fees
/// come from and how finished trades turn into orders.
///
/// Pool and fee lookups are async and fallible so implementations can
/// sit on chain clients or caches. Order assembly is pure and the
/// default builders produce the structured [`Transaction`] payload;
/// override them to target a concrete execution layer.
#[async_trait]
pub trait PoolService: Send + Sync {
    /// Current pool set. Called once per routing request; the router
    /// snapshots the result so every hop prices against the same state.
    async fn get_pools(&self) -> anyhow::Result<Vec<Arc<dyn Pool>>>;

    /// Fee quote for trading `asset_out` out of `pool`.
    async fn get_pool_fees(&self, pool: &dyn Pool, asset_out: AssetId)
        -> anyhow::Result<PoolFees>;

    /// Assembles a sell order: spend exactly `amount_in`, receive at
    /// least `min_amount_out`.
    fn build_sell_tx(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Balance,
        min_amount_out: Balance,
        route: Vec<Hop>,
    ) -> Transaction {
        Transaction {
            kind: TradeType::Sell,
            asset_in,
            asset_out,
            amount: amount_in,
            bound: min_amount_out,
            route,
        }
    }

    /// Assembles a buy order: receive exactly `amount_out`, spend at
    /// most `max_amount_in`.
    fn build_buy_tx(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_out: Balance,
        max_amount_in: Balance,
        route: Vec<Hop>,
    ) -> Transaction {
        Transaction {
            kind: TradeType::Buy,
            asset_in,
            asset_out,
            amount: amount_out,
            bound: max_amount_in,
            route,
        }
    }
}
