//! In-memory pool service.
//!
//! Serves a fixed pool set from memory: the backing store for local
//! tooling, fixtures and tests, and the reference for what a chain
//! backed service has to provide. Pools and fee quotes are registered
//! up front; fee quotes can be overridden per output asset for pools
//! that discount one side.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::pool::{Pool, PoolFees};
use crate::types::{AssetId, PoolId};

use super::PoolService;

#[derive(Default)]
pub struct StaticPoolService {
    pools: RwLock<Vec<Arc<dyn Pool>>>,
    pool_fees: DashMap<PoolId, PoolFees>,
    asset_fees: DashMap<(PoolId, AssetId), PoolFees>,
}

impl StaticPoolService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pool together with its default fee quote.
    pub fn add_pool(&self, pool: Arc<dyn Pool>, fees: PoolFees) {
        self.pool_fees.insert(pool.id().clone(), fees);
        self.pools.write().push(pool);
    }

    /// Overrides the fee quote for one output asset of a pool.
    pub fn set_asset_fees(&self, pool_id: impl Into<PoolId>, asset_out: AssetId, fees: PoolFees) {
        self.asset_fees.insert((pool_id.into(), asset_out), fees);
    }
}

#[async_trait]
impl PoolService for StaticPoolService {
    async fn get_pools(&self) -> anyhow::Result<Vec<Arc<dyn Pool>>> {
        Ok(self.pools.read().clone())
    }

    async fn get_pool_fees(
        &self,
        pool: &dyn Pool,
        asset_out: AssetId,
    ) -> anyhow::Result<PoolFees> {
        let key = (pool.id().clone(), asset_out);
        if let Some(fees) = self.asset_fees.get(&key) {
            return Ok(*fees);
        }
        self.pool_fees
            .get(pool.id())
            .map(|fees| *fees)
            .ok_or_else(|| anyhow!("no fees registered for pool {}", pool.id()))
    }
}
