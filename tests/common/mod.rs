//! Shared fixtures for the routing integration tests.
//!
//! Asset ids and reserves are fixed so expected amounts can be checked
//! by hand: assets A, B and D carry 12 decimals, asset C carries 6.

use std::sync::Arc;

use dex_router_sdk::{
    AssetId, Balance, Decimals, Pool, PoolFees, PoolLimits, PoolToken, StableSwapPool,
    StaticPoolService, TradeRouter, XykPool,
};

pub const ASSET_A: AssetId = 1;
pub const ASSET_B: AssetId = 2;
pub const ASSET_C: AssetId = 3;
#[allow(dead_code)]
pub const ASSET_D: AssetId = 4;

/// One whole unit of a 12-decimals asset.
pub const UNIT: Balance = 1_000_000_000_000;
/// One whole unit of asset C, which carries 6 decimals.
pub const UNIT_C: Balance = 1_000_000;

/// Fee charged by every fixture pool unless a test overrides it.
pub const FEE_BPS: u32 = 30;

pub fn token(id: AssetId, symbol: &str, decimals: Decimals, balance: Balance) -> PoolToken {
    PoolToken { id, symbol: symbol.to_string(), decimals, balance }
}

pub fn xyk(id: &str, token_a: PoolToken, token_b: PoolToken) -> Arc<dyn Pool> {
    Arc::new(XykPool::new(id, [token_a, token_b], PoolLimits::default()))
}

#[allow(dead_code)]
pub fn xyk_with_limits(
    id: &str,
    token_a: PoolToken,
    token_b: PoolToken,
    limits: PoolLimits,
) -> Arc<dyn Pool> {
    Arc::new(XykPool::new(id, [token_a, token_b], limits))
}

#[allow(dead_code)]
pub fn stable(
    id: &str,
    token_a: PoolToken,
    token_b: PoolToken,
    amplification: u128,
) -> Arc<dyn Pool> {
    Arc::new(StableSwapPool::new(id, [token_a, token_b], amplification, PoolLimits::default()))
}

pub fn service_with(pools: Vec<(Arc<dyn Pool>, PoolFees)>) -> Arc<StaticPoolService> {
    let service = StaticPoolService::new();
    for (pool, fees) in pools {
        service.add_pool(pool, fees);
    }
    Arc::new(service)
}

pub fn router_with(pools: Vec<(Arc<dyn Pool>, PoolFees)>) -> TradeRouter {
    TradeRouter::new(service_with(pools))
}

/// The deep A/B pool of the standard network, priced 1 A = 2 B.
pub fn pool_ab() -> Arc<dyn Pool> {
    xyk(
        "xyk-a-b",
        token(ASSET_A, "AAA", 12, 1_000_000 * UNIT),
        token(ASSET_B, "BBB", 12, 2_000_000 * UNIT),
    )
}

/// The deep B/C pool of the standard network, priced 2 B = 1 C and
/// crossing from 12 to 6 decimals.
#[allow(dead_code)]
pub fn pool_bc() -> Arc<dyn Pool> {
    xyk(
        "xyk-b-c",
        token(ASSET_B, "BBB", 12, 2_000_000 * UNIT),
        token(ASSET_C, "CCC", 6, 1_000_000 * UNIT_C),
    )
}

/// Two deep pools chaining A -> B -> C with a 30 bps fee on each hop.
/// The combined A -> C spot price is exactly 1.
#[allow(dead_code)]
pub fn standard_network() -> Vec<(Arc<dyn Pool>, PoolFees)> {
    vec![(pool_ab(), PoolFees::fixed(FEE_BPS)), (pool_bc(), PoolFees::fixed(FEE_BPS))]
}
