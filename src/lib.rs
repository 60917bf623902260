//! Multi-hop trade routing over AMM liquidity pools.
//!
//! The crate prices sells and buys across chained pools, compares every
//! simple path between two assets and returns the best one as a
//! [`Trade`] carrying full route metrics: spot price, realized fee and
//! price impact, all computed in exact integer math on raw base units.
//! A finished trade turns into a slippage-bounded [`Transaction`] for
//! whatever execution layer sits underneath the [`PoolService`].
//!
//! The usual entry point is [`TradeRouter`] over a [`PoolService`]
//! implementation; [`StaticPoolService`] ships as the in-memory
//! reference.

pub mod constants;
pub mod errors;
pub mod pool;
pub mod router;
pub mod service;
pub mod types;
pub mod utils;

pub use crate::errors::{RouterError, SwapError};
pub use crate::pool::{
    BuyOutcome, Pool, PoolFees, PoolLimits, PoolPair, PoolSnapshot, PoolToken, PoolType,
    SellOutcome, StableSwapPool, XykPool,
};
pub use crate::router::{
    BuySwap, RouterOptions, SellSwap, Swap, SwapHuman, Trade, TradeHuman, TradeRouter,
};
pub use crate::service::{PoolService, StaticPoolService};
pub use crate::types::{Amount, AssetId, Balance, Decimals, Hop, PoolId, TradeType, Transaction};
