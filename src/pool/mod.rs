//! Pool abstraction and the shipped pricing models.
//!
//! A [`Pool`] exposes pure pricing over a [`PoolPair`] slice of its
//! state plus validated sell/buy entry points. All pricing is integer
//! math on raw base units; an unpriceable quote yields zero rather than
//! an error so the router can treat it as missing liquidity.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{RouterError, SwapError};
use crate::types::{AssetId, Balance, PoolId};
use crate::utils::math;

pub mod stable;
pub mod types;
pub mod xyk;

pub use stable::StableSwapPool;
pub use types::{BuyOutcome, PoolFees, PoolLimits, PoolPair, PoolToken, PoolType, SellOutcome};
pub use xyk::XykPool;

/// Read-only view of the pools a routing request works against, keyed
/// by pool id. Built once per request so every hop prices against the
/// same state.
pub type PoolSnapshot = HashMap<PoolId, Arc<dyn Pool>>;

/// Builds a snapshot from a pool listing. On duplicate ids the later
/// entry wins, matching the listing order of the service.
pub fn snapshot(pools: &[Arc<dyn Pool>]) -> PoolSnapshot {
    pools.iter().map(|pool| (pool.id().clone(), Arc::clone(pool))).collect()
}

/// A liquidity pool the router can price trades against.
///
/// Implementations are plain state holders; no method mutates the pool.
/// The `calculate_*` functions are the raw pricing curves with no fees
/// applied. `validate_and_sell`/`validate_and_buy` wrap them with fee
/// application and trade limits and are shared by all pool types, so an
/// implementation only supplies its curve, its spot prices and its
/// state accessors.
pub trait Pool: Send + Sync {
    fn id(&self) -> &PoolId;

    fn pool_type(&self) -> PoolType;

    /// Assets the pool trades, with live reserves.
    fn tokens(&self) -> &[PoolToken];

    /// Trade limits enforced during validation.
    fn limits(&self) -> &PoolLimits;

    /// Fee-free output for an exact input. Zero means the pool cannot
    /// price the trade.
    fn calculate_out_given_in(&self, pair: &PoolPair, amount_in: Balance) -> Balance;

    /// Fee-free input for an exact output. Zero means the pool cannot
    /// price the trade.
    fn calculate_in_given_out(&self, pair: &PoolPair, amount_out: Balance) -> Balance;

    /// Marginal price of the input asset at current reserves: raw
    /// output units per one whole input unit.
    fn spot_price_out_given_in(&self, pair: &PoolPair) -> Balance;

    /// Marginal price of the output asset at current reserves: raw
    /// input units per one whole output unit.
    fn spot_price_in_given_out(&self, pair: &PoolPair) -> Balance;

    /// Orients the pool state for a trade of `asset_in` into
    /// `asset_out`. Fails when either asset is not in the pool.
    fn parse_pair(&self, asset_in: AssetId, asset_out: AssetId) -> Result<PoolPair, RouterError> {
        let token_in = self
            .tokens()
            .iter()
            .find(|token| token.id == asset_in)
            .ok_or_else(|| RouterError::AssetNotInPool {
                pool_id: self.id().clone(),
                asset: asset_in,
            })?;
        let token_out = self
            .tokens()
            .iter()
            .find(|token| token.id == asset_out)
            .ok_or_else(|| RouterError::AssetNotInPool {
                pool_id: self.id().clone(),
                asset: asset_out,
            })?;
        Ok(PoolPair {
            asset_in,
            asset_out,
            decimals_in: token_in.decimals,
            decimals_out: token_out.decimals,
            balance_in: token_in.balance,
            balance_out: token_out.balance,
        })
    }

    /// Prices a sell of `amount_in`, deducts `fees` from the output and
    /// collects limit violations. Violations never abort the
    /// computation; the caller decides what an unclean result means.
    fn validate_and_sell(
        &self,
        pair: &PoolPair,
        amount_in: Balance,
        fees: &PoolFees,
    ) -> SellOutcome {
        let limits = self.limits();
        let mut errors = Vec::new();
        if amount_in < limits.min_trading_amount {
            errors.push(SwapError::TradeBelowMinimum { min: limits.min_trading_amount });
        }
        if limits.max_in_ratio > 0 && amount_in > pair.balance_in / limits.max_in_ratio {
            errors.push(SwapError::MaxInRatioExceeded);
        }
        let calculated_out = self.calculate_out_given_in(pair, amount_in);
        if limits.max_out_ratio > 0 && calculated_out > pair.balance_out / limits.max_out_ratio {
            errors.push(SwapError::MaxOutRatioExceeded);
        }
        // Fee rounds up, in the pool's favor.
        let fee = math::apply_bps_ceil(calculated_out, fees.fee);
        let amount_out = calculated_out.saturating_sub(fee);
        SellOutcome { calculated_out, amount_out, fee, fee_bps: fees.fee, errors }
    }

    /// Prices a buy of `amount_out`, adds `fees` on top of the input
    /// and collects limit violations.
    fn validate_and_buy(&self, pair: &PoolPair, amount_out: Balance, fees: &PoolFees) -> BuyOutcome {
        let limits = self.limits();
        let mut errors = Vec::new();
        if amount_out < limits.min_trading_amount {
            errors.push(SwapError::TradeBelowMinimum { min: limits.min_trading_amount });
        }
        if limits.max_out_ratio > 0 && amount_out > pair.balance_out / limits.max_out_ratio {
            errors.push(SwapError::MaxOutRatioExceeded);
        }
        let calculated_in = self.calculate_in_given_out(pair, amount_out);
        if calculated_in == 0 && amount_out > 0 {
            errors.push(SwapError::InsufficientLiquidity);
        }
        if limits.max_in_ratio > 0 && calculated_in > pair.balance_in / limits.max_in_ratio {
            errors.push(SwapError::MaxInRatioExceeded);
        }
        // Fee rounds up, in the pool's favor.
        let fee = math::apply_bps_ceil(calculated_in, fees.fee);
        let amount_in = calculated_in.saturating_add(fee);
        BuyOutcome { calculated_in, amount_in, fee, fee_bps: fees.fee, errors }
    }
}
