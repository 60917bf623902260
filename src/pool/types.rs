//! Shared pool data types.

use serde::{Deserialize, Serialize};

use crate::constants::pool::{
    DEFAULT_MAX_IN_RATIO, DEFAULT_MAX_OUT_RATIO, DEFAULT_MIN_TRADING_AMOUNT,
};
use crate::types::{AssetId, Balance, Decimals};

/// Pricing model of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolType {
    /// Constant-product pool, `x * y = k`.
    Xyk,
    /// StableSwap pool with an amplification coefficient.
    Stable,
}

/// One asset held by a pool, with its live reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolToken {
    pub id: AssetId,
    pub symbol: String,
    pub decimals: Decimals,
    pub balance: Balance,
}

/// The slice of pool state a single hop operates on: the two traded
/// assets with their reserves and decimals, oriented input to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPair {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub decimals_in: Decimals,
    pub decimals_out: Decimals,
    pub balance_in: Balance,
    pub balance_out: Balance,
}

/// Fee quote for one hop, in basis points.
///
/// `fee` is the rate the pool charges in its current state. Pools with
/// state-dependent fees also expose the bounds the rate can move
/// within; fixed-fee pools leave them unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolFees {
    pub fee: u32,
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl PoolFees {
    /// Fixed fee with no dynamic range.
    pub fn fixed(fee: u32) -> Self {
        Self { fee, min: None, max: None }
    }

    /// Dynamic fee currently at `fee`, bounded by `min..=max`.
    pub fn dynamic(fee: u32, min: u32, max: u32) -> Self {
        Self { fee, min: Some(min), max: Some(max) }
    }

    /// The fee bounds, when both are known.
    pub fn range(&self) -> Option<(u32, u32)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

/// Trade limits a pool enforces during validation.
///
/// A ratio of `r` caps the trade at `reserve / r`; zero disables that
/// cap. `min_trading_amount` bounds the driving amount from below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub min_trading_amount: Balance,
    pub max_in_ratio: u128,
    pub max_out_ratio: u128,
}

impl PoolLimits {
    /// No limits enforced at all.
    pub fn disabled() -> Self {
        Self { min_trading_amount: 0, max_in_ratio: 0, max_out_ratio: 0 }
    }
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            min_trading_amount: DEFAULT_MIN_TRADING_AMOUNT,
            max_in_ratio: DEFAULT_MAX_IN_RATIO,
            max_out_ratio: DEFAULT_MAX_OUT_RATIO,
        }
    }
}

/// Result of pricing and validating a sell on one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellOutcome {
    /// Fee-free output of the pricing function.
    pub calculated_out: Balance,
    /// Output after the pool fee is deducted.
    pub amount_out: Balance,
    /// Fee charged, in output-asset units.
    pub fee: Balance,
    /// Fee rate applied, in basis points.
    pub fee_bps: u32,
    /// Limit violations observed while validating. Amounts above are
    /// computed regardless.
    pub errors: Vec<crate::errors::SwapError>,
}

/// Result of pricing and validating a buy on one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyOutcome {
    /// Fee-free input required by the pricing function.
    pub calculated_in: Balance,
    /// Input after the pool fee is added.
    pub amount_in: Balance,
    /// Fee charged, in input-asset units.
    pub fee: Balance,
    /// Fee rate applied, in basis points.
    pub fee_bps: u32,
    /// Limit violations observed while validating.
    pub errors: Vec<crate::errors::SwapError>,
}
