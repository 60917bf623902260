//! Core identifiers and value types shared across the crate.

use serde::{Deserialize, Serialize};

use crate::pool::PoolType;
use crate::utils::fmt;

/// Asset identifier inside the pool registry.
pub type AssetId = u32;

/// Token amount or reserve in raw base units.
pub type Balance = u128;

/// Number of base-unit digits behind the decimal point of an asset.
pub type Decimals = u8;

/// Pool identifier, unique within one snapshot.
pub type PoolId = String;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
}

/// One edge of a route: a pool traversal from `asset_in` to `asset_out`.
///
/// Produced by path discovery and treated as immutable from then on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub pool_id: PoolId,
    pub pool_type: PoolType,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
}

/// Raw amount together with the decimals needed to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub amount: Balance,
    pub decimals: Decimals,
}

impl Amount {
    /// Renders the amount as an exact decimal string.
    pub fn to_human(&self) -> String {
        fmt::to_human(self.amount, self.decimals)
    }
}

/// Order request produced by the transaction builders.
///
/// The router never submits anything. This is the structured payload a
/// caller hands to whatever execution layer it runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Trade direction the bound was computed for.
    pub kind: TradeType,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    /// Traded amount: input for a sell, output for a buy.
    pub amount: Balance,
    /// Worst acceptable counter amount: minimum output for a sell,
    /// maximum input for a buy.
    pub bound: Balance,
    /// Hops the trade executes through, source to destination.
    pub route: Vec<Hop>,
}
