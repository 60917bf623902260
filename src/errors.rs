//! Error types for the routing engine.
//!
//! Two layers: [`RouterError`] aborts a whole routing request, while
//! [`SwapError`] is per-hop validation data that travels inside the
//! simulated route and never aborts anything on its own.

use serde::Serialize;

use crate::types::{AssetId, Balance, PoolId};

/// Fatal conditions for a routing request.
///
/// Any of these aborts the request as a whole; no partial trade is
/// returned. Trade-limit violations are deliberately not here, they are
/// carried as [`SwapError`] values on the affected hop instead.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The pool service returned an empty pool set.
    #[error("no pools available")]
    NoPools,

    /// No path connects the requested asset pair.
    #[error("no route found between asset {asset_in} and asset {asset_out}")]
    RouteNotFound { asset_in: AssetId, asset_out: AssetId },

    /// A hop references a pool that the working snapshot does not hold.
    /// The snapshot is stale or the explicit route is inconsistent.
    #[error("pool {0} missing from the working snapshot")]
    PoolNotFound(PoolId),

    /// A hop names an asset the referenced pool does not trade. Same
    /// class of inconsistency as [`RouterError::PoolNotFound`].
    #[error("asset {asset} is not traded by pool {pool_id}")]
    AssetNotInPool { pool_id: PoolId, asset: AssetId },

    /// The pool service failed to produce pools or fees.
    #[error("pool service failure: {0}")]
    PoolService(#[from] anyhow::Error),
}

/// Per-hop validation failure reported by a pool.
///
/// A hop carrying swap errors still holds fully computed amounts; the
/// route stays structurally valid but is treated as unclean by route
/// selection. Callers inspect these before acting on a trade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapError {
    /// The driving amount is below the pool's minimum tradable amount.
    #[error("trade amount below the pool minimum of {min}")]
    TradeBelowMinimum { min: Balance },

    /// The input amount exceeds the pool's input-reserve ratio cap.
    #[error("trade exceeds the maximum input ratio")]
    MaxInRatioExceeded,

    /// The output amount exceeds the pool's output-reserve ratio cap.
    #[error("trade exceeds the maximum output ratio")]
    MaxOutRatioExceeded,

    /// The pool cannot price the trade at all, e.g. the requested
    /// output is not covered by the reserve.
    #[error("insufficient liquidity to price the trade")]
    InsufficientLiquidity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_error_serializes_as_tagged_value() {
        let err = SwapError::TradeBelowMinimum { min: 1_000 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["trade_below_minimum"]["min"], 1_000);

        let err = SwapError::MaxInRatioExceeded;
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, "max_in_ratio_exceeded");
    }

    #[test]
    fn test_router_error_display_carries_assets() {
        let err = RouterError::RouteNotFound { asset_in: 1, asset_out: 7 };
        assert_eq!(err.to_string(), "no route found between asset 1 and asset 7");
    }
}
