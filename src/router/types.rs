//! Route simulation results and their display projections.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::constants::trade::DEFAULT_SLIPPAGE_BPS;
use crate::errors::SwapError;
use crate::pool::PoolType;
use crate::service::PoolService;
use crate::types::{AssetId, Balance, Decimals, Hop, PoolId, TradeType, Transaction};
use crate::utils::fmt::{bps_to_percent, to_human};
use crate::utils::math;

/// One simulated hop of a sell route, amounts flowing forward.
#[derive(Debug, Clone)]
pub struct SellSwap {
    pub hop: Hop,
    pub asset_in_decimals: Decimals,
    pub asset_out_decimals: Decimals,
    /// Input fed into this hop.
    pub amount_in: Balance,
    /// Fee-free output of the pool curve.
    pub calculated_out: Balance,
    /// Output after the pool fee, the input of the next hop.
    pub amount_out: Balance,
    /// Raw output units per whole input unit at current reserves.
    pub spot_price: Balance,
    pub trade_fee_bps: u32,
    pub trade_fee_range: Option<(u32, u32)>,
    pub price_impact_bps: i64,
    pub errors: Vec<SwapError>,
}

impl SellSwap {
    pub fn to_human(&self) -> SwapHuman {
        SwapHuman {
            pool_id: self.hop.pool_id.clone(),
            pool_type: self.hop.pool_type,
            asset_in: self.hop.asset_in,
            asset_out: self.hop.asset_out,
            amount_in: to_human(self.amount_in, self.asset_in_decimals),
            amount_out: to_human(self.amount_out, self.asset_out_decimals),
            calculated_in: None,
            calculated_out: Some(to_human(self.calculated_out, self.asset_out_decimals)),
            spot_price: to_human(self.spot_price, self.asset_out_decimals),
            trade_fee_pct: bps_to_percent(i64::from(self.trade_fee_bps)),
            trade_fee_range_pct: range_to_percent(self.trade_fee_range),
            price_impact_pct: bps_to_percent(self.price_impact_bps),
            errors: self.errors.clone(),
        }
    }
}

/// One simulated hop of a buy route, requirements flowing backward but
/// stored source to destination.
#[derive(Debug, Clone)]
pub struct BuySwap {
    pub hop: Hop,
    pub asset_in_decimals: Decimals,
    pub asset_out_decimals: Decimals,
    /// Output this hop must deliver.
    pub amount_out: Balance,
    /// Fee-free input of the pool curve.
    pub calculated_in: Balance,
    /// Input after the pool fee, the output demanded from the previous
    /// hop.
    pub amount_in: Balance,
    /// Raw input units per whole output unit at current reserves.
    pub spot_price: Balance,
    pub trade_fee_bps: u32,
    pub trade_fee_range: Option<(u32, u32)>,
    pub price_impact_bps: i64,
    pub errors: Vec<SwapError>,
}

impl BuySwap {
    pub fn to_human(&self) -> SwapHuman {
        SwapHuman {
            pool_id: self.hop.pool_id.clone(),
            pool_type: self.hop.pool_type,
            asset_in: self.hop.asset_in,
            asset_out: self.hop.asset_out,
            amount_in: to_human(self.amount_in, self.asset_in_decimals),
            amount_out: to_human(self.amount_out, self.asset_out_decimals),
            calculated_in: Some(to_human(self.calculated_in, self.asset_in_decimals)),
            calculated_out: None,
            spot_price: to_human(self.spot_price, self.asset_in_decimals),
            trade_fee_pct: bps_to_percent(i64::from(self.trade_fee_bps)),
            trade_fee_range_pct: range_to_percent(self.trade_fee_range),
            price_impact_pct: bps_to_percent(self.price_impact_bps),
            errors: self.errors.clone(),
        }
    }
}

/// A simulated hop tagged by trade direction.
#[derive(Debug, Clone)]
pub enum Swap {
    Sell(SellSwap),
    Buy(BuySwap),
}

impl Swap {
    pub fn hop(&self) -> &Hop {
        match self {
            Swap::Sell(swap) => &swap.hop,
            Swap::Buy(swap) => &swap.hop,
        }
    }

    pub fn amount_in(&self) -> Balance {
        match self {
            Swap::Sell(swap) => swap.amount_in,
            Swap::Buy(swap) => swap.amount_in,
        }
    }

    pub fn amount_out(&self) -> Balance {
        match self {
            Swap::Sell(swap) => swap.amount_out,
            Swap::Buy(swap) => swap.amount_out,
        }
    }

    pub fn asset_in_decimals(&self) -> Decimals {
        match self {
            Swap::Sell(swap) => swap.asset_in_decimals,
            Swap::Buy(swap) => swap.asset_in_decimals,
        }
    }

    pub fn asset_out_decimals(&self) -> Decimals {
        match self {
            Swap::Sell(swap) => swap.asset_out_decimals,
            Swap::Buy(swap) => swap.asset_out_decimals,
        }
    }

    pub fn errors(&self) -> &[SwapError] {
        match self {
            Swap::Sell(swap) => &swap.errors,
            Swap::Buy(swap) => &swap.errors,
        }
    }

    pub fn to_human(&self) -> SwapHuman {
        match self {
            Swap::Sell(swap) => swap.to_human(),
            Swap::Buy(swap) => swap.to_human(),
        }
    }
}

/// A fully priced trade over the best route.
///
/// Amounts are raw base units: `amount_in` in the source asset,
/// `amount_out` in the destination asset. `trade_fee` is denominated in
/// the destination asset for a sell and in the source asset for a buy,
/// matching the side the metrics are anchored on.
#[derive(Clone)]
pub struct Trade {
    pub trade_type: TradeType,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in: Balance,
    pub amount_out: Balance,
    /// Route spot price at current reserves.
    pub spot_price: Balance,
    /// Distance from the fee-free reference amount.
    pub trade_fee: Balance,
    pub trade_fee_bps: u32,
    pub trade_fee_range: Option<(u32, u32)>,
    pub price_impact_bps: i64,
    pub swaps: Vec<Swap>,
    pub(crate) service: Arc<dyn PoolService>,
}

impl Trade {
    /// True when no hop carries a validation error.
    pub fn is_clean(&self) -> bool {
        self.swaps.iter().all(|swap| swap.errors().is_empty())
    }

    /// Turns the trade into an order with a slippage bound, in basis
    /// points, over the computed amount. Defaults to
    /// [`DEFAULT_SLIPPAGE_BPS`].
    ///
    /// For a sell the bound is the minimum acceptable output; for a buy
    /// it is the maximum acceptable input. The buffer rounds down in
    /// both directions, tightening the bound in the caller's favor.
    pub fn to_tx(&self, slippage_bps: Option<u32>) -> Transaction {
        let slippage = slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS);
        let route: Vec<Hop> = self.swaps.iter().map(|swap| swap.hop().clone()).collect();
        match self.trade_type {
            TradeType::Sell => {
                let buffer = math::apply_bps(self.amount_out, slippage);
                self.service.build_sell_tx(
                    self.asset_in,
                    self.asset_out,
                    self.amount_in,
                    self.amount_out.saturating_sub(buffer),
                    route,
                )
            }
            TradeType::Buy => {
                let buffer = math::apply_bps(self.amount_in, slippage);
                self.service.build_buy_tx(
                    self.asset_in,
                    self.asset_out,
                    self.amount_out,
                    self.amount_in.saturating_add(buffer),
                    route,
                )
            }
        }
    }

    /// Display projection with exact decimal strings and percents.
    pub fn to_human(&self) -> TradeHuman {
        let source_decimals = self.swaps.first().map_or(0, Swap::asset_in_decimals);
        let destination_decimals = self.swaps.last().map_or(0, Swap::asset_out_decimals);
        // The spot price and the fee are quoted in destination units for
        // a sell and in source units for a buy.
        let metric_decimals = match self.trade_type {
            TradeType::Sell => destination_decimals,
            TradeType::Buy => source_decimals,
        };
        TradeHuman {
            trade_type: self.trade_type,
            amount_in: to_human(self.amount_in, source_decimals),
            amount_out: to_human(self.amount_out, destination_decimals),
            spot_price: to_human(self.spot_price, metric_decimals),
            trade_fee: to_human(self.trade_fee, metric_decimals),
            trade_fee_pct: bps_to_percent(i64::from(self.trade_fee_bps)),
            trade_fee_range_pct: range_to_percent(self.trade_fee_range),
            price_impact_pct: bps_to_percent(self.price_impact_bps),
            swaps: self.swaps.iter().map(Swap::to_human).collect(),
        }
    }
}

impl fmt::Debug for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trade")
            .field("trade_type", &self.trade_type)
            .field("asset_in", &self.asset_in)
            .field("asset_out", &self.asset_out)
            .field("amount_in", &self.amount_in)
            .field("amount_out", &self.amount_out)
            .field("spot_price", &self.spot_price)
            .field("trade_fee", &self.trade_fee)
            .field("trade_fee_bps", &self.trade_fee_bps)
            .field("trade_fee_range", &self.trade_fee_range)
            .field("price_impact_bps", &self.price_impact_bps)
            .field("swaps", &self.swaps)
            .finish_non_exhaustive()
    }
}

/// Display projection of a hop.
#[derive(Debug, Clone, Serialize)]
pub struct SwapHuman {
    pub pool_id: PoolId,
    pub pool_type: PoolType,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in: String,
    pub amount_out: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_out: Option<String>,
    pub spot_price: String,
    pub trade_fee_pct: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_fee_range_pct: Option<(String, String)>,
    pub price_impact_pct: String,
    pub errors: Vec<SwapError>,
}

/// Display projection of a trade.
#[derive(Debug, Clone, Serialize)]
pub struct TradeHuman {
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub amount_in: String,
    pub amount_out: String,
    pub spot_price: String,
    pub trade_fee: String,
    pub trade_fee_pct: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_fee_range_pct: Option<(String, String)>,
    pub price_impact_pct: String,
    pub swaps: Vec<SwapHuman>,
}

fn range_to_percent(range: Option<(u32, u32)>) -> Option<(String, String)> {
    range.map(|(min, max)| (bps_to_percent(i64::from(min)), bps_to_percent(i64::from(max))))
}
