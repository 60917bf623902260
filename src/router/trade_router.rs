//! Best-route selection and trade assembly.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use crate::constants::trade::{DEFAULT_MAX_HOPS, SPOT_PROBE_BPS};
use crate::errors::RouterError;
use crate::pool::{self, Pool, PoolSnapshot, PoolToken, PoolType};
use crate::service::PoolService;
use crate::types::{Amount, AssetId, Balance, Hop, TradeType};
use crate::utils::math;

use super::types::{BuySwap, SellSwap, Swap, Trade};
use super::{simulator, suggester};

/// Routing knobs.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Restrict discovery to these pool types; `None` admits all.
    pub include_only: Option<Vec<PoolType>>,
    /// Longest route considered, in hops.
    pub max_hops: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self { include_only: None, max_hops: DEFAULT_MAX_HOPS }
    }
}

/// Multi-hop trade router over a [`PoolService`].
///
/// Every request pulls a fresh pool listing, snapshots it, simulates
/// all candidate paths concurrently against that snapshot and returns
/// the best [`Trade`]. The router holds no pool state of its own, so
/// repeating a request against an unchanged service is idempotent.
pub struct TradeRouter {
    service: Arc<dyn PoolService>,
    options: RouterOptions,
}

impl TradeRouter {
    pub fn new(service: Arc<dyn PoolService>) -> Self {
        Self::with_options(service, RouterOptions::default())
    }

    pub fn with_options(service: Arc<dyn PoolService>, options: RouterOptions) -> Self {
        Self { service, options }
    }

    /// Pool set admitted by the router options.
    pub async fn get_pools(&self) -> Result<Vec<Arc<dyn Pool>>, RouterError> {
        let mut pools = self.service.get_pools().await?;
        if let Some(include) = &self.options.include_only {
            pools.retain(|pool| include.contains(&pool.pool_type()));
        }
        Ok(pools)
    }

    /// Every asset traded by at least one admitted pool, deduplicated
    /// and sorted by id.
    pub async fn get_all_assets(&self) -> Result<Vec<PoolToken>, RouterError> {
        let pools = self.get_pools().await?;
        let mut assets: Vec<PoolToken> = Vec::new();
        for pool in &pools {
            for token in pool.tokens() {
                if !assets.iter().any(|known| known.id == token.id) {
                    assets.push(token.clone());
                }
            }
        }
        assets.sort_by_key(|token| token.id);
        Ok(assets)
    }

    /// Assets tradable against `asset` in a single hop.
    pub async fn get_asset_pairs(&self, asset: AssetId) -> Result<Vec<PoolToken>, RouterError> {
        let pools = self.get_pools().await?;
        let mut assets: Vec<PoolToken> = Vec::new();
        for pool in pools.iter().filter(|pool| pool.tokens().iter().any(|t| t.id == asset)) {
            for token in pool.tokens() {
                if token.id != asset && !assets.iter().any(|known| known.id == token.id) {
                    assets.push(token.clone());
                }
            }
        }
        assets.sort_by_key(|token| token.id);
        Ok(assets)
    }

    /// Prices a sell of `amount_in` of `asset_in` into `asset_out` over
    /// the best route.
    ///
    /// All candidate paths are simulated and the one realizing the most
    /// output wins; routes with validation errors lose to clean ones
    /// regardless of output. A pinned `route` bypasses discovery and is
    /// priced as given; pinning an empty route is rejected, there is
    /// nothing to price.
    pub async fn get_sell(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Balance,
        route: Option<&[Hop]>,
    ) -> Result<Trade, RouterError> {
        let (pools, snapshot) = self.working_set().await?;
        let routes = match route {
            Some([]) => return Err(RouterError::RouteNotFound { asset_in, asset_out }),
            Some(pinned) => vec![pinned.to_vec()],
            None => self.discover(&pools, asset_in, asset_out)?,
        };
        let simulations = routes
            .iter()
            .map(|path| simulator::sell_swaps(self.service.as_ref(), &snapshot, path, amount_in));
        let candidates = try_join_all(simulations).await?;
        let Some(swaps) = find_best_sell_route(candidates) else {
            return Err(RouterError::RouteNotFound { asset_in, asset_out });
        };
        self.assemble_sell(&snapshot, swaps, amount_in, asset_in, asset_out)
    }

    /// [`TradeRouter::get_sell`] over discovered routes only.
    pub async fn get_best_sell(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: Balance,
    ) -> Result<Trade, RouterError> {
        self.get_sell(asset_in, asset_out, amount_in, None).await
    }

    /// Prices a buy of `amount_out` of `asset_out` paid in `asset_in`
    /// over the best route.
    ///
    /// The mirror of [`TradeRouter::get_sell`]: the route demanding the
    /// least input wins, clean routes first.
    pub async fn get_buy(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_out: Balance,
        route: Option<&[Hop]>,
    ) -> Result<Trade, RouterError> {
        let (pools, snapshot) = self.working_set().await?;
        let routes = match route {
            Some([]) => return Err(RouterError::RouteNotFound { asset_in, asset_out }),
            Some(pinned) => vec![pinned.to_vec()],
            None => self.discover(&pools, asset_in, asset_out)?,
        };
        let simulations = routes
            .iter()
            .map(|path| simulator::buy_swaps(self.service.as_ref(), &snapshot, path, amount_out));
        let candidates = try_join_all(simulations).await?;
        let Some(swaps) = find_best_buy_route(candidates) else {
            return Err(RouterError::RouteNotFound { asset_in, asset_out });
        };
        self.assemble_buy(&snapshot, swaps, amount_out, asset_in, asset_out)
    }

    /// [`TradeRouter::get_buy`] over discovered routes only.
    pub async fn get_best_buy(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_out: Balance,
    ) -> Result<Trade, RouterError> {
        self.get_buy(asset_in, asset_out, amount_out, None).await
    }

    /// Best marginal price for swapping `asset_in` into `asset_out`:
    /// candidate routes are ranked by selling a small liquidity probe,
    /// then the winner is re-priced for exactly one whole input unit.
    ///
    /// The probe is 0.1% of the deepest input-asset reserve, so the
    /// ranking reflects real depth instead of dust pricing. Returns
    /// `Ok(None)` when the assets are not connected; the returned
    /// amount carries the destination asset's decimals.
    pub async fn get_best_spot_price(
        &self,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<Option<Amount>, RouterError> {
        let (pools, snapshot) = self.working_set().await?;
        let paths = suggester::get_paths(asset_in, asset_out, &pools, self.options.max_hops);
        if paths.is_empty() {
            return Ok(None);
        }
        let deepest = pools
            .iter()
            .flat_map(|pool| pool.tokens())
            .filter(|token| token.id == asset_in)
            .map(|token| token.balance)
            .max()
            .unwrap_or(0);
        let probe = math::apply_bps(deepest, SPOT_PROBE_BPS).max(1);
        debug!(asset_in, asset_out, probe, "spot price probe");
        let simulations = paths
            .iter()
            .map(|path| simulator::sell_swaps(self.service.as_ref(), &snapshot, path, probe));
        let candidates = try_join_all(simulations).await?;
        let Some(ranked) = find_best_sell_route(candidates) else {
            return Ok(None);
        };
        // Re-price the winning path for one whole unit so the quote is
        // a unit price, not a probe-sized trade.
        let decimals_in = ranked.first().map_or(0, |swap| swap.asset_in_decimals);
        let path: Vec<Hop> = ranked.into_iter().map(|swap| swap.hop).collect();
        let unit = math::pow10(u32::from(decimals_in));
        let swaps = simulator::sell_swaps(self.service.as_ref(), &snapshot, &path, unit).await?;
        let decimals = swaps.last().map_or(0, |swap| swap.asset_out_decimals);
        Ok(Some(Amount { amount: sell_spot(&swaps), decimals }))
    }

    async fn working_set(&self) -> Result<(Vec<Arc<dyn Pool>>, PoolSnapshot), RouterError> {
        let pools = self.get_pools().await?;
        if pools.is_empty() {
            return Err(RouterError::NoPools);
        }
        let snapshot = pool::snapshot(&pools);
        Ok((pools, snapshot))
    }

    fn discover(
        &self,
        pools: &[Arc<dyn Pool>],
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<Vec<Vec<Hop>>, RouterError> {
        let paths = suggester::get_paths(asset_in, asset_out, pools, self.options.max_hops);
        if paths.is_empty() {
            return Err(RouterError::RouteNotFound { asset_in, asset_out });
        }
        debug!(asset_in, asset_out, candidates = paths.len(), "discovered routes");
        Ok(paths)
    }

    fn assemble_sell(
        &self,
        snapshot: &PoolSnapshot,
        swaps: Vec<SellSwap>,
        amount_in: Balance,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<Trade, RouterError> {
        let amount_out = swaps.last().map_or(0, |swap| swap.amount_out);
        let delta0 = simulator::delta0_sell(snapshot, &swaps, amount_in)?;
        let spot_price = sell_spot(&swaps);
        // A direct trade reports the hop fee as is; only multi-hop
        // routes derive the percentage from the fee-free reference.
        let trade_fee_bps = match swaps.as_slice() {
            [only] => only.trade_fee_bps,
            _ => math::sell_fee_bps(delta0, amount_out),
        };
        // Output the whole input would fetch at the marginal route
        // price; the distance of the fee-free output from it is the
        // price impact.
        let source_decimals = swaps.first().map_or(0, |swap| swap.asset_in_decimals);
        let spot_amount =
            math::mul_div_floor(amount_in, spot_price, math::pow10(u32::from(source_decimals)));
        debug!(asset_in, asset_out, amount_in, amount_out, hops = swaps.len(), "sell priced");
        Ok(Trade {
            trade_type: TradeType::Sell,
            asset_in,
            asset_out,
            amount_in,
            amount_out,
            spot_price,
            trade_fee: delta0.saturating_sub(amount_out),
            trade_fee_bps,
            trade_fee_range: route_fee_range(
                swaps.iter().map(|swap| (swap.trade_fee_bps, swap.trade_fee_range)),
            ),
            price_impact_bps: math::diff_to_ref_bps(delta0, spot_amount),
            swaps: swaps.into_iter().map(Swap::Sell).collect(),
            service: Arc::clone(&self.service),
        })
    }

    fn assemble_buy(
        &self,
        snapshot: &PoolSnapshot,
        swaps: Vec<BuySwap>,
        amount_out: Balance,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<Trade, RouterError> {
        let amount_in = swaps.first().map_or(0, |swap| swap.amount_in);
        let delta0 = simulator::delta0_buy(snapshot, &swaps, amount_out)?;
        let spot_price = buy_spot(&swaps);
        // A direct trade reports the hop fee as is; only multi-hop
        // routes derive the percentage from the fee-free reference.
        let trade_fee_bps = match swaps.as_slice() {
            [only] => only.trade_fee_bps,
            _ => math::buy_fee_bps(delta0, amount_in),
        };
        // Input the requested output would cost at the marginal route
        // price, measured against the fee-free input.
        let destination_decimals = swaps.last().map_or(0, |swap| swap.asset_out_decimals);
        let spot_amount = math::mul_div_floor(
            amount_out,
            spot_price,
            math::pow10(u32::from(destination_decimals)),
        );
        debug!(asset_in, asset_out, amount_in, amount_out, hops = swaps.len(), "buy priced");
        Ok(Trade {
            trade_type: TradeType::Buy,
            asset_in,
            asset_out,
            amount_in,
            amount_out,
            spot_price,
            trade_fee: amount_in.saturating_sub(delta0),
            trade_fee_bps,
            trade_fee_range: route_fee_range(
                swaps.iter().map(|swap| (swap.trade_fee_bps, swap.trade_fee_range)),
            ),
            price_impact_bps: math::diff_to_ref_bps(spot_amount, delta0),
            swaps: swaps.into_iter().map(Swap::Buy).collect(),
            service: Arc::clone(&self.service),
        })
    }
}

/// Ranks sell candidates by realized output, best first, and picks the
/// first clean one. With no clean candidate the best-ranked route is
/// returned with its errors attached.
fn find_best_sell_route(mut candidates: Vec<Vec<SellSwap>>) -> Option<Vec<SellSwap>> {
    if candidates.is_empty() {
        return None;
    }
    candidates.sort_by(|a, b| {
        let a_out = a.last().map_or(0, |swap| swap.amount_out);
        let b_out = b.last().map_or(0, |swap| swap.amount_out);
        b_out.cmp(&a_out)
    });
    let selected = candidates
        .iter()
        .position(|route| route.iter().all(|swap| swap.errors.is_empty()))
        .unwrap_or(0);
    Some(candidates.swap_remove(selected))
}

/// Ranks buy candidates by required input, least first. A route that
/// could not be priced at all (zero input) ranks last, not first.
fn find_best_buy_route(mut candidates: Vec<Vec<BuySwap>>) -> Option<Vec<BuySwap>> {
    if candidates.is_empty() {
        return None;
    }
    let required_in = |route: &[BuySwap]| match route.first().map(|swap| swap.amount_in) {
        Some(0) | None => Balance::MAX,
        Some(amount) => amount,
    };
    candidates.sort_by(|a, b| required_in(a).cmp(&required_in(b)));
    let selected = candidates
        .iter()
        .position(|route| route.iter().all(|swap| swap.errors.is_empty()))
        .unwrap_or(0);
    Some(candidates.swap_remove(selected))
}

/// Sums per-hop fee bounds into a route fee range. Present only when at
/// least one hop quotes a dynamic fee; fixed hops contribute their flat
/// fee to both bounds.
fn route_fee_range<I>(hops: I) -> Option<(u32, u32)>
where
    I: IntoIterator<Item = (u32, Option<(u32, u32)>)>,
{
    let mut any_dynamic = false;
    let mut min_total = 0u32;
    let mut max_total = 0u32;
    for (fee, range) in hops {
        let (min, max) = match range {
            Some(bounds) => {
                any_dynamic = true;
                bounds
            }
            None => (fee, fee),
        };
        min_total = min_total.saturating_add(min);
        max_total = max_total.saturating_add(max);
    }
    any_dynamic.then_some((min_total, max_total))
}

/// Route spot price for a sell: per-hop prices multiplied together,
/// rescaled once by the decimals of every intermediate asset.
fn sell_spot(swaps: &[SellSwap]) -> Balance {
    match swaps {
        [only] => only.spot_price,
        _ => {
            let factors: Vec<Balance> = swaps.iter().map(|swap| swap.spot_price).collect();
            let scale = swaps
                .iter()
                .take(swaps.len().saturating_sub(1))
                .map(|swap| u32::from(swap.asset_out_decimals))
                .sum();
            math::product_div_pow10(&factors, scale)
        }
    }
}

/// Route spot price for a buy. Intermediate assets enter a buy route as
/// hop inputs, so the rescale skips the first hop instead of the last.
fn buy_spot(swaps: &[BuySwap]) -> Balance {
    match swaps {
        [only] => only.spot_price,
        _ => {
            let factors: Vec<Balance> = swaps.iter().map(|swap| swap.spot_price).collect();
            let scale =
                swaps.iter().skip(1).map(|swap| u32::from(swap.asset_in_decimals)).sum();
            math::product_div_pow10(&factors, scale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SwapError;

    fn hop(pool_id: &str, asset_in: AssetId, asset_out: AssetId) -> Hop {
        Hop { pool_id: pool_id.into(), pool_type: PoolType::Xyk, asset_in, asset_out }
    }

    fn sell_swap(amount_out: Balance, errors: Vec<SwapError>) -> SellSwap {
        SellSwap {
            hop: hop("p", 1, 2),
            asset_in_decimals: 6,
            asset_out_decimals: 6,
            amount_in: 1_000,
            calculated_out: amount_out,
            amount_out,
            spot_price: 1_000_000,
            trade_fee_bps: 0,
            trade_fee_range: None,
            price_impact_bps: 0,
            errors,
        }
    }

    fn buy_swap(amount_in: Balance, errors: Vec<SwapError>) -> BuySwap {
        BuySwap {
            hop: hop("p", 1, 2),
            asset_in_decimals: 6,
            asset_out_decimals: 6,
            amount_out: 1_000,
            calculated_in: amount_in,
            amount_in,
            spot_price: 1_000_000,
            trade_fee_bps: 0,
            trade_fee_range: None,
            price_impact_bps: 0,
            errors,
        }
    }

    #[test]
    fn test_best_sell_route_prefers_clean_over_better_priced() {
        let dirty = vec![sell_swap(2_000, vec![SwapError::MaxInRatioExceeded])];
        let clean = vec![sell_swap(1_500, vec![])];
        let best = find_best_sell_route(vec![dirty, clean]).unwrap();
        assert_eq!(best[0].amount_out, 1_500);
        assert!(best[0].errors.is_empty());
    }

    #[test]
    fn test_best_sell_route_falls_back_to_best_unclean() {
        let worse = vec![sell_swap(1_000, vec![SwapError::MaxOutRatioExceeded])];
        let better = vec![sell_swap(2_000, vec![SwapError::MaxInRatioExceeded])];
        let best = find_best_sell_route(vec![worse, better]).unwrap();
        assert_eq!(best[0].amount_out, 2_000);
        assert!(!best[0].errors.is_empty());
    }

    #[test]
    fn test_best_buy_route_ranks_least_input_first() {
        let cheap = vec![buy_swap(1_000, vec![])];
        let costly = vec![buy_swap(2_000, vec![])];
        let best = find_best_buy_route(vec![costly, cheap]).unwrap();
        assert_eq!(best[0].amount_in, 1_000);
    }

    #[test]
    fn test_best_buy_route_ranks_unpriceable_last() {
        let unpriceable = vec![buy_swap(0, vec![SwapError::InsufficientLiquidity])];
        let real = vec![buy_swap(5_000, vec![SwapError::MaxInRatioExceeded])];
        let best = find_best_buy_route(vec![unpriceable, real]).unwrap();
        assert_eq!(best[0].amount_in, 5_000);
    }

    #[test]
    fn test_route_fee_range_requires_a_dynamic_hop() {
        assert_eq!(route_fee_range(vec![(30, None), (10, None)]), None);
        assert_eq!(
            route_fee_range(vec![(30, None), (10, Some((5, 50)))]),
            Some((35, 80))
        );
    }

    #[test]
    fn test_route_spots_combine_hops() {
        let single = vec![sell_swap(1_000, vec![])];
        assert_eq!(sell_spot(&single), 1_000_000);

        // 2.0 at 12 intermediate decimals times 0.5: parity overall.
        let mut first = sell_swap(0, vec![]);
        first.spot_price = 2_000_000_000_000;
        first.asset_out_decimals = 12;
        let mut second = sell_swap(0, vec![]);
        second.spot_price = 500_000;
        second.asset_in_decimals = 12;
        assert_eq!(sell_spot(&[first, second]), 1_000_000);

        // Same route walked as a buy: 0.5 source units per whole
        // intermediate, 2 intermediate units per whole destination.
        let mut first = buy_swap(0, vec![]);
        first.spot_price = 500_000_000_000;
        first.asset_in_decimals = 12;
        first.asset_out_decimals = 12;
        let mut second = buy_swap(0, vec![]);
        second.spot_price = 2_000_000_000_000;
        second.asset_in_decimals = 12;
        second.asset_out_decimals = 6;
        assert_eq!(buy_spot(&[first, second]), 1_000_000_000_000);
    }
}
