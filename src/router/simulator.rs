//! Path simulation.
//!
//! Turns a discovered path into per-hop swap results against one pool
//! snapshot. Sells walk the path forward, buys walk it backward; in
//! both directions every hop also records its marginal price and its
//! price impact against that marginal price.

use tracing::trace;

use crate::errors::RouterError;
use crate::pool::PoolSnapshot;
use crate::service::PoolService;
use crate::types::{Balance, Hop};
use crate::utils::math;

use super::types::{BuySwap, SellSwap};

/// Simulates selling `amount_in` along `path`, first hop to last. Each
/// hop consumes the previous hop's output.
pub(crate) async fn sell_swaps(
    service: &dyn PoolService,
    snapshot: &PoolSnapshot,
    path: &[Hop],
    amount_in: Balance,
) -> Result<Vec<SellSwap>, RouterError> {
    let mut swaps: Vec<SellSwap> = Vec::with_capacity(path.len());
    for hop in path {
        let pool = snapshot
            .get(&hop.pool_id)
            .ok_or_else(|| RouterError::PoolNotFound(hop.pool_id.clone()))?;
        let pair = pool.parse_pair(hop.asset_in, hop.asset_out)?;
        let hop_amount_in = swaps.last().map_or(amount_in, |prev| prev.amount_out);
        let fees = service.get_pool_fees(pool.as_ref(), hop.asset_out).await?;
        let outcome = pool.validate_and_sell(&pair, hop_amount_in, &fees);
        let spot_price = pool.spot_price_out_given_in(&pair);
        // What the hop input would fetch at the marginal price.
        let spot_amount = math::mul_div_floor(
            hop_amount_in,
            spot_price,
            math::pow10(u32::from(pair.decimals_in)),
        );
        let price_impact_bps = math::diff_to_ref_bps(outcome.calculated_out, spot_amount);
        trace!(
            pool_id = %hop.pool_id,
            amount_in = hop_amount_in,
            amount_out = outcome.amount_out,
            "sell hop"
        );
        swaps.push(SellSwap {
            hop: hop.clone(),
            asset_in_decimals: pair.decimals_in,
            asset_out_decimals: pair.decimals_out,
            amount_in: hop_amount_in,
            calculated_out: outcome.calculated_out,
            amount_out: outcome.amount_out,
            spot_price,
            trade_fee_bps: outcome.fee_bps,
            trade_fee_range: fees.range(),
            price_impact_bps,
            errors: outcome.errors,
        });
    }
    Ok(swaps)
}

/// Simulates buying `amount_out` along `path`, last hop to first. Each
/// hop must deliver the input demanded by the hop after it. Swaps are
/// pushed in walk order into a pre-sized buffer and flipped once at the
/// end, so the result reads source to destination like a sell route.
pub(crate) async fn buy_swaps(
    service: &dyn PoolService,
    snapshot: &PoolSnapshot,
    path: &[Hop],
    amount_out: Balance,
) -> Result<Vec<BuySwap>, RouterError> {
    let mut swaps: Vec<BuySwap> = Vec::with_capacity(path.len());
    for hop in path.iter().rev() {
        let pool = snapshot
            .get(&hop.pool_id)
            .ok_or_else(|| RouterError::PoolNotFound(hop.pool_id.clone()))?;
        let pair = pool.parse_pair(hop.asset_in, hop.asset_out)?;
        let hop_amount_out = swaps.last().map_or(amount_out, |next| next.amount_in);
        let fees = service.get_pool_fees(pool.as_ref(), hop.asset_out).await?;
        let outcome = pool.validate_and_buy(&pair, hop_amount_out, &fees);
        let spot_price = pool.spot_price_in_given_out(&pair);
        // What the hop output would cost at the marginal price.
        let spot_amount = math::mul_div_floor(
            hop_amount_out,
            spot_price,
            math::pow10(u32::from(pair.decimals_out)),
        );
        let price_impact_bps = math::diff_to_ref_bps(spot_amount, outcome.calculated_in);
        trace!(
            pool_id = %hop.pool_id,
            amount_out = hop_amount_out,
            amount_in = outcome.amount_in,
            "buy hop"
        );
        swaps.push(BuySwap {
            hop: hop.clone(),
            asset_in_decimals: pair.decimals_in,
            asset_out_decimals: pair.decimals_out,
            amount_out: hop_amount_out,
            calculated_in: outcome.calculated_in,
            amount_in: outcome.amount_in,
            spot_price,
            trade_fee_bps: outcome.fee_bps,
            trade_fee_range: fees.range(),
            price_impact_bps,
            errors: outcome.errors,
        });
    }
    swaps.reverse();
    Ok(swaps)
}

/// Fee-free reference output for a sell route: the pool curves chained
/// with no fees applied, each hop consuming the previous fee-free
/// output.
pub(crate) fn delta0_sell(
    snapshot: &PoolSnapshot,
    route: &[SellSwap],
    amount_in: Balance,
) -> Result<Balance, RouterError> {
    let mut amount = amount_in;
    for swap in route {
        let pool = snapshot
            .get(&swap.hop.pool_id)
            .ok_or_else(|| RouterError::PoolNotFound(swap.hop.pool_id.clone()))?;
        let pair = pool.parse_pair(swap.hop.asset_in, swap.hop.asset_out)?;
        amount = pool.calculate_out_given_in(&pair, amount);
    }
    Ok(amount)
}

/// Fee-free reference input for a buy route, chained backward.
pub(crate) fn delta0_buy(
    snapshot: &PoolSnapshot,
    route: &[BuySwap],
    amount_out: Balance,
) -> Result<Balance, RouterError> {
    let mut amount = amount_out;
    for swap in route.iter().rev() {
        let pool = snapshot
            .get(&swap.hop.pool_id)
            .ok_or_else(|| RouterError::PoolNotFound(swap.hop.pool_id.clone()))?;
        let pair = pool.parse_pair(swap.hop.asset_in, swap.hop.asset_out)?;
        amount = pool.calculate_in_given_out(&pair, amount);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pool::{self, Pool, PoolFees, PoolLimits, PoolToken, PoolType, XykPool};
    use crate::service::StaticPoolService;

    fn token(id: u32, balance: u128) -> PoolToken {
        PoolToken { id, symbol: format!("TKN{id}"), decimals: 6, balance }
    }

    fn fixture() -> (StaticPoolService, PoolSnapshot, Vec<Hop>) {
        let service = StaticPoolService::new();
        let first: Arc<dyn Pool> = Arc::new(XykPool::new(
            "xyk-1-2",
            [token(1, 1_000_000), token(2, 2_000_000)],
            PoolLimits::disabled(),
        ));
        let second: Arc<dyn Pool> = Arc::new(XykPool::new(
            "xyk-2-3",
            [token(2, 2_000_000), token(3, 2_000_000)],
            PoolLimits::disabled(),
        ));
        service.add_pool(Arc::clone(&first), PoolFees::fixed(30));
        service.add_pool(Arc::clone(&second), PoolFees::fixed(30));
        let snapshot = pool::snapshot(&[first, second]);
        let path = vec![
            Hop { pool_id: "xyk-1-2".into(), pool_type: PoolType::Xyk, asset_in: 1, asset_out: 2 },
            Hop { pool_id: "xyk-2-3".into(), pool_type: PoolType::Xyk, asset_in: 2, asset_out: 3 },
        ];
        (service, snapshot, path)
    }

    #[tokio::test]
    async fn test_sell_swaps_chain_forward() {
        let (service, snapshot, path) = fixture();
        let swaps = sell_swaps(&service, &snapshot, &path, 10_000).await.unwrap();
        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps[0].amount_in, 10_000);
        assert_eq!(swaps[1].amount_in, swaps[0].amount_out);
        assert!(swaps[1].amount_out < 10_000 * 2);
    }

    #[tokio::test]
    async fn test_buy_swaps_chain_backward_but_read_forward() {
        let (service, snapshot, path) = fixture();
        let swaps = buy_swaps(&service, &snapshot, &path, 10_000).await.unwrap();
        assert_eq!(swaps.len(), 2);
        // Stored source to destination.
        assert_eq!(swaps[0].hop.pool_id, "xyk-1-2");
        assert_eq!(swaps[1].hop.pool_id, "xyk-2-3");
        // The destination hop delivers the requested amount; the first
        // hop delivers what the second one charges.
        assert_eq!(swaps[1].amount_out, 10_000);
        assert_eq!(swaps[0].amount_out, swaps[1].amount_in);
    }

    #[tokio::test]
    async fn test_unknown_pool_aborts_simulation() {
        let (service, snapshot, _) = fixture();
        let path = vec![Hop {
            pool_id: "missing".into(),
            pool_type: PoolType::Xyk,
            asset_in: 1,
            asset_out: 2,
        }];
        let err = sell_swaps(&service, &snapshot, &path, 10_000).await.unwrap_err();
        assert!(matches!(err, RouterError::PoolNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_delta0_ignores_fees() {
        let (service, snapshot, path) = fixture();
        let swaps = sell_swaps(&service, &snapshot, &path, 10_000).await.unwrap();
        let delta0 = delta0_sell(&snapshot, &swaps, 10_000).unwrap();
        // The fee-free reference chains raw curve outputs, so it beats
        // the realized output.
        assert!(delta0 > swaps[1].amount_out);

        let swaps = buy_swaps(&service, &snapshot, &path, 10_000).await.unwrap();
        let delta0 = delta0_buy(&snapshot, &swaps, 10_000).unwrap();
        assert!(delta0 < swaps[0].amount_in);
    }
}
