//! StableSwap pool.
//!
//! Two-asset pool over the invariant
//! `ann * (x + y) + d = ann * d + d^3 / (4 * x * y)`, where `ann` is
//! twice the amplification coefficient. Higher amplification flattens
//! the curve around the peg: a balanced pool with amplification in the
//! hundreds trades nearly 1:1 and degrades toward constant-product
//! pricing as it drains.
//!
//! Reserves are normalized to the larger of the two asset precisions
//! before solving, so assets with different decimals mix correctly.
//! The invariant constant `d` and the counter reserve are found by
//! Newton iteration carried in 512 bits; a quote is zero whenever the
//! iteration fails to converge or an intermediate step overflows.

use crate::constants::pool::{STABLE_MAX_ITERATIONS, STABLE_PRECISION};
use crate::types::{Balance, PoolId};
use crate::utils::big_num::U512;
use crate::utils::math;

use super::types::{PoolLimits, PoolPair, PoolToken, PoolType};
use super::Pool;

/// Two-asset stableswap pool with an amplification coefficient.
#[derive(Debug, Clone)]
pub struct StableSwapPool {
    id: PoolId,
    tokens: [PoolToken; 2],
    amplification: u128,
    limits: PoolLimits,
}

impl StableSwapPool {
    /// `amplification` must be at least 1; a pool amplified by zero
    /// cannot price anything and quotes zero for every trade.
    pub fn new(
        id: impl Into<PoolId>,
        tokens: [PoolToken; 2],
        amplification: u128,
        limits: PoolLimits,
    ) -> Self {
        Self { id: id.into(), tokens, amplification, limits }
    }

    fn ann(&self) -> U512 {
        U512::from(self.amplification) * U512::from(2u8)
    }
}

impl Pool for StableSwapPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Stable
    }

    fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    fn limits(&self) -> &PoolLimits {
        &self.limits
    }

    fn calculate_out_given_in(&self, pair: &PoolPair, amount_in: Balance) -> Balance {
        let reserves = Normalized::from_pair(pair);
        sell_quote(&reserves, self.ann(), amount_in).map_or(0, U512::saturating_to_u128)
    }

    fn calculate_in_given_out(&self, pair: &PoolPair, amount_out: Balance) -> Balance {
        let reserves = Normalized::from_pair(pair);
        buy_quote(&reserves, self.ann(), amount_out).map_or(0, U512::saturating_to_u128)
    }

    fn spot_price_out_given_in(&self, pair: &PoolPair) -> Balance {
        let reserves = Normalized::from_pair(pair);
        let scale = math::pow10(u32::from(pair.decimals_out));
        spot_sell(&reserves, self.ann(), scale).map_or(0, U512::saturating_to_u128)
    }

    fn spot_price_in_given_out(&self, pair: &PoolPair) -> Balance {
        let reserves = Normalized::from_pair(pair);
        let scale = math::pow10(u32::from(pair.decimals_in));
        spot_buy(&reserves, self.ann(), scale).map_or(0, U512::saturating_to_u128)
    }
}

/// Pair reserves rescaled to a common precision, with the factors
/// needed to move trade amounts in and out of that space.
struct Normalized {
    x: U512,
    y: U512,
    factor_in: U512,
    factor_out: U512,
}

impl Normalized {
    fn from_pair(pair: &PoolPair) -> Self {
        let precision = pair.decimals_in.max(pair.decimals_out);
        let factor_in = U512::from(math::pow10(u32::from(precision - pair.decimals_in)));
        let factor_out = U512::from(math::pow10(u32::from(precision - pair.decimals_out)));
        Self {
            x: U512::from(pair.balance_in) * factor_in,
            y: U512::from(pair.balance_out) * factor_out,
            factor_in,
            factor_out,
        }
    }
}

fn converged(a: U512, b: U512) -> bool {
    let diff = if a > b { a - b } else { b - a };
    diff <= U512::from(STABLE_PRECISION)
}

/// Solves the invariant constant `d` for the given normalized reserves.
///
/// Newton iteration on
/// `d = (ann * s + 2 * d_p) * d / ((ann - 1) * d + 3 * d_p)` with
/// `d_p = d^3 / (4 * x * y)` and `s = x + y`.
fn newton_d(x: U512, y: U512, ann: U512) -> Option<U512> {
    let two = U512::from(2u8);
    let three = U512::from(3u8);
    let sum = x.checked_add(y)?;
    if sum.is_zero() {
        return Some(U512::zero());
    }
    let mut d = sum;
    for _ in 0..STABLE_MAX_ITERATIONS {
        let d_p = d
            .checked_mul(d)?
            .checked_div(x.checked_mul(two)?)?
            .checked_mul(d)?
            .checked_div(y.checked_mul(two)?)?;
        let d_prev = d;
        let numerator = ann.checked_mul(sum)?.checked_add(d_p.checked_mul(two)?)?.checked_mul(d)?;
        let denominator =
            ann.checked_sub(U512::one())?.checked_mul(d)?.checked_add(d_p.checked_mul(three)?)?;
        d = numerator.checked_div(denominator)?;
        if converged(d, d_prev) {
            return Some(d);
        }
    }
    None
}

/// Solves for the counter reserve that keeps the invariant at `d` when
/// the other reserve moves to `reserve`.
///
/// Newton iteration on `y = (y^2 + c) / (2 * y + b - d)` with
/// `c = d^3 / (4 * reserve * ann)` and `b = reserve + d / ann`.
fn newton_y(reserve: U512, d: U512, ann: U512) -> Option<U512> {
    let two = U512::from(2u8);
    let c = d
        .checked_mul(d)?
        .checked_div(reserve.checked_mul(two)?)?
        .checked_mul(d)?
        .checked_div(ann.checked_mul(two)?)?;
    let b = reserve.checked_add(d.checked_div(ann)?)?;
    let mut y = d;
    for _ in 0..STABLE_MAX_ITERATIONS {
        let y_prev = y;
        let numerator = y.checked_mul(y)?.checked_add(c)?;
        let denominator = y.checked_mul(two)?.checked_add(b)?.checked_sub(d)?;
        y = numerator.checked_div(denominator)?;
        if converged(y, y_prev) {
            return Some(y);
        }
    }
    None
}

fn sell_quote(reserves: &Normalized, ann: U512, amount_in: Balance) -> Option<U512> {
    let d = newton_d(reserves.x, reserves.y, ann)?;
    let x_new = reserves.x.checked_add(U512::from(amount_in).checked_mul(reserves.factor_in)?)?;
    let y_new = newton_y(x_new, d, ann)?;
    // Output rounds down.
    reserves.y.checked_sub(y_new)?.checked_div(reserves.factor_out)
}

fn buy_quote(reserves: &Normalized, ann: U512, amount_out: Balance) -> Option<U512> {
    let out_normalized = U512::from(amount_out).checked_mul(reserves.factor_out)?;
    // The reserve cannot cover the requested output.
    if out_normalized >= reserves.y {
        return None;
    }
    let d = newton_d(reserves.x, reserves.y, ann)?;
    let x_new = newton_y(reserves.y - out_normalized, d, ann)?;
    let in_normalized = x_new.checked_sub(reserves.x)?;
    // Charged input rounds up.
    in_normalized
        .checked_add(reserves.factor_in - U512::one())?
        .checked_div(reserves.factor_in)
}

/// The two invariant terms of the marginal price
/// `|dy/dx| = y * (4 * ann * x^2 * y + d^3) / (x * (4 * ann * x * y^2 + d^3))`,
/// evaluated at the current normalized reserves.
fn spot_terms(reserves: &Normalized, ann: U512) -> Option<(U512, U512)> {
    let four = U512::from(4u8);
    let d = newton_d(reserves.x, reserves.y, ann)?;
    let d_cubed = d.checked_mul(d)?.checked_mul(d)?;
    let shared = four.checked_mul(ann)?.checked_mul(reserves.x)?.checked_mul(reserves.y)?;
    let in_term = shared.checked_mul(reserves.x)?.checked_add(d_cubed)?;
    let out_term = shared.checked_mul(reserves.y)?.checked_add(d_cubed)?;
    Some((in_term, out_term))
}

fn spot_sell(reserves: &Normalized, ann: U512, scale: u128) -> Option<U512> {
    let (in_term, out_term) = spot_terms(reserves, ann)?;
    let numerator = reserves.y.checked_mul(in_term)?.checked_mul(U512::from(scale))?;
    let denominator = reserves.x.checked_mul(out_term)?;
    numerator.checked_div(denominator)
}

fn spot_buy(reserves: &Normalized, ann: U512, scale: u128) -> Option<U512> {
    let (in_term, out_term) = spot_terms(reserves, ann)?;
    let numerator = reserves.x.checked_mul(out_term)?.checked_mul(U512::from(scale))?;
    let denominator = reserves.y.checked_mul(in_term)?;
    numerator.checked_div(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SwapError;
    use crate::pool::{PoolFees, XykPool};

    fn token(id: u32, decimals: u8, balance: u128) -> PoolToken {
        PoolToken { id, symbol: format!("TKN{id}"), decimals, balance }
    }

    fn balanced(amplification: u128) -> StableSwapPool {
        StableSwapPool::new(
            "stable-1-2",
            [token(1, 6, 1_000_000), token(2, 6, 1_000_000)],
            amplification,
            PoolLimits::disabled(),
        )
    }

    #[test]
    fn test_balanced_pool_trades_near_parity() {
        let stable = balanced(100);
        let pair = stable.parse_pair(1, 2).unwrap();
        let out = stable.calculate_out_given_in(&pair, 100_000);
        // 10% of the reserve moves the price well under 1%.
        assert!(out > 99_000 && out <= 100_000, "out = {out}");

        // The same trade on a constant-product curve loses over 9%.
        let xyk = XykPool::new(
            "xyk-1-2",
            [token(1, 6, 1_000_000), token(2, 6, 1_000_000)],
            PoolLimits::disabled(),
        );
        let xyk_pair = xyk.parse_pair(1, 2).unwrap();
        assert!(out > xyk.calculate_out_given_in(&xyk_pair, 100_000));
    }

    #[test]
    fn test_amplification_flattens_the_curve() {
        let flat = balanced(100);
        let curved = balanced(1);
        let pair = flat.parse_pair(1, 2).unwrap();
        let out_flat = flat.calculate_out_given_in(&pair, 100_000);
        let out_curved = curved.calculate_out_given_in(&pair, 100_000);
        assert!(out_curved < out_flat);
    }

    #[test]
    fn test_buy_inverts_sell_within_solver_tolerance() {
        let stable = balanced(100);
        let pair = stable.parse_pair(1, 2).unwrap();
        let out = stable.calculate_out_given_in(&pair, 100_000);
        let back = stable.calculate_in_given_out(&pair, out);
        assert!((99_800..=100_200).contains(&back), "back = {back}");
    }

    #[test]
    fn test_balanced_spot_price_is_parity() {
        let stable = balanced(100);
        let pair = stable.parse_pair(1, 2).unwrap();
        assert_eq!(stable.spot_price_out_given_in(&pair), 1_000_000);
        assert_eq!(stable.spot_price_in_given_out(&pair), 1_000_000);
    }

    #[test]
    fn test_mixed_decimals_normalize() {
        // 1_000 whole units on both sides, 12 against 6 decimals.
        let stable = StableSwapPool::new(
            "stable-1-3",
            [token(1, 12, 1_000_000_000_000_000), token(3, 6, 1_000_000_000)],
            100,
            PoolLimits::disabled(),
        );
        let pair = stable.parse_pair(1, 3).unwrap();
        // Balanced, so one whole unit in is one whole unit out at spot.
        assert_eq!(stable.spot_price_out_given_in(&pair), 1_000_000);
        assert_eq!(stable.spot_price_in_given_out(&pair), 1_000_000_000_000);
        // Selling one whole unit realizes just under parity.
        let out = stable.calculate_out_given_in(&pair, 1_000_000_000_000);
        assert!(out > 999_000 && out <= 1_000_000, "out = {out}");
    }

    #[test]
    fn test_exhausting_buy_is_unpriceable() {
        let stable = balanced(100);
        let pair = stable.parse_pair(1, 2).unwrap();
        assert_eq!(stable.calculate_in_given_out(&pair, 1_000_000), 0);
        let outcome = stable.validate_and_buy(&pair, 1_000_000, &PoolFees::fixed(10));
        assert!(outcome.errors.contains(&SwapError::InsufficientLiquidity));
    }

    #[test]
    fn test_empty_side_quotes_zero() {
        let stable = StableSwapPool::new(
            "stable-1-2",
            [token(1, 6, 0), token(2, 6, 1_000_000)],
            100,
            PoolLimits::disabled(),
        );
        let pair = stable.parse_pair(1, 2).unwrap();
        assert_eq!(stable.calculate_out_given_in(&pair, 1_000), 0);
        assert_eq!(stable.spot_price_out_given_in(&pair), 0);
    }

    #[test]
    fn test_zero_amplification_quotes_zero() {
        let stable = balanced(0);
        let pair = stable.parse_pair(1, 2).unwrap();
        assert_eq!(stable.calculate_out_given_in(&pair, 1_000), 0);
    }

    #[test]
    fn test_extreme_imbalance_still_converges() {
        let stable = StableSwapPool::new(
            "stable-1-2",
            [token(1, 6, 1_000), token(2, 6, 1_000_000_000_000)],
            10,
            PoolLimits::disabled(),
        );
        let pair = stable.parse_pair(1, 2).unwrap();
        let out = stable.calculate_out_given_in(&pair, 1_000);
        assert!(out > 0 && out < 1_000_000_000_000);
    }

    #[test]
    fn test_ratio_limits_stay_disabled() {
        let stable = StableSwapPool::new(
            "stable-1-2",
            [token(1, 6, 1_000_000), token(2, 6, 1_000_000)],
            100,
            PoolLimits { min_trading_amount: 1_000, max_in_ratio: 0, max_out_ratio: 0 },
        );
        let pair = stable.parse_pair(1, 2).unwrap();
        let outcome = stable.validate_and_sell(&pair, 500_000, &PoolFees::fixed(10));
        assert!(outcome.errors.is_empty());
    }
}
