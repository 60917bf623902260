//! Integer math shared by the pool curves and the route metrics.
//!
//! Everything here is integer-only fixed-point arithmetic. Percentages
//! travel as basis points (1 bps = 0.01%), amounts as raw base units.
//! Intermediate products are widened into [`U256`]/[`U512`] and
//! narrowed back exactly once, so callers never see a silent wrap.

use crate::constants::trade::{BPS_DENOMINATOR, PCT_100_NEG_BPS};
use crate::utils::big_num::{U256, U512};

/// Returns `10^exp` as `u128`.
///
/// Exponents above 38 do not fit in 128 bits and saturate to
/// `u128::MAX`; decimal exponents in this crate come from token
/// decimals and stay far below that.
pub fn pow10(exp: u32) -> u128 {
    10u128.checked_pow(exp).unwrap_or(u128::MAX)
}

/// Computes `a * b / denominator` rounded down, widening through 256
/// bits so the product cannot overflow.
///
/// Returns 0 when `denominator` is 0; callers treat an unpriceable
/// quote as "no liquidity" rather than a panic.
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        return 0;
    }
    let product = U256::from(a) * U256::from(b);
    (product / U256::from(denominator)).saturating_to_u128()
}

/// Computes `a * b / denominator` rounded up.
///
/// Returns 0 when `denominator` is 0.
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        return 0;
    }
    let product = U256::from(a) * U256::from(b);
    let den = U256::from(denominator);
    let quotient = product / den;
    let rounded = if product % den > U256::zero() { quotient + U256::one() } else { quotient };
    rounded.saturating_to_u128()
}

/// Takes `bps` basis points of `amount`, rounded down.
///
/// This is the rounding used for buffers that protect the caller, such
/// as slippage and the spot-price liquidity probe.
pub fn apply_bps(amount: u128, bps: u32) -> u128 {
    mul_div_floor(amount, u128::from(bps), BPS_DENOMINATOR)
}

/// Takes `bps` basis points of `amount`, rounded up.
///
/// This is the rounding used for pool fees, which always round in the
/// pool's favor.
pub fn apply_bps_ceil(amount: u128, bps: u32) -> u128 {
    mul_div_ceil(amount, u128::from(bps), BPS_DENOMINATOR)
}

/// Signed relative difference of `amount` from `reference`, in basis
/// points: `(amount - reference) / reference * 10_000`.
///
/// A zero `reference` cannot anchor a comparison; by convention it
/// yields -10_000 (-100%), the same sentinel the price-impact metric
/// reports for a trade that exhausts a pool. Results are clamped to
/// the `i64` range.
pub fn diff_to_ref_bps(amount: u128, reference: u128) -> i64 {
    if reference == 0 {
        return PCT_100_NEG_BPS;
    }
    let reference_wide = U256::from(reference);
    let scale = U256::from(BPS_DENOMINATOR);
    if amount >= reference {
        let diff = U256::from(amount - reference) * scale / reference_wide;
        i64::try_from(diff.saturating_to_u128()).unwrap_or(i64::MAX)
    } else {
        let diff = U256::from(reference - amount) * scale / reference_wide;
        i64::try_from(diff.saturating_to_u128()).map(|d| -d).unwrap_or(i64::MIN)
    }
}

/// Route fee for a sell, in basis points: the shortfall of the realized
/// output `delta` below the fee-free output `delta0`, relative to
/// `delta0`.
///
/// Returns 0 when `delta0` is 0 (no reference) or when `delta` somehow
/// exceeds it.
pub fn sell_fee_bps(delta0: u128, delta: u128) -> u32 {
    if delta0 == 0 || delta >= delta0 {
        return 0;
    }
    let fee = mul_div_floor(delta0 - delta, BPS_DENOMINATOR, delta0);
    u32::try_from(fee).unwrap_or(u32::MAX)
}

/// Route fee for a buy, in basis points: the excess of the realized
/// input `delta` over the fee-free input `delta0`, relative to
/// `delta0`.
///
/// Returns 0 when `delta0` is 0 or when `delta` is not above it.
pub fn buy_fee_bps(delta0: u128, delta: u128) -> u32 {
    if delta0 == 0 || delta <= delta0 {
        return 0;
    }
    let fee = mul_div_floor(delta - delta0, BPS_DENOMINATOR, delta0);
    u32::try_from(fee).unwrap_or(u32::MAX)
}

/// Multiplies all `factors` together, then divides once by
/// `10^scale_decimals`, rounding down.
///
/// Used to combine per-hop spot prices into a route price: multiplying
/// everything before the single division keeps the full precision of
/// the intermediate product. The product is carried in 512 bits, which
/// covers any realistic route; a wider product saturates, and a scale
/// past 512 bits divides any product to zero.
pub fn product_div_pow10(factors: &[u128], scale_decimals: u32) -> u128 {
    let mut product = U512::one();
    for factor in factors {
        product = product.saturating_mul(U512::from(*factor));
    }
    // 10^155 no longer fits in 512 bits and exceeds every representable
    // product.
    let Some(scale) = U512::from(10).checked_pow(U512::from(scale_decimals)) else {
        return 0;
    };
    (product / scale).saturating_to_u128()
}
