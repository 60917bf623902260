//! Constant-product pool.
//!
//! Pricing follows `x * y = k`. Selling `a` of the input asset yields
//! `b_out * a / (b_in + a)`; buying `b` of the output asset costs
//! `b_in * b / (b_out - b)`. Quotient rounding always goes against the
//! trader: sell output rounds down, buy input rounds up.

use crate::types::{Balance, PoolId};
use crate::utils::math;

use super::types::{PoolLimits, PoolPair, PoolToken, PoolType};
use super::Pool;

/// Two-asset constant-product pool.
#[derive(Debug, Clone)]
pub struct XykPool {
    id: PoolId,
    tokens: [PoolToken; 2],
    limits: PoolLimits,
}

impl XykPool {
    pub fn new(id: impl Into<PoolId>, tokens: [PoolToken; 2], limits: PoolLimits) -> Self {
        Self { id: id.into(), tokens, limits }
    }
}

impl Pool for XykPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    fn pool_type(&self) -> PoolType {
        PoolType::Xyk
    }

    fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    fn limits(&self) -> &PoolLimits {
        &self.limits
    }

    fn calculate_out_given_in(&self, pair: &PoolPair, amount_in: Balance) -> Balance {
        let Some(new_reserve_in) = pair.balance_in.checked_add(amount_in) else {
            return 0;
        };
        math::mul_div_floor(pair.balance_out, amount_in, new_reserve_in)
    }

    fn calculate_in_given_out(&self, pair: &PoolPair, amount_out: Balance) -> Balance {
        // The reserve cannot cover the requested output.
        if amount_out >= pair.balance_out {
            return 0;
        }
        math::mul_div_ceil(pair.balance_in, amount_out, pair.balance_out - amount_out)
    }

    fn spot_price_out_given_in(&self, pair: &PoolPair) -> Balance {
        math::mul_div_floor(
            pair.balance_out,
            math::pow10(u32::from(pair.decimals_in)),
            pair.balance_in,
        )
    }

    fn spot_price_in_given_out(&self, pair: &PoolPair) -> Balance {
        math::mul_div_floor(
            pair.balance_in,
            math::pow10(u32::from(pair.decimals_out)),
            pair.balance_out,
        )
    }
}
