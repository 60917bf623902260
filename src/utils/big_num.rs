//! Wide unsigned integers for intermediate routing math.
//!
//! Amounts and prices are `u128` at the API surface; products of two
//! amounts need 256 bits and multi-hop spot-price products need more,
//! so the helpers in [`super::math`] widen into these types and narrow
//! back once at the end.

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

impl U256 {
    /// Narrows to `u128`, saturating at `u128::MAX` when the value does
    /// not fit.
    pub fn saturating_to_u128(self) -> u128 {
        if self > U256::from(u128::MAX) { u128::MAX } else { self.as_u128() }
    }
}

impl U512 {
    /// Narrows to `u128`, saturating at `u128::MAX` when the value does
    /// not fit.
    pub fn saturating_to_u128(self) -> u128 {
        if self > U512::from(u128::MAX) { u128::MAX } else { self.as_u128() }
    }
}
