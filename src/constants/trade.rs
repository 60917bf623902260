//! Trade-level constants shared by the router and the metric helpers.
//!
//! Percentages travel through the crate as basis points: 1 bps is
//! 0.01%, so 10_000 bps is 100%.

/// Basis-point denominator (100% expressed in bps).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Default slippage tolerance applied by transaction builders when the
/// caller does not pass one: 100 bps = 1%.
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Size of the liquidity probe used to rank routes for a spot-price
/// query: 10 bps = 0.1% of the deepest input-asset balance.
pub const SPOT_PROBE_BPS: u32 = 10;

/// Price impact reported when the fee-free reference amount is zero,
/// i.e. the trade would exhaust the pool: -100% in bps.
pub const PCT_100_NEG_BPS: i64 = -10_000;

/// Default cap on route length, counted in hops.
pub const DEFAULT_MAX_HOPS: usize = 4;
