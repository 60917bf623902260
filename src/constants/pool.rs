//! Pool-level defaults and solver bounds.

/// Smallest trade a pool accepts, in raw base units of the driving
/// asset. Trades below it are flagged, not rejected.
pub const DEFAULT_MIN_TRADING_AMOUNT: u128 = 1_000;

/// Default cap on trade input relative to the input-side reserve: a
/// ratio of `r` allows at most `reserve / r` in. Zero disables the
/// check.
pub const DEFAULT_MAX_IN_RATIO: u128 = 3;

/// Default cap on trade output relative to the output-side reserve.
/// Zero disables the check.
pub const DEFAULT_MAX_OUT_RATIO: u128 = 3;

/// Iteration cap for the stable-swap invariant solver.
pub const STABLE_MAX_ITERATIONS: u32 = 255;

/// Convergence threshold for the stable-swap solver, in normalized
/// base units.
pub const STABLE_PRECISION: u128 = 1;
