//! Human readable rendering of base-unit amounts.
//!
//! All formatting is integer based. Amounts never pass through floats,
//! so the rendered string is exact for any `u128` input.

use crate::utils::math::pow10;

/// Renders `amount`, given in base units, as a decimal string with up to
/// `decimals` fractional digits. Trailing zeros in the fractional part are
/// trimmed and a bare integer is returned when the fraction is zero.
///
/// # Arguments
///
/// * `amount` - Amount in base units
/// * `decimals` - Number of base-unit digits that form the fractional part
///
/// # Returns
///
/// The exact decimal representation, e.g. `to_human(1_500_000, 6)` is `"1.5"`.
pub fn to_human(amount: u128, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let scale = pow10(decimals as u32);
    let whole = amount / scale;
    let frac = amount % scale;

    if frac == 0 {
        return whole.to_string();
    }

    let mut frac_str = format!("{frac:0width$}", width = decimals as usize);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }

    format!("{whole}.{frac_str}")
}

/// Renders a basis-point quantity as a percent string with two fractional
/// digits, e.g. `bps_to_percent(30)` is `"0.30"` and `bps_to_percent(-150)`
/// is `"-1.50"`.
pub fn bps_to_percent(bps: i64) -> String {
    let sign = if bps < 0 { "-" } else { "" };
    let abs = bps.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_human_whole_amount() {
        assert_eq!(to_human(2_000_000, 6), "2");
        assert_eq!(to_human(0, 6), "0");
    }

    #[test]
    fn test_to_human_trims_trailing_zeros() {
        assert_eq!(to_human(1_500_000, 6), "1.5");
        assert_eq!(to_human(1_230_000_000_000, 12), "1.23");
    }

    #[test]
    fn test_to_human_preserves_leading_fraction_zeros() {
        assert_eq!(to_human(1_000_001, 6), "1.000001");
        assert_eq!(to_human(42, 6), "0.000042");
    }

    #[test]
    fn test_to_human_zero_decimals() {
        assert_eq!(to_human(12_345, 0), "12345");
    }

    #[test]
    fn test_bps_to_percent() {
        assert_eq!(bps_to_percent(30), "0.30");
        assert_eq!(bps_to_percent(10_000), "100.00");
        assert_eq!(bps_to_percent(-150), "-1.50");
        assert_eq!(bps_to_percent(0), "0.00");
    }
}
