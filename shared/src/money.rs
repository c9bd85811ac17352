//! Money helpers
//!
//! Amounts travel as `f64` on the wire and in storage. Arithmetic happens in
//! `Decimal` and results are rounded to 2 decimal places, half-up.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        let a = to_decimal(0.1);
        let b = to_decimal(0.2);
        assert_eq!(to_f64(a + b), 0.3);
    }

    #[test]
    fn test_to_f64_rounds_half_up() {
        assert_eq!(to_f64(Decimal::new(10005, 3)), 10.01);
        assert_eq!(to_f64(Decimal::new(10004, 3)), 10.0);
        assert_eq!(to_f64(Decimal::from(2700)), 2700.0);
    }
}
