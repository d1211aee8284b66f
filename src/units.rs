//! Temperature unit conversion.

/// Convert Celsius to Fahrenheit, rounded to two decimal places.
///
/// Rounding is half-away-from-zero (`f64::round` semantics), so
/// 36.6°C comes out as exactly 97.88°F.
pub fn to_fahrenheit(celsius: f64) -> f64 {
    let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
    (fahrenheit * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_point() {
        assert_eq!(to_fahrenheit(0.0), 32.0);
    }

    #[test]
    fn boiling_point() {
        assert_eq!(to_fahrenheit(100.0), 212.0);
    }

    #[test]
    fn scales_cross_at_minus_forty() {
        assert_eq!(to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn fractional_input_rounds_to_two_decimals() {
        assert_eq!(to_fahrenheit(36.6), 97.88);
        assert_eq!(to_fahrenheit(21.5), 70.7);
    }

    #[test]
    fn dummy_reading_value() {
        assert_eq!(to_fahrenheit(25.0), 77.0);
    }
}
