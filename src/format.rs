//! Number formatting for metric cards and tables.

/// Compact notation: millions as "M", everything else in thousands as "K".
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return "-".to_string();
    }
    if num > 1_000_000.0 {
        if num % 1_000_000.0 == 0.0 {
            return format!("{} M", (num / 1_000_000.0) as i64);
        }
        return format!("{:.1} M", num / 1_000_000.0);
    }
    format!("{} K", (num / 1000.0).floor() as i64)
}

/// Table display: whole numbers without decimals, others with up to two.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_millions_have_no_decimals() {
        assert_eq!(format_number(2_000_000.0), "2 M");
    }

    #[test]
    fn fractional_millions_round_to_one_decimal() {
        assert_eq!(format_number(2_345_678.0), "2.3 M");
        assert_eq!(format_number(1_050_001.0), "1.1 M");
    }

    #[test]
    fn exactly_one_million_is_thousands() {
        assert_eq!(format_number(1_000_000.0), "1000 K");
    }

    #[test]
    fn small_numbers_floor_to_thousands() {
        assert_eq!(format_number(999.0), "0 K");
        assert_eq!(format_number(45_999.0), "45 K");
        assert_eq!(format_number(-1500.0), "-2 K");
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(2021.0), "2021");
        assert_eq!(format_value(7.25), "7.25");
        assert_eq!(format_value(7.5), "7.5");
        assert_eq!(format_value(0.004), "0");
        assert_eq!(format_value(f64::NAN), "-");
    }
}
