//! Vietnamese (vi-VN) number formatting.
//!
//! Groups thousands with `.` and uses `,` as the decimal mark, showing at
//! most three fraction digits with trailing zeros dropped.

const MAX_FRACTION_DIGITS: u32 = 3;

/// Formats `value` the way a vi-VN locale displays numbers.
///
/// # Examples
///
/// ```
/// use hoahong::domain::format_vnd;
///
/// assert_eq!(format_vnd(1_000_000.0), "1.000.000");
/// assert_eq!(format_vnd(4.936), "4,936");
/// ```
pub fn format_vnd(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let scale = 10u128.pow(MAX_FRACTION_DIGITS);
    let scaled = (value.abs() * scale as f64).round() as u128;
    let whole = scaled / scale;
    let fraction = scaled % scale;

    let mut out = String::new();
    if value.is_sign_negative() && scaled != 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));

    if fraction != 0 {
        let digits = format!("{:0width$}", fraction, width = MAX_FRACTION_DIGITS as usize);
        out.push(',');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Formats `value` followed by the currency suffix, as used for commission
/// columns.
pub fn format_vnd_suffixed(value: f64) -> String {
    format!("{} VNĐ", format_vnd(value))
}

fn group_thousands(whole: u128) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(format_vnd(0.0), "0");
        assert_eq!(format_vnd(7.0), "7");
        assert_eq!(format_vnd(999.0), "999");
    }

    #[test]
    fn test_thousand_grouping() {
        assert_eq!(format_vnd(1_000.0), "1.000");
        assert_eq!(format_vnd(12_345_678.0), "12.345.678");
        assert_eq!(format_vnd(100_000.0), "100.000");
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(format_vnd(0.4), "0,4");
        assert_eq!(format_vnd(1_234.0 * 0.004), "4,936");
        assert_eq!(format_vnd(1.23456), "1,235");
        assert_eq!(format_vnd(2.5), "2,5");
    }

    #[test]
    fn test_float_noise_hidden() {
        assert_eq!(format_vnd(1_000_000.0 * 0.004), "4.000");
        assert_eq!(format_vnd(0.1 + 0.2), "0,3");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_vnd(-1_500.0), "-1.500");
        assert_eq!(format_vnd(-0.0001), "0");
    }

    #[test]
    fn test_suffixed() {
        assert_eq!(format_vnd_suffixed(5_000.0), "5.000 VNĐ");
    }
}
