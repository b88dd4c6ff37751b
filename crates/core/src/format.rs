//! Display formatting for catalog string fields.
//!
//! The upstream catalog encodes every numeric stat as a string and uses
//! sentinels such as `"unknown"` or `"n/a"`. These helpers format values
//! that parse and pass everything else through untouched.

use chrono::{DateTime, NaiveDate};

/// Maximum number of fraction digits kept by [`format_number`].
const MAX_FRACTION_DIGITS: usize = 3;

/// Format a numeric string with `,` thousands separators.
///
/// Non-numeric input (including non-finite values) is returned unchanged.
///
/// # Examples
///
/// ```
/// use holonet_core::format::format_number;
///
/// assert_eq!(format_number("1000"), "1,000");
/// assert_eq!(format_number("unknown"), "unknown");
/// ```
pub fn format_number(value: &str) -> String {
    let parsed = match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => return value.to_string(),
    };

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, parsed.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if parsed.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a catalog date (`YYYY-MM-DD` or an RFC 3339 timestamp) as
/// `Month D, YYYY`.
///
/// Anything that does not parse is returned unchanged.
///
/// # Examples
///
/// ```
/// use holonet_core::format::format_date;
///
/// assert_eq!(format_date("1977-05-25"), "May 25, 1977");
/// assert_eq!(format_date("invalid-date"), "invalid-date");
/// ```
pub fn format_date(value: &str) -> String {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()));

    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- format_number -------------------------------------------------------

    #[test]
    fn formats_thousands() {
        assert_eq!(format_number("1000"), "1,000");
        assert_eq!(format_number("5000"), "5,000");
        assert_eq!(format_number("1000000"), "1,000,000");
    }

    #[test]
    fn small_numbers_are_unchanged() {
        assert_eq!(format_number("0"), "0");
        assert_eq!(format_number("77"), "77");
        assert_eq!(format_number("999"), "999");
    }

    #[test]
    fn keeps_up_to_three_fraction_digits() {
        assert_eq!(format_number("1.5"), "1.5");
        assert_eq!(format_number("1234.5678"), "1,234.568");
        assert_eq!(format_number("2.000"), "2");
    }

    #[test]
    fn negative_numbers_keep_sign() {
        assert_eq!(format_number("-12500"), "-12,500");
    }

    #[test]
    fn non_numeric_passes_through() {
        assert_eq!(format_number("unknown"), "unknown");
        assert_eq!(format_number("invalid"), "invalid");
        assert_eq!(format_number("n/a"), "n/a");
        assert_eq!(format_number("1,000"), "1,000");
        assert_eq!(format_number(""), "");
    }

    #[test]
    fn non_finite_passes_through() {
        assert_eq!(format_number("inf"), "inf");
        assert_eq!(format_number("NaN"), "NaN");
    }

    // -- format_date ---------------------------------------------------------

    #[test]
    fn formats_release_date() {
        assert_eq!(format_date("1977-05-25"), "May 25, 1977");
        assert_eq!(format_date("2005-05-19"), "May 19, 2005");
    }

    #[test]
    fn formats_rfc3339_timestamp() {
        assert_eq!(format_date("2014-12-10T16:36:50.509000Z"), "December 10, 2014");
    }

    #[test]
    fn invalid_date_passes_through() {
        assert_eq!(format_date("invalid-date"), "invalid-date");
        assert_eq!(format_date("1977-13-40"), "1977-13-40");
    }
}
