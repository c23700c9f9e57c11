//! Chip amounts are carried as `i64` minor units (chips x 100) everywhere
//! in the crate. Text never goes through floating point on the way in or
//! out, so long hands don't accumulate drift.

use thiserror::Error;

/// Minor units per chip.
pub const MINOR_UNITS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("{0:?} is not a non-negative decimal amount")]
    Malformed(String),
    #[error("{0:?} has more than two fraction digits")]
    TooPrecise(String),
    #[error("{0:?} does not fit in minor units")]
    Overflow(String),
}

/// Parse a decimal chip amount such as `6`, `0.5` or `1,250.25` into
/// minor units. A leading currency symbol is ignored.
///
/// ```
/// use hh_acpc::core::parse_amount;
///
/// assert_eq!(Ok(600), parse_amount("6"));
/// assert_eq!(Ok(50), parse_amount("$0.5"));
/// assert_eq!(Ok(125_025), parse_amount("1,250.25"));
/// assert!(parse_amount("1.255").is_err());
/// ```
pub fn parse_amount(text: &str) -> Result<i64, AmountError> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix(['$', '€', '£'])
        .unwrap_or(trimmed)
        .replace(',', "");

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits.as_str(), ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::Malformed(text.to_string()));
    }
    if fraction.len() > 2 {
        return Err(AmountError::TooPrecise(text.to_string()));
    }

    let overflow = || AmountError::Overflow(text.to_string());
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| overflow())? * 10,
        _ => fraction.parse().map_err(|_| overflow())?,
    };

    whole
        .checked_mul(MINOR_UNITS)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(overflow)
}

/// Format minor units the way hand histories print them: whole chip
/// amounts without decimals, anything else with exactly two.
///
/// ```
/// use hh_acpc::core::format_amount;
///
/// assert_eq!("6", format_amount(600));
/// assert_eq!("0.50", format_amount(50));
/// ```
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let units = MINOR_UNITS as u64;
    if abs % units == 0 {
        format!("{sign}{}", abs / units)
    } else {
        format!("{sign}{}.{:02}", abs / units, abs % units)
    }
}

/// Format minor units with exactly two fraction digits, as the compact
/// notation expects.
pub fn format_acpc(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    let units = MINOR_UNITS as u64;
    format!("{sign}{}.{:02}", abs / units, abs % units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fraction() {
        assert_eq!(Ok(0), parse_amount("0"));
        assert_eq!(Ok(2000), parse_amount("20"));
        assert_eq!(Ok(2050), parse_amount("20.5"));
        assert_eq!(Ok(2005), parse_amount("20.05"));
        assert_eq!(Ok(50), parse_amount(".5"));
        assert_eq!(Ok(2000), parse_amount("20."));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_amount(""), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_amount("."), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_amount("-4"), Err(AmountError::Malformed(_))));
        assert!(matches!(parse_amount("4x"), Err(AmountError::Malformed(_))));
        assert!(matches!(
            parse_amount("4.125"),
            Err(AmountError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_parse_overflow() {
        assert!(matches!(
            parse_amount("92233720368547758070"),
            Err(AmountError::Overflow(_))
        ));
        assert!(matches!(
            parse_amount("922337203685477580"),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_format() {
        assert_eq!("1500", format_amount(150_000));
        assert_eq!("0.05", format_amount(5));
        assert_eq!("12.30", format_amount(1230));
        assert_eq!("-4", format_amount(-400));
    }

    #[test]
    fn test_format_acpc() {
        assert_eq!("6.00", format_acpc(600));
        assert_eq!("0.05", format_acpc(5));
        assert_eq!("240.50", format_acpc(24_050));
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for minor in [0, 1, 99, 100, 101, 123_456, 7_000_000] {
            assert_eq!(Ok(minor), parse_amount(&format_amount(minor)));
            assert_eq!(Ok(minor), parse_amount(&format_acpc(minor)));
        }
    }
}
