use std::ops::RangeInclusive;

use chrono::NaiveDate;

use super::error::InputError;

/// Four-digit years accepted in request paths
pub(crate) const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Build a calendar date, rejecting values such as month 13, April 31 or year 0
pub fn parse_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, InputError> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(InputError::InvalidDate);
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(InputError::InvalidDate)
}

/// Require a present, non-empty article title
pub fn require_title(title: Option<String>) -> Result<String, InputError> {
    match title {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(InputError::MissingTitle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(
            parse_date(2024, 2, 29),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date(2024, 13, 1), Err(InputError::InvalidDate));
        assert_eq!(parse_date(2024, 4, 31), Err(InputError::InvalidDate));
        assert_eq!(parse_date(2023, 2, 29), Err(InputError::InvalidDate));
        assert_eq!(parse_date(2024, 0, 10), Err(InputError::InvalidDate));
        assert_eq!(parse_date(2024, 1, 0), Err(InputError::InvalidDate));
    }

    #[test]
    fn test_parse_date_year_bounds() {
        assert!(parse_date(1, 1, 1).is_ok());
        assert!(parse_date(9999, 12, 31).is_ok());
        assert_eq!(parse_date(0, 1, 1), Err(InputError::InvalidDate));
        assert_eq!(parse_date(10000, 1, 1), Err(InputError::InvalidDate));
        assert_eq!(parse_date(-5, 6, 1), Err(InputError::InvalidDate));
    }

    #[test]
    fn test_require_title() {
        assert_eq!(require_title(Some("Rust".into())), Ok("Rust".into()));
        assert_eq!(require_title(Some(String::new())), Err(InputError::MissingTitle));
        assert_eq!(require_title(None), Err(InputError::MissingTitle));
    }
}
