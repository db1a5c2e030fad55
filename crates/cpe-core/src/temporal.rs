//! # Calendar Arithmetic for Age Gating
//!
//! Birth dates arrive as calendar dates (`YYYY-MM-DD`) or as RFC 3339
//! timestamps. Ages are whole calendar years, measured against the current
//! UTC date.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::ValidationError;

/// Parse a birth date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// A timestamp contributes the calendar date as written in its own offset;
/// `1990-06-15T23:30:00-05:00` is 15 June.
pub fn parse_birth_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let s = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    match DateTime::parse_from_rfc3339(s) {
        Ok(ts) => Ok(ts.date_naive()),
        Err(e) => Err(ValidationError::InvalidBirthDate {
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Whole years elapsed between `birth` and `today`.
///
/// One year is subtracted when `today`'s (month, day) falls before the
/// birthday's. A 29 February birthday therefore turns over on 1 March in
/// non-leap years.
///
/// # Errors
///
/// [`ValidationError::BirthDateInFuture`] when `birth` is after `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> Result<u32, ValidationError> {
    if birth > today {
        return Err(ValidationError::BirthDateInFuture {
            birth_date: birth.to_string(),
            today: today.to_string(),
        });
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    // birth <= today guarantees years >= 0.
    Ok(years.max(0) as u32)
}

/// The current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_plain_date() {
        assert_eq!(parse_birth_date("1990-06-15").unwrap(), d("1990-06-15"));
        assert_eq!(parse_birth_date(" 1990-06-15 ").unwrap(), d("1990-06-15"));
    }

    #[test]
    fn rfc3339_keeps_the_written_calendar_date() {
        assert_eq!(
            parse_birth_date("1990-06-15T23:30:00-05:00").unwrap(),
            d("1990-06-15")
        );
        assert_eq!(
            parse_birth_date("1990-06-15T00:30:00+09:00").unwrap(),
            d("1990-06-15")
        );
        assert_eq!(
            parse_birth_date("1990-06-15T10:00:00Z").unwrap(),
            d("1990-06-15")
        );
    }

    #[test]
    fn offset_timestamp_does_not_shift_the_birthday() {
        let birth = parse_birth_date("2003-10-19T23:30:00-05:00").unwrap();
        assert_eq!(age_on(birth, d("2024-10-19")).unwrap(), 21);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_birth_date("not-a-date").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBirthDate { .. }));
        assert!(parse_birth_date("1990-13-01").is_err());
        assert!(parse_birth_date("").is_err());
    }

    #[test]
    fn age_boundary_on_birthday() {
        let today = d("2026-10-19");
        assert_eq!(age_on(d("2005-10-19"), today).unwrap(), 21);
        assert_eq!(age_on(d("2005-10-20"), today).unwrap(), 20);
        assert_eq!(age_on(d("2005-10-18"), today).unwrap(), 21);
    }

    #[test]
    fn leap_day_birthday_turns_over_on_march_first() {
        let birth = d("2004-02-29");
        assert_eq!(age_on(birth, d("2025-02-28")).unwrap(), 20);
        assert_eq!(age_on(birth, d("2025-03-01")).unwrap(), 21);
        assert_eq!(age_on(birth, d("2028-02-29")).unwrap(), 24);
    }

    #[test]
    fn born_today_is_zero() {
        let today = d("2026-10-19");
        assert_eq!(age_on(today, today).unwrap(), 0);
    }

    #[test]
    fn future_birth_date_is_error() {
        let err = age_on(d("2027-01-01"), d("2026-10-19")).unwrap_err();
        assert!(matches!(err, ValidationError::BirthDateInFuture { .. }));
    }
}
