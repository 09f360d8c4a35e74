//! Shared utility functions for EVC crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

    /// Day format used for chart labels (pt-BR): "dd/mm/yyyy"
    pub const BR_DAY_FORMAT: &str = "%d/%m/%Y";

    /// Format a NaiveDate as "dd/mm/yyyy"
    pub fn format_day_br(date: &NaiveDate) -> String {
        date.format(BR_DAY_FORMAT).to_string()
    }

    /// Parse a timestamp as sent by the backend.
    ///
    /// Accepts RFC 3339 ("2024-10-01T00:00:00.000Z"), a naive
    /// "YYYY-MM-DD HH:MM:SS" / "YYYY-MM-DDTHH:MM:SS" (taken as UTC) and a
    /// plain "YYYY-MM-DD" (UTC midnight, same as a browser `Date`).
    pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DateError> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Utc.from_utc_datetime(&naive));
            }
        }
        match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive))
                .ok_or_else(|| DateError(s.to_string())),
            Err(_) => Err(DateError(s.to_string())),
        }
    }

    /// Calendar day of `instant` seen from `offset`, moved by `shift_days`.
    pub fn display_day(instant: &DateTime<Utc>, offset: &FixedOffset, shift_days: i64) -> NaiveDate {
        let local = instant.with_timezone(offset).date_naive();
        local
            .checked_add_signed(Duration::days(shift_days))
            .unwrap_or(local)
    }

    /// UTC-03:00, the offset of Brasília.
    pub fn brasilia_offset() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap_or_else(|| Utc.fix())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_format_day_br() {
            let date = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
            assert_eq!(format_day_br(&date), "01/10/2024");
        }

        #[test]
        fn test_parse_timestamp_variants() {
            let expected = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
            assert_eq!(parse_timestamp("2024-10-01T00:00:00.000Z").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-10-01").unwrap(), expected);
            assert_eq!(parse_timestamp(" 2024-10-01 00:00:00 ").unwrap(), expected);
            assert_eq!(parse_timestamp("2024-09-30T21:00:00-03:00").unwrap(), expected);
        }

        #[test]
        fn test_parse_timestamp_rejects_garbage() {
            let err = parse_timestamp("ontem").unwrap_err();
            assert_eq!(err.0, "ontem");
        }

        #[test]
        fn test_display_day_brasilia_shift() {
            // midnight UTC is still the previous evening in Brasília
            let instant = parse_timestamp("2024-10-01").unwrap();
            let offset = brasilia_offset();
            assert_eq!(
                display_day(&instant, &offset, 0),
                NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()
            );
            assert_eq!(
                display_day(&instant, &offset, 1),
                NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
            );
        }
    }
}

/// Percentage parsing and formatting
pub mod percent {
    /// Parse a locale-formatted percentage such as "42,5%".
    ///
    /// One "%" is stripped and the first "," becomes the decimal point, then
    /// the longest leading decimal number is read (trailing junk is ignored).
    /// Returns `None` when no number can be read.
    pub fn parse_locale_percent(raw: &str) -> Option<f64> {
        let cleaned = raw.replacen('%', "", 1).replacen(',', ".", 1);
        parse_leading_decimal(&cleaned)
    }

    /// Read the longest decimal prefix of `s` after leading whitespace.
    pub fn parse_leading_decimal(s: &str) -> Option<f64> {
        let s = s.trim_start();
        let bytes = s.as_bytes();
        let mut end = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            end += 1;
        }
        let int_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        let mut digits = end - int_start;
        if end < bytes.len() && bytes[end] == b'.' {
            let frac_start = end + 1;
            let mut frac_end = frac_start;
            while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
                frac_end += 1;
            }
            digits += frac_end - frac_start;
            if digits > 0 {
                end = frac_end;
            }
        }
        if digits == 0 {
            return None;
        }
        if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
                exp_end += 1;
            }
            let exp_digits_start = exp_end;
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            if exp_end > exp_digits_start {
                end = exp_end;
            }
        }
        s[..end].parse::<f64>().ok()
    }

    /// Axis and tooltip label: `"<value>% dos votos"` with two decimals.
    pub fn format_percentage(value: f64) -> String {
        format!("{:.2}% dos votos", value)
    }

}

/// Error types
pub mod error {
    use std::fmt;

    /// A date string that none of the accepted formats could read.
    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
