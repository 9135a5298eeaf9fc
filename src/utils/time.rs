//! Timecode parsing and canonical formatting
//!
//! Accepted forms are `ss`, `mm:ss` and `hh:mm:ss`, each with optional
//! fractional seconds. A bare seconds value may exceed 60; in the colon forms
//! the minutes and seconds components must stay below 60.

use crate::domain::errors::{SliceError, SliceResult};

/// Parse a human timecode into seconds
pub fn parse_timecode(text: &str) -> SliceResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SliceError::timecode(text, "timecode cannot be empty"));
    }

    let parts: Vec<&str> = trimmed.split(':').map(str::trim).collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (
            parse_whole(text, "hours", h)?,
            parse_whole(text, "minutes", m)?,
            split_seconds(text, s)?,
        ),
        [m, s] => (0, parse_whole(text, "minutes", m)?, split_seconds(text, s)?),
        [s] => (0, 0, split_seconds(text, s)?),
        _ => {
            return Err(SliceError::timecode(
                text,
                "timecode must be ss, mm:ss, or hh:mm:ss",
            ))
        }
    };
    let (whole_seconds, fraction) = seconds;

    if hours < 0 || minutes < 0 {
        return Err(SliceError::timecode(text, "timecode must be non-negative"));
    }
    if parts.len() > 1 && (minutes >= 60 || whole_seconds >= 60) {
        return Err(SliceError::timecode(
            text,
            "minutes and seconds must be < 60 in colon forms",
        ));
    }

    // Whole seconds are summed exactly, then the fraction is reattached as
    // decimal text so the result is the f64 nearest the written value.
    let total = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60))
        .and_then(|hm| hm.checked_add(whole_seconds))
        .ok_or_else(|| SliceError::timecode(text, "timecode is out of range"))?;
    let decimal = if fraction.is_empty() {
        total.to_string()
    } else {
        format!("{}.{}", total, fraction)
    };
    decimal
        .parse::<f64>()
        .map_err(|_| SliceError::timecode(text, "timecode is out of range"))
}

/// Render seconds with six decimals, then strip trailing zeros and the point
///
/// This is the form handed to the encoding tool's trim options, so it never
/// uses exponent notation or locale separators.
pub fn format_seconds(seconds: f64) -> String {
    // avoid "-0"
    let value = if seconds == 0.0 { 0.0 } else { seconds };
    let fixed = format!("{:.6}", value);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Make a user-typed timecode safe to embed in a file name
pub fn sanitize_for_filename(timecode: &str) -> String {
    timecode.trim().replace(':', "-").replace('.', "_")
}

fn parse_whole(text: &str, what: &str, part: &str) -> SliceResult<i64> {
    part.parse::<i64>()
        .map_err(|_| SliceError::timecode(text, format!("invalid {} component '{}'", what, part)))
}

/// Split `ss[.fff]` into whole seconds and the fractional digits
fn split_seconds<'a>(text: &str, part: &'a str) -> SliceResult<(i64, &'a str)> {
    let invalid = || SliceError::timecode(text, format!("invalid seconds component '{}'", part));
    let (whole, fraction) = part.split_once('.').unwrap_or((part, ""));
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
        return Err(invalid());
    }
    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().map_err(|_| invalid())?
    };
    Ok((whole, fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_seconds() {
        assert_eq!(parse_timecode("90.5").unwrap(), 90.5);
        assert_eq!(parse_timecode("  125 ").unwrap(), 125.0);
    }

    #[test]
    fn test_parse_mm_ss() {
        assert_eq!(parse_timecode("01:30").unwrap(), 90.0);
        assert_eq!(parse_timecode("1:30.25").unwrap(), 90.25);
    }

    #[test]
    fn test_parse_hh_mm_ss() {
        assert_eq!(parse_timecode("01:02:03.5").unwrap(), 3723.5);
        assert_eq!(parse_timecode("100:00:00").unwrap(), 360000.0);
    }

    #[test]
    fn test_parse_rejects_invalid_forms() {
        for bad in ["", "   ", "1:2:3:4", "-1:00", "1:61", "0:60:00", "60:00", "abc", "1:xx", "-5", "1e2", "1:2.3.4", "."] {
            let err = parse_timecode(bad).unwrap_err();
            assert!(
                matches!(err, SliceError::InvalidTimecode { .. }),
                "expected InvalidTimecode for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(parse_timecode("inf").is_err());
        assert!(parse_timecode("NaN").is_err());
    }

    #[test]
    fn test_format_strips_trailing_zeros() {
        assert_eq!(format_seconds(10.0), "10");
        assert_eq!(format_seconds(10.5), "10.5");
        assert_eq!(format_seconds(0.0), "0");
        assert_eq!(format_seconds(-0.0), "0");
        assert_eq!(format_seconds(100.0), "100");
        assert_eq!(format_seconds(2.123456), "2.123456");
    }

    #[test]
    fn test_format_never_uses_exponent() {
        assert_eq!(format_seconds(1e-7), "0");
        assert_eq!(format_seconds(1e9), "1000000000");
        assert_eq!(format_seconds(0.000001), "0.000001");
    }

    #[test]
    fn test_round_trip_through_canonical_form() {
        for text in ["0", "5", "75.25", "01:30", "59:59.5", "1:02:03.5", "10:00:00", "0:00:00.125"] {
            let seconds = parse_timecode(text).unwrap();
            let again = parse_timecode(&format_seconds(seconds)).unwrap();
            assert_eq!(again, seconds, "round trip of {:?}", text);
        }
    }

    #[test]
    fn test_colon_forms_round_trip_on_a_dense_grid() {
        let mut failures = Vec::new();
        for hours in 0..3 {
            for minutes in 0..60 {
                for seconds in 0..60 {
                    for centis in 0..100 {
                        let text = format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis);
                        let parsed = parse_timecode(&text).unwrap();
                        let again = parse_timecode(&format_seconds(parsed)).unwrap();
                        if again != parsed {
                            failures.push(text);
                        }
                    }
                }
            }
        }
        assert!(failures.is_empty(), "{} failures, first {:?}", failures.len(), failures.first());
    }

    #[test]
    fn test_colon_form_equals_its_decimal_spelling() {
        assert_eq!(parse_timecode("0:01:08.04").unwrap(), 68.04);
        assert_eq!(parse_timecode("1:08.21").unwrap(), 68.21);
        assert_eq!(parse_timecode("2:00:00.29").unwrap(), 7200.29);
        assert_eq!(parse_timecode(".5").unwrap(), 0.5);
        assert_eq!(parse_timecode("7.").unwrap(), 7.0);
    }

    #[test]
    fn test_sanitize_for_filename() {
        assert_eq!(sanitize_for_filename("01:02:03.5"), "01-02-03_5");
        assert_eq!(sanitize_for_filename("42"), "42");
    }
}
