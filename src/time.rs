//! Time-of-day parsing for dispatcher input.
//!
//! All schedule times are seconds since midnight of the service day.

use crate::error::{RerouteError, Result};

/// Parse a 24h `HH:MM` string into seconds since midnight.
///
/// Hours up to 24 are accepted so end-of-day cutoffs can be expressed.
pub fn time_to_seconds(hhmm: &str) -> Result<i64> {
    let bytes = hhmm.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return Err(RerouteError::InvalidTimeFormat(hhmm.to_string()));
    }

    let digit = |i: usize| i64::from(bytes[i] - b'0');
    let hour = digit(0) * 10 + digit(1);
    let minute = digit(3) * 10 + digit(4);

    if hour > 24 || minute > 59 {
        return Err(RerouteError::InvalidTimeValue(hhmm.to_string()));
    }

    Ok(hour * 3600 + minute * 60)
}

/// Format seconds since midnight as `HH:MM`, truncating seconds.
pub fn seconds_to_hhmm(seconds: i64) -> String {
    let minutes = seconds.max(0) / 60;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
