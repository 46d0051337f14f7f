//! Duration parsing and formatting for job limits.

use std::time::Duration;

/// Parse a duration given in (fractional) hours, e.g. "48" or "1.5".
///
/// Returns None for negative, non-finite or unparsable values.
pub fn parse_hours(s: &str) -> Option<Duration> {
    let hours: f64 = s.trim().parse().ok()?;
    if !hours.is_finite() || hours < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(hours * 3600.0).ok()
}

/// Parse a duration in SLURM formats.
///
/// Supports:
/// - D-HH:MM:SS (SLURM time limit with days)
/// - HH:MM:SS
/// - MM:SS
/// - Seconds as integer
///
/// Returns None for "UNLIMITED", empty strings, any field that is not a
/// plain number, and limits too large to represent.
pub fn parse_duration(s: &str) -> Option<Duration> {
    if s.is_empty() || s == "UNLIMITED" || s == "-" {
        return None;
    }

    // Check for day separator (D-HH:MM:SS)
    let (days, time_part) = match s.split_once('-') {
        Some((days, rest)) => (parse_field(days)?, rest),
        None => (0, s),
    };

    let time_parts = time_part
        .split(':')
        .map(parse_field)
        .collect::<Option<Vec<u64>>>()?;

    let seconds = match time_parts.as_slice() {
        [hours, mins, secs] => hours
            .checked_mul(3600)?
            .checked_add(mins.checked_mul(60)?)?
            .checked_add(*secs)?,
        [mins, secs] => mins.checked_mul(60)?.checked_add(*secs)?,
        [secs] => *secs,
        _ => return None,
    };

    days.checked_mul(86400)?
        .checked_add(seconds)
        .map(Duration::from_secs)
}

/// A non-empty run of ASCII digits.
fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Format a duration as `HH:MM:SS` for `#SBATCH --time`.
///
/// Hours are not folded into days, so 48 hours renders as `48:00:00`.
/// Sub-second remainders are rounded to the nearest second.
pub fn format_hms(duration: Duration) -> String {
    let seconds = duration.as_secs_f64().round() as u64;
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

/// Render a duration as fractional hours, the unit the CLI accepts.
pub fn format_hours(duration: Duration) -> String {
    let hours = duration.as_secs_f64() / 3600.0;
    if hours.fract() == 0.0 {
        format!("{:.1}", hours)
    } else {
        format!("{}", hours)
    }
}
