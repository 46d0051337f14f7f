//! Memory parsing and formatting for job requests.

/// Parse a memory amount in (fractional) gigabytes.
///
/// Returns None for non-positive, non-finite or unparsable values.
pub fn parse_gb(s: &str) -> Option<f64> {
    let gb: f64 = s.trim().parse().ok()?;
    if !gb.is_finite() || gb <= 0.0 {
        return None;
    }
    Some(gb)
}

/// Convert gigabytes to the megabytes value for `#SBATCH --mem`.
///
/// ACCESS/Bridges counts 1000 MB per GB rather than 1024.
pub fn access_gb_to_mb(gb: f64) -> u64 {
    (gb * 1000.0).round() as u64
}

/// Format gigabytes for display and for C-PAC's `--mem_gb`.
///
/// Whole numbers keep one decimal ("16.0"), other values print as-is ("7.5").
pub fn format_gb(gb: f64) -> String {
    if gb.fract() == 0.0 {
        format!("{:.1}", gb)
    } else {
        format!("{}", gb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gb() {
        assert_eq!(parse_gb("16"), Some(16.0));
        assert_eq!(parse_gb("7.5"), Some(7.5));
        assert_eq!(parse_gb("0"), None);
        assert_eq!(parse_gb("-2"), None);
        assert_eq!(parse_gb("lots"), None);
    }

    #[test]
    fn test_access_gb_to_mb() {
        assert_eq!(access_gb_to_mb(16.0), 16000);
        assert_eq!(access_gb_to_mb(7.5), 7500);
        assert_eq!(access_gb_to_mb(0.0015), 2);
    }

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(16.0), "16.0");
        assert_eq!(format_gb(7.5), "7.5");
    }
}
