//! Human-readable number formatting for reports.

/// Formats an operations-per-second rate with an appropriate suffix (K, M, B)
pub fn format_ops(ops: f64) -> String {
    if ops >= 1_000_000_000.0 {
        format!("{:.2}B", ops / 1_000_000_000.0)
    } else if ops >= 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops >= 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{:.0}", ops)
    }
}

/// Formats a duration given in seconds using the largest unit below it
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1e-6 {
        format!("{:.2}ns", seconds * 1e9)
    } else if seconds < 1e-3 {
        format!("{:.2}μs", seconds * 1e6)
    } else if seconds < 1.0 {
        format!("{:.2}ms", seconds * 1e3)
    } else {
        format!("{:.2}s", seconds)
    }
}

/// Formats a relative margin of error as `±x.xx%`
pub fn format_margin(percent: f64) -> String {
    format!("±{:.2}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ops_suffixes() {
        assert_eq!(format_ops(0.0), "0");
        assert_eq!(format_ops(999.4), "999");
        assert_eq!(format_ops(12_345.0), "12.35K");
        assert_eq!(format_ops(2_500_000.0), "2.50M");
        assert_eq!(format_ops(3_000_000_000.0), "3.00B");
    }

    #[test]
    fn test_format_duration_units() {
        assert_eq!(format_duration(0.0), "0.00ns");
        assert_eq!(format_duration(250e-9), "250.00ns");
        assert_eq!(format_duration(1.5e-6), "1.50μs");
        assert_eq!(format_duration(0.0125), "12.50ms");
        assert_eq!(format_duration(2.0), "2.00s");
    }

    #[test]
    fn test_format_margin() {
        assert_eq!(format_margin(1.234), "±1.23%");
    }
}
