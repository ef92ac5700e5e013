//! Presentation policy for reports.

use crate::config::{HarnessConfig, BAR_UNIT_PERCENT, STABILITY_THRESHOLDS};

/// Glyph for one star of stability
pub const STAR: char = '★';

/// Marker placed before the fastest task's name in the table
pub const FASTEST_MARKER: &str = "* ";

/// Maps a relative margin of error to a 1-5 star rating.
///
/// `thresholds[i]` is the exclusive upper bound of the `5 - i` star band;
/// anything at or above the last threshold gets one star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityPolicy {
    pub thresholds: [f64; 4],
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            thresholds: STABILITY_THRESHOLDS,
        }
    }
}

impl StabilityPolicy {
    pub fn stars(&self, relative_margin_of_error: f64) -> usize {
        let band = self
            .thresholds
            .iter()
            .position(|limit| relative_margin_of_error < *limit)
            .unwrap_or(self.thresholds.len());
        5 - band
    }

    pub fn rating(&self, relative_margin_of_error: f64) -> String {
        std::iter::repeat(STAR)
            .take(self.stars(relative_margin_of_error))
            .collect()
    }
}

/// Formatting options shared by every group report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportStyle {
    /// Percentage of relative performance drawn as one bar glyph
    pub bar_unit_percent: f64,
    pub stability: StabilityPolicy,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            bar_unit_percent: BAR_UNIT_PERCENT,
            stability: StabilityPolicy::default(),
        }
    }
}

impl ReportStyle {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            bar_unit_percent: config.bar_unit_percent,
            stability: StabilityPolicy {
                thresholds: config.stability_thresholds,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_star_bands() {
        let policy = StabilityPolicy::default();
        assert_eq!(policy.stars(0.5), 5);
        assert_eq!(policy.stars(1.0), 4);
        assert_eq!(policy.stars(4.99), 4);
        assert_eq!(policy.stars(7.0), 3);
        assert_eq!(policy.stars(20.0), 2);
        assert_eq!(policy.stars(50.0), 1);
        assert_eq!(policy.stars(f64::INFINITY), 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let policy = StabilityPolicy {
            thresholds: [0.1, 0.2, 0.3, 0.4],
        };
        assert_eq!(policy.rating(0.25), "★★★");
        assert_eq!(policy.rating(1.0), "★");
    }
}
