//! Reduction of per-invocation samples into summary statistics.
//!
//! All durations are in seconds.
//!
//! # Percentiles
//!
//! Percentiles use the nearest-rank rule on the ascending sorted samples:
//! `rank = ceil(p / 100 * n)` clamped to `1..=n`, value = `sorted[rank - 1]`.
//! The rule never interpolates, so every percentile is an observed sample.
//!
//! # Margin of error
//!
//! `sd` is the sample standard deviation (Bessel's correction), `sem = sd / sqrt(n)`,
//! `moe = sem * t` with `t` the two-tailed 95% Student-t critical value for
//! `n - 1` degrees of freedom, and `rme = moe / mean * 100`.

use serde::{Deserialize, Serialize};

/// Two-tailed 95% Student-t critical values for 1..=30 degrees of freedom.
const T_TABLE_95: [f64; 30] = [
    12.706, 4.303, 3.182, 2.776, 2.571, 2.447, 2.365, 2.306, 2.262, 2.228, 2.201, 2.179, 2.160,
    2.145, 2.131, 2.120, 2.110, 2.101, 2.093, 2.086, 2.080, 2.074, 2.069, 2.064, 2.060, 2.056,
    2.052, 2.048, 2.045, 2.042,
];

/// Normal approximation used past the end of the table.
const T_INFINITY_95: f64 = 1.96;

/// Summary statistics for one task's samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatistics {
    pub name: String,
    pub ops_per_second: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p75: f64,
    pub p99: f64,
    pub std_dev: f64,
    pub margin_of_error: f64,
    /// Margin of error as a percentage of the mean
    pub relative_margin_of_error: f64,
    pub sample_count: usize,
}

impl TaskStatistics {
    /// Statistics for a task that produced no samples.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Reduce a task's samples (seconds) into [`TaskStatistics`].
pub fn summarize(name: impl Into<String>, samples: &[f64]) -> TaskStatistics {
    if samples.is_empty() {
        return TaskStatistics::empty(name);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std_dev = sample_std_dev(&sorted, mean);
    let margin_of_error = if n > 1 {
        std_dev / (n as f64).sqrt() * t_critical_95(n - 1)
    } else {
        0.0
    };
    let relative_margin_of_error = if mean > 0.0 {
        margin_of_error / mean * 100.0
    } else {
        0.0
    };

    TaskStatistics {
        name: name.into(),
        ops_per_second: if mean > 0.0 { 1.0 / mean } else { 0.0 },
        mean,
        min: sorted[0],
        max: sorted[n - 1],
        p50: nearest_rank(&sorted, 50.0),
        p75: nearest_rank(&sorted, 75.0),
        p99: nearest_rank(&sorted, 99.0),
        std_dev,
        margin_of_error,
        relative_margin_of_error,
        sample_count: n,
    }
}

/// Nearest-rank percentile of an ascending slice; 0 for an empty slice.
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let rank = (percentile * n as f64 / 100.0).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

/// Sample standard deviation; 0 with fewer than two samples.
pub fn sample_std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let variance = samples
        .iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>()
        / (samples.len() - 1) as f64;
    variance.sqrt()
}

/// Two-tailed 95% critical value for `df` degrees of freedom.
pub fn t_critical_95(df: usize) -> f64 {
    match df {
        0 => 0.0,
        1..=30 => T_TABLE_95[df - 1],
        _ => T_INFINITY_95,
    }
}
