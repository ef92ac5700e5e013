//! Configuration constants and the loadable harness configuration.
//!
//! The constants are the defaults; a JSON file can override any of them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::benchmark::runner::StoppingPolicy;
use crate::error::Result;

/// Cumulative workload time spent sampling each task (milliseconds)
pub const DEFAULT_TIME_BUDGET_MS: u64 = 1_000;

/// Samples every task must collect even when the time budget is spent
pub const DEFAULT_MIN_SAMPLES: usize = 10;

/// Upper bound on samples held per task under the time budget
pub const DEFAULT_MAX_SAMPLES: usize = 100_000;

/// Number of warm-up invocations run and discarded before sampling
pub const WARMUP_ITERATIONS: usize = 5;

/// Percentage of relative performance represented by one bar glyph
pub const BAR_UNIT_PERCENT: f64 = 5.0;

/// Relative margin of error thresholds (percent) for 5, 4, 3 and 2 stars
pub const STABILITY_THRESHOLDS: [f64; 4] = [1.0, 5.0, 10.0, 50.0];

/// Seed for the workload input generator
pub const DEFAULT_SEED: u64 = 42;

/// Environment variable holding the path of a JSON configuration file
pub const CONFIG_ENV_VAR: &str = "BENCH_COMPARE_CONFIG";

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "bench_compare=info";

/// Harness configuration, deserialisable from JSON.
///
/// Every field is optional in the file and falls back to the constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Time budget per task in milliseconds (ignored when `sample_count` is set)
    pub time_budget_ms: u64,
    /// Minimum samples per task under the time budget policy
    pub min_samples: usize,
    /// Cap on samples per task under the time budget policy
    pub max_samples: usize,
    /// Fixed number of samples per task; switches to a count-based policy
    pub sample_count: Option<usize>,
    pub warmup_iterations: usize,
    pub bar_unit_percent: f64,
    pub stability_thresholds: [f64; 4],
    /// Directory for JSON result exports; nothing is written when unset
    pub results_dir: Option<PathBuf>,
    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            min_samples: DEFAULT_MIN_SAMPLES,
            max_samples: DEFAULT_MAX_SAMPLES,
            sample_count: None,
            warmup_iterations: WARMUP_ITERATIONS,
            bar_unit_percent: BAR_UNIT_PERCENT,
            stability_thresholds: STABILITY_THRESHOLDS,
            results_dir: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl HarnessConfig {
    /// Loads configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// The stopping policy described by this configuration.
    ///
    /// The policy is not validated here; the sampler rejects invalid ones.
    pub fn policy(&self) -> StoppingPolicy {
        match self.sample_count {
            Some(count) => StoppingPolicy::Samples(count),
            None => StoppingPolicy::TimeBudget {
                budget: Duration::from_millis(self.time_budget_ms),
                min_samples: self.min_samples,
                max_samples: self.max_samples,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_time_budget() {
        let config = HarnessConfig::default();
        assert_eq!(
            config.policy(),
            StoppingPolicy::TimeBudget {
                budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
                min_samples: DEFAULT_MIN_SAMPLES,
                max_samples: DEFAULT_MAX_SAMPLES,
            }
        );
        assert!(config.results_dir.is_none());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = HarnessConfig::from_json_str(
            r#"{ "sample_count": 200, "warmup_iterations": 0, "results_dir": "out" }"#,
        )
        .unwrap();

        assert_eq!(config.policy(), StoppingPolicy::Samples(200));
        assert_eq!(config.warmup_iterations, 0);
        assert_eq!(config.results_dir, Some(PathBuf::from("out")));
        assert_eq!(config.stability_thresholds, STABILITY_THRESHOLDS);
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn test_sample_cap_is_configurable() {
        let config =
            HarnessConfig::from_json_str(r#"{ "min_samples": 3, "max_samples": 50 }"#).unwrap();
        assert!(matches!(
            config.policy(),
            StoppingPolicy::TimeBudget {
                min_samples: 3,
                max_samples: 50,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = HarnessConfig::from_json_str(r#"{ "time_budget": 5 }"#).unwrap_err();
        assert!(err.to_string().contains("time_budget"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = HarnessConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::error::HarnessError::Io(_)));
    }
}
