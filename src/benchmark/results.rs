//! Benchmark results collection, storage, and export.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::benchmark::runner::{GroupOutcome, StoppingPolicy};
use crate::error::Result;

/// System information for context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu_cores: usize,
    pub harness_version: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_cores: std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            harness_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// How the samples in a report were collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingInfo {
    /// Fixed sample count, when a count-based policy was used
    pub sample_count: Option<usize>,
    pub time_budget_ms: Option<u64>,
    pub min_samples: Option<usize>,
    pub max_samples: Option<usize>,
    pub warmup_iterations: usize,
}

impl SamplingInfo {
    pub fn new(policy: StoppingPolicy, warmup_iterations: usize) -> Self {
        match policy {
            StoppingPolicy::Samples(count) => Self {
                sample_count: Some(count),
                time_budget_ms: None,
                min_samples: None,
                max_samples: None,
                warmup_iterations,
            },
            StoppingPolicy::TimeBudget {
                budget,
                min_samples,
                max_samples,
            } => Self {
                sample_count: None,
                time_budget_ms: Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX)),
                min_samples: Some(min_samples),
                max_samples: Some(max_samples),
                warmup_iterations,
            },
        }
    }
}

/// Complete benchmark report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub timestamp: String,
    pub system_info: SystemInfo,
    pub sampling: SamplingInfo,
    pub groups: Vec<GroupOutcome>,
}

impl BenchmarkReport {
    pub fn new(sampling: SamplingInfo) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            system_info: SystemInfo::default(),
            sampling,
            groups: Vec::new(),
        }
    }

    pub fn add_group(&mut self, outcome: GroupOutcome) {
        self.groups.push(outcome);
    }

    pub fn failure_count(&self) -> usize {
        self.groups.iter().map(|g| g.failures.len()).sum()
    }

    /// Save report to a timestamped JSON file inside `dir`, returning its path
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }

        let path = dir.join(format!(
            "benchmark_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        ));

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;

        info!("Results written to {}", path.display());
        Ok(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskFailure;
    use crate::metrics::summarize;
    use std::time::Duration;

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");

        let mut report = BenchmarkReport::new(SamplingInfo::new(StoppingPolicy::Samples(3), 1));
        report.add_group(GroupOutcome {
            title: "group".into(),
            statistics: vec![summarize("a", &[0.5, 1.0, 1.5])],
            failures: vec![TaskFailure::new("b", "boom")],
        });

        let path = report.save(&target).unwrap();
        assert!(path.starts_with(&target));
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("benchmark_") && n.ends_with(".json")));

        let loaded = BenchmarkReport::load(&path).unwrap();
        assert_eq!(loaded.groups.len(), 1);
        assert_eq!(loaded.groups[0].title, "group");
        assert_eq!(loaded.groups[0].statistics[0].name, "a");
        assert_eq!(loaded.groups[0].statistics[0].sample_count, 3);
        assert_eq!(loaded.groups[0].statistics[0].mean, 1.0);
        assert_eq!(loaded.groups[0].failures, report.groups[0].failures);
        assert_eq!(loaded.sampling.sample_count, Some(3));
        assert_eq!(loaded.failure_count(), 1);
    }

    #[test]
    fn test_sampling_info_for_time_budget() {
        let info = SamplingInfo::new(
            StoppingPolicy::TimeBudget {
                budget: Duration::from_millis(250),
                min_samples: 4,
                max_samples: 400,
            },
            5,
        );
        assert_eq!(info.time_budget_ms, Some(250));
        assert_eq!(info.min_samples, Some(4));
        assert_eq!(info.max_samples, Some(400));
        assert_eq!(info.sample_count, None);
    }
}
