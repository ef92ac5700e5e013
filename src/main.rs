//! bench_compare
//!
//! Runs every demo group and prints a comparison report per group.
//!
//! Run with: `cargo run --release`
//! Optional: `BENCH_COMPARE_CONFIG=path/to/config.json` overrides the defaults.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use bench_compare::benchmark::workloads::demo_suite;
use bench_compare::benchmark::{BenchmarkReport, Sampler, SamplingInfo};
use bench_compare::config::{HarnessConfig, DEFAULT_LOG_FILTER};
use bench_compare::report::{GroupReport, ReportStyle, StdoutSink, TextSink};

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|expr| EnvFilter::try_new(expr).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Runs the suite and returns whether any task failed.
fn run() -> anyhow::Result<bool> {
    let config = HarnessConfig::from_env().context("failed to load harness configuration")?;
    let sampler = Sampler::from_config(&config).context("invalid stopping policy")?;
    let sampling = SamplingInfo::new(sampler.policy(), sampler.warmup_iterations());
    let style = ReportStyle::from_config(&config);

    let suite = demo_suite(sampler, config.seed)?;
    info!("Running {} groups", suite.len());

    let mut sink = StdoutSink;
    let mut write_error = None;
    let outcomes = suite.run(|outcome| {
        if write_error.is_some() {
            return;
        }
        let written = GroupReport::from_outcome(outcome)
            .emit(&style, &mut sink)
            .and_then(|()| Ok(sink.write_line("")?));
        if let Err(err) = written {
            warn!("Report output stopped: {err}");
            write_error = Some(err);
        }
    });
    if let Some(err) = write_error {
        return Err(err).context("failed to write report");
    }

    let mut report = BenchmarkReport::new(sampling);
    for outcome in outcomes {
        report.add_group(outcome);
    }

    if let Some(dir) = &config.results_dir {
        report
            .save(dir)
            .with_context(|| format!("failed to save results to {}", dir.display()))?;
    }

    Ok(report.failure_count() > 0)
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
