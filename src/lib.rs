//! # bench_compare
//!
//! A micro-benchmarking harness that compares alternative implementations of
//! the same operation and prints a ranked, human-readable report.
//!
//! ## Modules
//!
//! - [`benchmark`]: Tasks, groups, the sampler and the demo workloads
//! - [`metrics`]: Sample statistics and number formatting
//! - [`report`]: Ranking, tables, bar charts and stability ratings
//! - [`components`]: Data shapes and registries the demo workloads exercise
//! - [`config`]: Defaults and the JSON-loadable harness configuration
//! - [`error`]: Harness error types

pub mod benchmark;
pub mod components;
pub mod config;
pub mod error;
pub mod metrics;
pub mod report;

pub use error::{HarnessError, Result};
