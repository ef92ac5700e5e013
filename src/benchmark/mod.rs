//! Core benchmarking infrastructure.
//!
//! This module contains task registration, the sampler, results export
//! and the demo workload definitions.

pub mod results;
pub mod runner;
pub mod task;
pub mod workloads;

pub use results::*;
pub use runner::*;
pub use task::*;
