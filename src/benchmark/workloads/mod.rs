//! Demo workload definitions.
//!
//! Every group compares the same operation across storage or wiring
//! strategies. Groups are built fresh per run since tasks own their state.

mod access;
mod creation;
mod reactive;
mod resolution;

pub use access::*;
pub use creation::*;
pub use reactive::*;
pub use resolution::*;

use crate::benchmark::runner::{Sampler, Suite};
use crate::benchmark::task::Group;
use crate::components::FastRng;
use crate::error::Result;

/// Demo groups in run order
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum WorkloadGroup {
    ObjectCreation,
    PropertyRead,
    PropertyWrite,
    ReactiveUpdate,
    NestedUpdate,
    ArrayOperations,
    BatchUpdate,
    SimpleResolution,
    LayeredResolution,
    SingletonResolution,
    BatchResolution,
    ContainerLifecycle,
    PreconfiguredResolution,
}

impl WorkloadGroup {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ObjectCreation => "Simple Object Creation",
            Self::PropertyRead => "Property Read",
            Self::PropertyWrite => "Property Write",
            Self::ReactiveUpdate => "Reactive Update With Side Effect",
            Self::NestedUpdate => "Nested Object Update",
            Self::ArrayOperations => "Array Operations",
            Self::BatchUpdate => "Batch Update (100 writes)",
            Self::SimpleResolution => "Dependency Resolution",
            Self::LayeredResolution => "Three-Level Dependency Resolution",
            Self::SingletonResolution => "Singleton Resolution",
            Self::BatchResolution => "Batch Resolution (10 services)",
            Self::ContainerLifecycle => "Container Creation and Destruction",
            Self::PreconfiguredResolution => "Pre-configured Container Resolution",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ObjectCreation => "Build and drop a flat two-field object",
            Self::PropertyRead => "Read one field of an existing object",
            Self::PropertyWrite => "Increment one field of an existing object",
            Self::ReactiveUpdate => "Attach an effect, write once, detach",
            Self::NestedUpdate => "Build a three-level object and write the innermost value",
            Self::ArrayOperations => "Build a five-element list, push, pop and overwrite",
            Self::BatchUpdate => "Write 100 times with an effect after each write",
            Self::SimpleResolution => "Wire a fresh registry and resolve one service",
            Self::LayeredResolution => "Resolve a service three dependencies deep",
            Self::SingletonResolution => "Rebuild a singleton and resolve it three times",
            Self::BatchResolution => "Register and resolve 10 distinct services",
            Self::ContainerLifecycle => "Create a registry, register one service, tear it down",
            Self::PreconfiguredResolution => "Resolve from a registry built ahead of time",
        }
    }

    pub fn all() -> &'static [WorkloadGroup] {
        &[
            Self::ObjectCreation,
            Self::PropertyRead,
            Self::PropertyWrite,
            Self::ReactiveUpdate,
            Self::NestedUpdate,
            Self::ArrayOperations,
            Self::BatchUpdate,
            Self::SimpleResolution,
            Self::LayeredResolution,
            Self::SingletonResolution,
            Self::BatchResolution,
            Self::ContainerLifecycle,
            Self::PreconfiguredResolution,
        ]
    }

    /// Build the group's tasks; groups with random inputs draw from `rng`.
    pub fn build(&self, rng: &mut FastRng) -> Result<Group> {
        match self {
            Self::ObjectCreation => object_creation(),
            Self::PropertyRead => property_read(&mut rng.fork()),
            Self::PropertyWrite => property_write(&mut rng.fork()),
            Self::ReactiveUpdate => reactive_update(),
            Self::NestedUpdate => nested_update(),
            Self::ArrayOperations => array_operations(),
            Self::BatchUpdate => batch_update(),
            Self::SimpleResolution => simple_resolution(),
            Self::LayeredResolution => layered_resolution(),
            Self::SingletonResolution => singleton_resolution(&mut rng.fork()),
            Self::BatchResolution => batch_resolution(),
            Self::ContainerLifecycle => container_lifecycle(),
            Self::PreconfiguredResolution => preconfigured_resolution(),
        }
    }
}

/// Suite holding every demo group, inputs seeded from `seed`.
pub fn demo_suite(sampler: Sampler, seed: u64) -> Result<Suite> {
    let mut rng = FastRng::with_seed(seed);
    let mut suite = Suite::new(sampler);
    for workload in WorkloadGroup::all() {
        suite.add_group(workload.build(&mut rng)?);
    }
    Ok(suite)
}
