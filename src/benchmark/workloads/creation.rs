//! Object creation workloads.
//!
//! Each invocation builds a fresh object and throws it away, so the groups
//! measure construction cost of each storage strategy.

use bevy_ecs::world::World;
use std::hint::black_box;

use crate::benchmark::task::{Group, Task};
use crate::benchmark::workloads::WorkloadGroup;
use crate::components::{Model, Nested, ObservableCell};
use crate::error::Result;

// =============================================================================
// Simple Object Creation
// =============================================================================

/// Create a flat `{ count, name }` object.
///
/// The ECS variant despawns its entity again so the world stays the same size
/// across samples.
pub fn object_creation() -> Result<Group> {
    Group::new(WorkloadGroup::ObjectCreation.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            || Ok(World::new()),
            |world: &mut World| {
                let entity = world.spawn(Model::default()).id();
                black_box(entity);
                world.despawn(entity);
                Ok(())
            },
        ))?
        .with_task(Task::new("Observable cell", || {
            black_box(ObservableCell::new(Model::default()));
            Ok(())
        }))?
        .with_task(Task::new("Plain struct", || {
            black_box(Model::default());
            Ok(())
        }))
}

// =============================================================================
// Nested Object Update
// =============================================================================

/// Create a three-level nested object and write its innermost value.
pub fn nested_update() -> Result<Group> {
    Group::new(WorkloadGroup::NestedUpdate.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            || Ok(World::new()),
            |world: &mut World| {
                let entity = world.spawn(Nested::default()).id();
                let mut nested = world
                    .get_mut::<Nested>(entity)
                    .ok_or("nested component missing")?;
                nested.level1.level2.level3.value = 100;
                black_box(nested.level1.level2.level3.value);
                world.despawn(entity);
                Ok(())
            },
        ))?
        .with_task(Task::new("Observable cell", || {
            let cell = ObservableCell::new(Nested::default());
            cell.update(|nested| nested.level1.level2.level3.value = 100);
            black_box(cell.with(|nested| nested.level1.level2.level3.value));
            Ok(())
        }))?
        .with_task(Task::new("Plain struct", || {
            let mut nested = black_box(Nested::default());
            nested.level1.level2.level3.value = 100;
            black_box(nested);
            Ok(())
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::runner::{Sampler, StoppingPolicy};

    #[test]
    fn test_creation_groups_run_cleanly() {
        let sampler = Sampler::new(StoppingPolicy::Samples(5), 1).unwrap();
        for group in [object_creation().unwrap(), nested_update().unwrap()] {
            assert_eq!(group.len(), 3);
            let outcome = sampler.run_group(group);
            assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
            assert_eq!(outcome.statistics.len(), 3);
        }
    }
}
