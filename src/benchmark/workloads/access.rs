//! Property access workloads.
//!
//! For single fields the object is created once per task (outside the timed
//! invocations) and each invocation reads or writes one field. The array
//! group builds its list inside the invocation.

use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;
use std::hint::black_box;

use crate::benchmark::task::{Group, Task};
use crate::benchmark::workloads::WorkloadGroup;
use crate::components::{FastRng, Items, Model, ObservableCell};
use crate::error::{BoxError, Result};

fn spawn_model(count: i64) -> std::result::Result<(World, Entity), BoxError> {
    let mut world = World::new();
    let entity = world.spawn(Model::new(count)).id();
    Ok((world, entity))
}

// =============================================================================
// Property Read
// =============================================================================

pub fn property_read(rng: &mut FastRng) -> Result<Group> {
    let start = rng.next_count();

    Group::new(WorkloadGroup::PropertyRead.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            move || spawn_model(start),
            |(world, entity): &mut (World, Entity)| {
                let model = world.get::<Model>(*entity).ok_or("model component missing")?;
                black_box(model.count);
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Observable cell",
            move || Ok(ObservableCell::new(Model::new(start))),
            |cell: &mut ObservableCell<Model>| {
                black_box(cell.with(|model| model.count));
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Plain struct",
            move || Ok(Model::new(start)),
            |model: &mut Model| {
                black_box(black_box(&*model).count);
                Ok(())
            },
        ))
}

// =============================================================================
// Property Write
// =============================================================================

pub fn property_write(rng: &mut FastRng) -> Result<Group> {
    let start = rng.next_count();

    Group::new(WorkloadGroup::PropertyWrite.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            move || spawn_model(start),
            |(world, entity): &mut (World, Entity)| {
                let mut model = world
                    .get_mut::<Model>(*entity)
                    .ok_or("model component missing")?;
                model.count = model.count.wrapping_add(1);
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Observable cell",
            move || Ok(ObservableCell::new(Model::new(start))),
            |cell: &mut ObservableCell<Model>| {
                cell.update(|model| model.count = model.count.wrapping_add(1));
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Plain struct",
            move || Ok(Model::new(start)),
            |model: &mut Model| {
                let model = black_box(model);
                model.count = model.count.wrapping_add(1);
                Ok(())
            },
        ))
}

// =============================================================================
// Array Operations
// =============================================================================

/// Build `[1..5]`, push 6, pop it again and overwrite the first element.
pub fn array_operations() -> Result<Group> {
    Group::new(WorkloadGroup::ArrayOperations.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            || Ok(World::new()),
            |world: &mut World| {
                let entity = world.spawn(Items::default()).id();
                let mut items = world
                    .get_mut::<Items>(entity)
                    .ok_or("items component missing")?;
                items.0.push(6);
                black_box(items.0.pop());
                items.0[0] = 10;
                world.despawn(entity);
                Ok(())
            },
        ))?
        .with_task(Task::new("Observable cell", || {
            let cell = ObservableCell::new(Items::default().0);
            cell.update(|items| items.push(6));
            cell.update(|items| {
                black_box(items.pop());
            });
            cell.update(|items| items[0] = 10);
            black_box(cell.with(|items| items[0]));
            Ok(())
        }))?
        .with_task(Task::new("Plain struct", || {
            let mut items = black_box(Items::default());
            items.0.push(6);
            black_box(items.0.pop());
            items.0[0] = 10;
            black_box(items);
            Ok(())
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::runner::{Sampler, StoppingPolicy};

    #[test]
    fn test_access_groups_run_cleanly() {
        let mut rng = FastRng::default();
        let sampler = Sampler::new(StoppingPolicy::Samples(5), 1).unwrap();
        for group in [property_read(&mut rng).unwrap(), property_write(&mut rng).unwrap()] {
            let outcome = sampler.run_group(group);
            assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
            let names: Vec<_> = outcome.statistics.iter().map(|s| s.name.as_str()).collect();
            assert_eq!(names, ["Bevy ECS", "Observable cell", "Plain struct"]);
        }
    }

    #[test]
    fn test_array_group_runs_cleanly() {
        let sampler = Sampler::new(StoppingPolicy::Samples(3), 1).unwrap();
        let outcome = sampler.run_group(array_operations().unwrap());
        assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
        assert_eq!(outcome.statistics.len(), 3);
    }

    #[test]
    fn test_observable_list_sees_each_operation() {
        let cell = ObservableCell::new(Items::default().0);
        let lengths = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let seen = std::rc::Rc::clone(&lengths);
        cell.subscribe(move |items: &Vec<i64>| seen.borrow_mut().push(items.len()));

        cell.update(|items| items.push(6));
        cell.update(|items| {
            items.pop();
        });
        cell.update(|items| items[0] = 10);

        assert_eq!(*lengths.borrow(), [5, 6, 5, 5]);
        assert_eq!(cell.get(), vec![10, 2, 3, 4, 5]);
    }
}
