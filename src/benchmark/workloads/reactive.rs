//! Reactive update workloads: a write followed by a derived side effect.
//!
//! The ECS variant expresses the side effect as a `Changed<Model>` query run
//! after each write; the observable cell pushes to a subscriber; the plain
//! struct recomputes by hand and serves as the untracked baseline.

use bevy_ecs::prelude::{Changed, Entity, World};
use bevy_ecs::query::QueryState;
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use crate::benchmark::task::{Group, Task};
use crate::benchmark::workloads::WorkloadGroup;
use crate::components::{Model, ObservableCell};
use crate::error::{BoxError, Result};

/// Writes per invocation in the batch group
pub const BATCH_SIZE: i64 = 100;

/// Write `count` to the entity, then run the effect over changed models.
fn write_and_react(
    world: &mut World,
    changed: &mut QueryState<&'static Model, Changed<Model>>,
    entity: Entity,
    count: i64,
) -> std::result::Result<i64, BoxError> {
    world.clear_trackers();
    world
        .get_mut::<Model>(entity)
        .ok_or("model component missing")?
        .count = count;

    let mut result = 0;
    for model in changed.iter(world) {
        result = model.count * 2;
    }
    Ok(result)
}

// =============================================================================
// Reactive Update With Side Effect
// =============================================================================

/// Create an object, attach an effect, write once, detach.
pub fn reactive_update() -> Result<Group> {
    Group::new(WorkloadGroup::ReactiveUpdate.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            || Ok(World::new()),
            |world: &mut World| {
                let entity = world.spawn(Model::new(0)).id();
                let mut changed = world.query_filtered::<&Model, Changed<Model>>();
                black_box(write_and_react(world, &mut changed, entity, 10)?);
                world.despawn(entity);
                Ok(())
            },
        ))?
        .with_task(Task::new("Observable cell", || {
            let cell = ObservableCell::new(Model::new(0));
            let result = Rc::new(Cell::new(0));
            let sink = Rc::clone(&result);
            let subscription = cell.subscribe(move |model| sink.set(model.count * 2));
            cell.update(|model| model.count = 10);
            cell.unsubscribe(subscription);
            black_box(result.get());
            Ok(())
        }))?
        .with_task(Task::new("Plain struct", || {
            let mut model = black_box(Model::new(0));
            model.count = 10;
            black_box(model.count * 2);
            Ok(())
        }))
}

// =============================================================================
// Batch Update
// =============================================================================

/// Attach an effect and write [`BATCH_SIZE`] times, running the effect after each.
pub fn batch_update() -> Result<Group> {
    Group::new(WorkloadGroup::BatchUpdate.name())
        .with_task(Task::with_context(
            "Bevy ECS",
            || Ok(World::new()),
            |world: &mut World| {
                let entity = world.spawn(Model::new(0)).id();
                let mut changed = world.query_filtered::<&Model, Changed<Model>>();
                for i in 0..BATCH_SIZE {
                    black_box(write_and_react(world, &mut changed, entity, i)?);
                }
                world.despawn(entity);
                Ok(())
            },
        ))?
        .with_task(Task::new("Observable cell", || {
            let cell = ObservableCell::new(Model::new(0));
            let result = Rc::new(Cell::new(0));
            let sink = Rc::clone(&result);
            let subscription = cell.subscribe(move |model| sink.set(model.count));
            for i in 0..BATCH_SIZE {
                cell.update(|model| model.count = i);
            }
            cell.unsubscribe(subscription);
            black_box(result.get());
            Ok(())
        }))?
        .with_task(Task::new("Plain struct", || {
            let mut model = black_box(Model::new(0));
            let mut result = 0;
            for i in 0..BATCH_SIZE {
                model.count = i;
                result = black_box(model.count);
            }
            black_box(result);
            Ok(())
        }))
}
