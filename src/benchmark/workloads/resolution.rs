//! Dependency resolution workloads.
//!
//! Compares three ways of getting a wired service: bevy `World` resources,
//! the type-keyed [`ServiceContainer`], and calling constructors by hand.

use bevy_ecs::world::World;
use std::hint::black_box;
use std::rc::Rc;

use crate::benchmark::task::{Group, Task};
use crate::benchmark::workloads::WorkloadGroup;
use crate::components::{
    ComplexService, Database, FastRng, Logger, Numbered, Repository, ServiceContainer, Settings,
    UserService,
};
use crate::error::{BoxError, Result};

fn user_service_world() -> std::result::Result<World, BoxError> {
    let mut world = World::new();
    world.insert_resource(Database);
    let db = world
        .get_resource::<Database>()
        .ok_or("database resource missing")?
        .clone();
    world.insert_resource(UserService::new(db));
    Ok(world)
}

fn user_service_container() -> ServiceContainer {
    let mut container = ServiceContainer::new();
    container
        .bind(|_| Ok(Database))
        .bind(|c| Ok(UserService::new(c.resolve::<Database>()?)));
    container
}

// =============================================================================
// Single Level
// =============================================================================

/// Build a fresh registry each invocation and resolve `UserService` from it.
pub fn simple_resolution() -> Result<Group> {
    Group::new(WorkloadGroup::SimpleResolution.name())
        .with_task(Task::new("Bevy resources", || {
            let world = user_service_world()?;
            let service = world
                .get_resource::<UserService>()
                .ok_or("user service resource missing")?;
            black_box(service.get_user());
            Ok(())
        }))?
        .with_task(Task::new("Service container", || {
            let container = user_service_container();
            black_box(container.resolve::<UserService>()?.get_user());
            Ok(())
        }))?
        .with_task(Task::new("Manual wiring", || {
            let service = UserService::new(Database);
            black_box(service.get_user());
            Ok(())
        }))
}

// =============================================================================
// Three Levels
// =============================================================================

/// `ComplexService` needs a `Repository`, which needs `Database` and `Logger`.
pub fn layered_resolution() -> Result<Group> {
    Group::new(WorkloadGroup::LayeredResolution.name())
        .with_task(Task::new("Bevy resources", || {
            let mut world = World::new();
            world.insert_resource(Database);
            world.insert_resource(Logger);

            let db = world.get_resource::<Database>().ok_or("database missing")?.clone();
            let logger = world.get_resource::<Logger>().ok_or("logger missing")?.clone();
            world.insert_resource(Repository::new(db, logger.clone()));

            let repo = world
                .get_resource::<Repository>()
                .ok_or("repository missing")?
                .clone();
            world.insert_resource(ComplexService::new(repo, logger));

            let service = world
                .get_resource::<ComplexService>()
                .ok_or("complex service missing")?;
            black_box(service.execute());
            Ok(())
        }))?
        .with_task(Task::new("Service container", || {
            let mut container = ServiceContainer::new();
            container
                .bind(|_| Ok(Database))
                .bind(|_| Ok(Logger))
                .bind(|c| Ok(Repository::new(c.resolve()?, c.resolve()?)))
                .bind(|c| Ok(ComplexService::new(c.resolve()?, c.resolve()?)));
            black_box(container.resolve::<ComplexService>()?.execute());
            Ok(())
        }))?
        .with_task(Task::new("Manual wiring", || {
            let logger = Logger;
            let service = ComplexService::new(Repository::new(Database, logger.clone()), logger);
            black_box(service.execute());
            Ok(())
        }))
}

// =============================================================================
// Singleton
// =============================================================================

/// Drop any cached singleton, then resolve it three times.
pub fn singleton_resolution(rng: &mut FastRng) -> Result<Group> {
    let settings = Settings {
        value: rng.next_unit(),
    };

    Group::new(WorkloadGroup::SingletonResolution.name())
        .with_task(Task::with_context(
            "Bevy resources",
            || Ok(World::new()),
            move |world: &mut World| {
                world.remove_resource::<Settings>();
                world.insert_resource(settings);
                for _ in 0..3 {
                    let resolved = world.get_resource::<Settings>().ok_or("settings missing")?;
                    black_box(resolved.value);
                }
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Service container",
            move || {
                let mut container = ServiceContainer::new();
                container.bind_singleton(move |_| Ok(settings));
                Ok(container)
            },
            |container: &mut ServiceContainer| {
                container.reset();
                for _ in 0..3 {
                    black_box(container.resolve::<Settings>()?.value);
                }
                Ok(())
            },
        ))?
        .with_task(Task::new("Manual wiring", move || {
            let shared = Rc::new(settings);
            for _ in 0..3 {
                black_box(Rc::clone(&shared).value);
            }
            Ok(())
        }))
}

// =============================================================================
// Batch
// =============================================================================

/// Number of distinct service types resolved per invocation in the batch group
pub const BATCH_SERVICES: usize = 10;

/// Expands to `f::<0>(target)? + ... + f::<9>(target)?`.
macro_rules! sum_numbered {
    ($resolve:ident, $target:expr) => {
        $resolve::<0>($target)?
            + $resolve::<1>($target)?
            + $resolve::<2>($target)?
            + $resolve::<3>($target)?
            + $resolve::<4>($target)?
            + $resolve::<5>($target)?
            + $resolve::<6>($target)?
            + $resolve::<7>($target)?
            + $resolve::<8>($target)?
            + $resolve::<9>($target)?
    };
}

fn numbered_in_world<const N: usize>(world: &mut World) -> std::result::Result<usize, BoxError> {
    world.insert_resource(Numbered::<N>);
    let service = world
        .get_resource::<Numbered<N>>()
        .ok_or("numbered service missing")?;
    Ok(service.execute())
}

fn numbered_in_container<const N: usize>(
    container: &mut ServiceContainer,
) -> std::result::Result<usize, BoxError> {
    container.bind(|_| Ok(Numbered::<N>));
    Ok(container.resolve::<Numbered<N>>()?.execute())
}

fn numbered_by_hand<const N: usize>(_: ()) -> std::result::Result<usize, BoxError> {
    Ok(black_box(Numbered::<N>).execute())
}

/// Register and resolve [`BATCH_SERVICES`] distinct service types.
pub fn batch_resolution() -> Result<Group> {
    Group::new(WorkloadGroup::BatchResolution.name())
        .with_task(Task::new("Bevy resources", || {
            let mut world = World::new();
            black_box(sum_numbered!(numbered_in_world, &mut world));
            Ok(())
        }))?
        .with_task(Task::new("Service container", || {
            let mut container = ServiceContainer::new();
            black_box(sum_numbered!(numbered_in_container, &mut container));
            Ok(())
        }))?
        .with_task(Task::new("Manual wiring", || {
            black_box(sum_numbered!(numbered_by_hand, ()));
            Ok(())
        }))
}

// =============================================================================
// Container Lifecycle
// =============================================================================

/// Create a registry, register one service, tear it down again.
pub fn container_lifecycle() -> Result<Group> {
    Group::new(WorkloadGroup::ContainerLifecycle.name())
        .with_task(Task::new("Bevy resources", || {
            let mut world = World::new();
            world.insert_resource(Database);
            black_box(world.remove_resource::<Database>());
            drop(world);
            Ok(())
        }))?
        .with_task(Task::new("Service container", || {
            let mut container = ServiceContainer::new();
            container.bind_singleton(|_| Ok(Database));
            black_box(container.resolve::<Database>()?);
            container.reset();
            drop(container);
            Ok(())
        }))?
        .with_task(Task::new("Manual wiring", || {
            let registry = Rc::new(Database);
            black_box(registry.query());
            drop(registry);
            Ok(())
        }))
}

// =============================================================================
// Pre-configured
// =============================================================================

/// Registry built once per task; each invocation only resolves.
pub fn preconfigured_resolution() -> Result<Group> {
    Group::new(WorkloadGroup::PreconfiguredResolution.name())
        .with_task(Task::with_context(
            "Bevy resources",
            user_service_world,
            |world: &mut World| {
                let service = world
                    .get_resource::<UserService>()
                    .ok_or("user service resource missing")?;
                black_box(service.get_user());
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Service container",
            || {
                let mut container = ServiceContainer::new();
                container
                    .bind_singleton(|_| Ok(Database))
                    .bind_singleton(|c| Ok(UserService::new(c.resolve::<Database>()?)));
                Ok(container)
            },
            |container: &mut ServiceContainer| {
                black_box(container.resolve::<UserService>()?.get_user());
                Ok(())
            },
        ))?
        .with_task(Task::with_context(
            "Manual wiring",
            || Ok(Rc::new(UserService::new(Database))),
            |service: &mut Rc<UserService>| {
                black_box(Rc::clone(service).get_user());
                Ok(())
            },
        ))
}
