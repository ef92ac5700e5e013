//! Data shared by the demo workloads.
//!
//! The same small object shapes are stored three ways (ECS component,
//! observable cell, plain value) so the groups compare storage strategies
//! rather than payloads.

use bevy_ecs::prelude::{Component, Resource};
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::DEFAULT_SEED;

// =============================================================================
// Fast Random Number Generator
// =============================================================================

/// Seedable RNG for workload inputs.
///
/// Xoshiro256++ is cheap enough that drawing inputs does not dominate the
/// timed closures, and a fixed seed keeps runs comparable.
#[derive(Debug, Clone)]
pub struct FastRng(pub Xoshiro256PlusPlus);

impl Default for FastRng {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl FastRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Independent generator for one task, so every task sees the same inputs.
    pub fn fork(&mut self) -> Self {
        Self(Xoshiro256PlusPlus::seed_from_u64(self.0.gen()))
    }

    pub fn next_count(&mut self) -> i64 {
        self.0.gen_range(-1_000..1_000)
    }

    pub fn next_unit(&mut self) -> f64 {
        self.0.gen()
    }
}

// =============================================================================
// Reactive model shapes
// =============================================================================

/// Flat object with a numeric and a string field
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub count: i64,
    pub name: String,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Model {
    pub fn new(count: i64) -> Self {
        Self {
            count,
            name: "test".to_string(),
        }
    }
}

/// Three levels of nesting around one value
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Nested {
    pub level1: Level1,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Level1 {
    pub level2: Level2,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Level2 {
    pub level3: Level3,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Level3 {
    pub value: i64,
}

/// Small growable list, created as `[1, 2, 3, 4, 5]`
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Items(pub Vec<i64>);

impl Default for Items {
    fn default() -> Self {
        Self(vec![1, 2, 3, 4, 5])
    }
}

// =============================================================================
// Services for dependency resolution
// =============================================================================

#[derive(Resource, Debug, Default, Clone)]
pub struct Database;

impl Database {
    pub fn query(&self) -> &'static str {
        "data"
    }
}

#[derive(Resource, Debug, Default, Clone)]
pub struct Logger;

impl Logger {
    pub fn log<'a>(&self, message: &'a str) -> &'a str {
        message
    }
}

/// Depends on [`Database`]
#[derive(Resource, Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get_user(&self) -> &'static str {
        self.db.query()
    }
}

/// Depends on [`Database`] and [`Logger`]
#[derive(Resource, Debug, Clone)]
pub struct Repository {
    db: Database,
    logger: Logger,
}

impl Repository {
    pub fn new(db: Database, logger: Logger) -> Self {
        Self { db, logger }
    }

    pub fn find_all(&self) -> &'static str {
        self.logger.log("finding all");
        self.db.query()
    }
}

/// Top of a three-level graph: depends on [`Repository`] and [`Logger`]
#[derive(Resource, Debug, Clone)]
pub struct ComplexService {
    repo: Repository,
    logger: Logger,
}

impl ComplexService {
    pub fn new(repo: Repository, logger: Logger) -> Self {
        Self { repo, logger }
    }

    pub fn execute(&self) -> &'static str {
        self.logger.log("executing");
        self.repo.find_all()
    }
}

/// Shared configuration, meant to be resolved as a singleton
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub value: f64,
}

/// One of a family of distinct service types, told apart by `N`
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Numbered<const N: usize>;

impl<const N: usize> Numbered<N> {
    pub fn execute(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forked_rngs_are_reproducible() {
        let mut a = FastRng::with_seed(7);
        let mut b = FastRng::with_seed(7);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.next_count(), fb.next_count());
    }

    #[test]
    fn test_service_graph() {
        let service = ComplexService::new(Repository::new(Database, Logger), Logger);
        assert_eq!(service.execute(), "data");
        assert_eq!(UserService::new(Database).get_user(), "data");
        assert_eq!(Numbered::<7>.execute(), 7);
    }

    #[test]
    fn test_unit_draws_stay_in_range() {
        let mut rng = FastRng::with_seed(3);
        assert!((0..100).map(|_| rng.next_unit()).all(|v| (0.0..1.0).contains(&v)));
    }
}
