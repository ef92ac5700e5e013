//! Object shapes, services and storage strategies used by the demo workloads.
//!
//! - [`model`]: ECS components, resources and the workload RNG
//! - [`observable`]: push-based observable cell
//! - [`container`]: type-keyed service container

pub mod container;
pub mod model;
pub mod observable;

pub use container::{ResolveError, ServiceContainer};
pub use model::*;
pub use observable::{ObservableCell, SubscriptionId};
