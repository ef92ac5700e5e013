//! A minimal type-keyed service container.
//!
//! Bindings are factories keyed by [`TypeId`]. Resolving a type runs its
//! factory, which may resolve its own dependencies from the same container.
//! Singletons are built once and cloned out on every resolve.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no binding for {0}")]
    Unbound(&'static str),
}

type Factory = Box<dyn Fn(&ServiceContainer) -> Result<Box<dyn Any>, ResolveError>>;

enum Binding {
    Transient(Factory),
    Singleton {
        factory: Factory,
        instance: RefCell<Option<Box<dyn Any>>>,
    },
}

#[derive(Default)]
pub struct ServiceContainer {
    bindings: HashMap<TypeId, Binding>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to a factory that runs on every resolve.
    pub fn bind<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&ServiceContainer) -> Result<T, ResolveError> + 'static,
    {
        self.bindings
            .insert(TypeId::of::<T>(), Binding::Transient(boxed(factory)));
        self
    }

    /// Bind `T` to a factory that runs on first resolve only.
    pub fn bind_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Clone + 'static,
        F: Fn(&ServiceContainer) -> Result<T, ResolveError> + 'static,
    {
        self.bindings.insert(
            TypeId::of::<T>(),
            Binding::Singleton {
                factory: boxed(factory),
                instance: RefCell::new(None),
            },
        );
        self
    }

    pub fn resolve<T: Clone + 'static>(&self) -> Result<T, ResolveError> {
        let unbound = || ResolveError::Unbound(type_name::<T>());
        let downcast = |value: &dyn Any| value.downcast_ref::<T>().cloned().ok_or_else(unbound);

        match self.bindings.get(&TypeId::of::<T>()).ok_or_else(unbound)? {
            Binding::Transient(factory) => {
                let created = factory(self)?;
                downcast(&*created)
            }
            Binding::Singleton { factory, instance } => {
                if let Some(existing) = instance.borrow().as_ref() {
                    return downcast(&**existing);
                }
                let created = factory(self)?;
                let value = downcast(&*created);
                *instance.borrow_mut() = Some(created);
                value
            }
        }
    }

    /// Drop every cached singleton, keeping the bindings.
    pub fn reset(&mut self) {
        for binding in self.bindings.values_mut() {
            if let Binding::Singleton { instance, .. } = binding {
                *instance.get_mut() = None;
            }
        }
    }

    pub fn is_bound<T: 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<T>())
    }
}

fn boxed<T, F>(factory: F) -> Factory
where
    T: 'static,
    F: Fn(&ServiceContainer) -> Result<T, ResolveError> + 'static,
{
    Box::new(move |container| Ok(Box::new(factory(container)?) as Box<dyn Any>))
}
