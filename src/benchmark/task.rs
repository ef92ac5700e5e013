//! Tasks and the groups that register them.
//!
//! A [`Task`] wraps one alternative implementation of the operation a
//! [`Group`] compares. The harness only ever sees the [`Routine`] behind it,
//! which is acquired once, invoked repeatedly and released once.

use std::future::Future;

use crate::error::{BoxError, HarnessError, Result, TaskResult};

/// Executable body of a task.
///
/// The sampler calls `acquire` before the first invocation (warm-up included),
/// `invoke` once per sample, and `release` after the last invocation, even when
/// an invocation failed.
pub trait Routine {
    fn acquire(&mut self) -> TaskResult {
        Ok(())
    }

    fn invoke(&mut self) -> TaskResult;

    fn release(&mut self) {}
}

/// Plain synchronous closure.
struct SyncRoutine<F>(F);

impl<F> Routine for SyncRoutine<F>
where
    F: FnMut() -> TaskResult,
{
    fn invoke(&mut self) -> TaskResult {
        (self.0)()
    }
}

/// Closure returning a future, driven to completion inside the invocation.
struct AsyncRoutine<F>(F);

impl<F, Fut> Routine for AsyncRoutine<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = TaskResult>,
{
    fn invoke(&mut self) -> TaskResult {
        futures::executor::block_on((self.0)())
    }
}

/// Closure run against a context that lives for the task's whole sampling.
struct ScopedRoutine<C, S, R> {
    setup: S,
    run: R,
    context: Option<C>,
}

impl<C, S, R> Routine for ScopedRoutine<C, S, R>
where
    S: FnMut() -> std::result::Result<C, BoxError>,
    R: FnMut(&mut C) -> TaskResult,
{
    fn acquire(&mut self) -> TaskResult {
        self.context = Some((self.setup)()?);
        Ok(())
    }

    fn invoke(&mut self) -> TaskResult {
        match self.context.as_mut() {
            Some(context) => (self.run)(context),
            None => Err("context used before it was acquired".into()),
        }
    }

    fn release(&mut self) {
        drop(self.context.take());
    }
}

/// One named, timed unit of work
pub struct Task {
    name: String,
    routine: Box<dyn Routine>,
}

impl Task {
    /// Task from a synchronous closure.
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: FnMut() -> TaskResult + 'static,
    {
        Self::from_routine(name, SyncRoutine(run))
    }

    /// Task from a closure returning a future; each sample awaits it to completion.
    pub fn from_async<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = TaskResult> + 'static,
    {
        Self::from_routine(name, AsyncRoutine(run))
    }

    /// Task whose closure borrows a context built by `setup`.
    ///
    /// The context is created before the task's first invocation and dropped
    /// after its last one, so state never leaks between tasks.
    pub fn with_context<C, S, R>(name: impl Into<String>, setup: S, run: R) -> Self
    where
        C: 'static,
        S: FnMut() -> std::result::Result<C, BoxError> + 'static,
        R: FnMut(&mut C) -> TaskResult + 'static,
    {
        Self::from_routine(
            name,
            ScopedRoutine {
                setup,
                run,
                context: None,
            },
        )
    }

    pub fn from_routine(name: impl Into<String>, routine: impl Routine + 'static) -> Self {
        Self {
            name: name.into(),
            routine: Box::new(routine),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn routine_mut(&mut self) -> &mut dyn Routine {
        self.routine.as_mut()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish()
    }
}

/// Ordered set of tasks measuring the same operation
#[derive(Debug)]
pub struct Group {
    title: String,
    tasks: Vec<Task>,
}

impl Group {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    /// Register a task; names must be unique within the group.
    pub fn add(&mut self, task: Task) -> Result<&mut Self> {
        if self.tasks.iter().any(|t| t.name == task.name) {
            return Err(HarnessError::DuplicateTask {
                group: self.title.clone(),
                task: task.name,
            });
        }
        self.tasks.push(task);
        Ok(self)
    }

    /// Builder form of [`Group::add`].
    pub fn with_task(mut self, task: Task) -> Result<Self> {
        self.add(task)?;
        Ok(self)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }
}
