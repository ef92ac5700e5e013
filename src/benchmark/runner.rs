//! Benchmark execution: sampling tasks and running groups.
//!
//! Every invocation runs on the calling thread, one after another. Timestamps
//! are taken with [`Instant`] immediately around each invocation, so nothing
//! else the harness does is attributed to a sample.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::benchmark::task::{Group, Routine, Task};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result, TaskFailure, TaskResult};
use crate::metrics::{summarize, TaskStatistics};

/// When the sampler stops invoking a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoppingPolicy {
    /// Stop after exactly this many samples
    Samples(usize),
    /// Stop once the summed sample durations reach `budget` and at least
    /// `min_samples` have been taken, or as soon as `max_samples` are held
    TimeBudget {
        budget: Duration,
        min_samples: usize,
        max_samples: usize,
    },
}

impl StoppingPolicy {
    /// Reject policies that could never produce a sample.
    pub fn validate(&self) -> Result<()> {
        match *self {
            StoppingPolicy::Samples(0) => Err(HarnessError::InvalidStoppingPolicy(
                "sample count must be greater than zero".into(),
            )),
            StoppingPolicy::TimeBudget {
                budget,
                min_samples: 0,
                ..
            } if budget.is_zero() => Err(HarnessError::InvalidStoppingPolicy(
                "time budget and minimum sample count are both zero".into(),
            )),
            StoppingPolicy::TimeBudget {
                min_samples,
                max_samples,
                ..
            } if max_samples == 0 || max_samples < min_samples => {
                Err(HarnessError::InvalidStoppingPolicy(format!(
                    "sample cap {max_samples} is below the minimum of {min_samples}"
                )))
            }
            _ => Ok(()),
        }
    }

    fn is_satisfied(&self, count: usize, elapsed: Duration) -> bool {
        match *self {
            StoppingPolicy::Samples(n) => count >= n,
            StoppingPolicy::TimeBudget {
                budget,
                min_samples,
                max_samples,
            } => count >= max_samples || (elapsed >= budget && count >= min_samples),
        }
    }
}

/// Durations (seconds) recorded for one task
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    pub task: String,
    pub samples: Vec<f64>,
}

impl SampleSet {
    pub fn statistics(&self) -> TaskStatistics {
        summarize(self.task.clone(), &self.samples)
    }
}

/// Result of running one group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub title: String,
    /// Statistics of the tasks that completed, in registration order
    pub statistics: Vec<TaskStatistics>,
    pub failures: Vec<TaskFailure>,
}

impl GroupOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Repeatedly invokes tasks under a stopping policy
#[derive(Debug, Clone)]
pub struct Sampler {
    policy: StoppingPolicy,
    warmup_iterations: usize,
}

impl Sampler {
    /// Build a sampler; fails with `InvalidStoppingPolicy` before anything runs.
    pub fn new(policy: StoppingPolicy, warmup_iterations: usize) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            warmup_iterations,
        })
    }

    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        Self::new(config.policy(), config.warmup_iterations)
    }

    pub fn policy(&self) -> StoppingPolicy {
        self.policy
    }

    pub fn warmup_iterations(&self) -> usize {
        self.warmup_iterations
    }

    /// Sample a single task.
    ///
    /// Warm-up invocations run first and are not recorded. An error or panic
    /// from the task aborts its sampling with [`HarnessError::TaskFailed`].
    /// The task's routine is released whether or not sampling succeeded; a
    /// panic while releasing is a `TaskFailed` too.
    pub fn sample(&self, task: &mut Task) -> Result<SampleSet> {
        let name = task.name().to_string();
        let routine = task.routine_mut();

        guarded(&name, || routine.acquire())?;
        let samples = self.collect(&name, routine);
        let released = guarded(&name, || {
            routine.release();
            Ok(())
        });

        let samples = samples?;
        released?;
        Ok(SampleSet {
            task: name,
            samples,
        })
    }

    fn collect(&self, name: &str, routine: &mut dyn Routine) -> Result<Vec<f64>> {
        for _ in 0..self.warmup_iterations {
            guarded(name, || routine.invoke())?;
        }

        let mut samples = Vec::new();
        let mut elapsed = Duration::ZERO;
        while !self.policy.is_satisfied(samples.len(), elapsed) {
            let start = Instant::now();
            let outcome = guarded(name, || routine.invoke());
            let duration = start.elapsed();
            outcome?;

            elapsed += duration;
            samples.push(duration.as_secs_f64());
        }
        Ok(samples)
    }

    /// Run every task of a group in registration order.
    ///
    /// A failing task is recorded and skipped; its siblings still run.
    pub fn run_group(&self, mut group: Group) -> GroupOutcome {
        info!("Running group '{}' ({} tasks)", group.title(), group.len());

        let mut outcome = GroupOutcome {
            title: group.title().to_string(),
            ..GroupOutcome::default()
        };

        for task in group.tasks_mut() {
            match self.sample(task) {
                Ok(set) => {
                    let stats = set.statistics();
                    debug!(
                        "{}: {} samples, mean {:.3e}s",
                        stats.name, stats.sample_count, stats.mean
                    );
                    outcome.statistics.push(stats);
                }
                Err(HarnessError::TaskFailed { task, cause }) => {
                    warn!("Task '{}' failed: {}", task, cause);
                    outcome.failures.push(TaskFailure { task, cause });
                }
                Err(other) => {
                    warn!("Task '{}' aborted: {}", task.name(), other);
                    outcome
                        .failures
                        .push(TaskFailure::new(task.name(), other.to_string()));
                }
            }
        }

        outcome
    }
}

/// Ordered list of groups sharing one sampler
#[derive(Debug)]
pub struct Suite {
    sampler: Sampler,
    groups: Vec<Group>,
}

impl Suite {
    pub fn new(sampler: Sampler) -> Self {
        Self {
            sampler,
            groups: Vec::new(),
        }
    }

    pub fn add_group(&mut self, group: Group) -> &mut Self {
        self.groups.push(group);
        self
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Run all groups in order, handing each outcome to `on_complete` as soon
    /// as its group finishes. Groups are dropped once they have run.
    pub fn run(self, mut on_complete: impl FnMut(&GroupOutcome)) -> Vec<GroupOutcome> {
        let total = self.groups.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, group) in self.groups.into_iter().enumerate() {
            debug!("Suite progress: group {}/{}", index + 1, total);
            let outcome = self.sampler.run_group(group);
            on_complete(&outcome);
            outcomes.push(outcome);
        }

        info!("Suite complete: {} groups", total);
        outcomes
    }
}

/// Invoke `f`, turning an error or a panic into `TaskFailed`.
fn guarded(name: &str, f: impl FnOnce() -> TaskResult) -> Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(cause)) => Err(HarnessError::TaskFailed {
            task: name.to_string(),
            cause: cause.to_string(),
        }),
        Err(payload) => Err(HarnessError::TaskFailed {
            task: name.to_string(),
            cause: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_task(name: &str, calls: &Rc<Cell<usize>>) -> Task {
        let calls = Rc::clone(calls);
        Task::new(name, move || {
            calls.set(calls.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_zero_sample_count_is_rejected() {
        let err = Sampler::new(StoppingPolicy::Samples(0), 0).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidStoppingPolicy(_)));
    }

    #[test]
    fn test_empty_time_budget_is_rejected() {
        let policy = StoppingPolicy::TimeBudget {
            budget: Duration::ZERO,
            min_samples: 0,
            max_samples: 10,
        };
        assert!(matches!(
            policy.validate(),
            Err(HarnessError::InvalidStoppingPolicy(_))
        ));
    }

    #[test]
    fn test_cap_below_minimum_is_rejected() {
        let policy = StoppingPolicy::TimeBudget {
            budget: Duration::from_millis(5),
            min_samples: 10,
            max_samples: 9,
        };
        assert!(matches!(
            Sampler::new(policy, 0),
            Err(HarnessError::InvalidStoppingPolicy(_))
        ));
    }

    #[test]
    fn test_sample_cap_bounds_fast_tasks() {
        let calls = Rc::new(Cell::new(0));
        let mut task = counting_task("noop", &calls);
        let policy = StoppingPolicy::TimeBudget {
            budget: Duration::from_secs(60),
            min_samples: 10,
            max_samples: 250,
        };

        let set = Sampler::new(policy, 2).unwrap().sample(&mut task).unwrap();
        assert_eq!(set.samples.len(), 250);
        assert_eq!(calls.get(), 252);
    }

    #[test]
    fn test_fixed_count_excludes_warmup() {
        let calls = Rc::new(Cell::new(0));
        let mut task = counting_task("count", &calls);
        let sampler = Sampler::new(StoppingPolicy::Samples(7), 3).unwrap();

        let set = sampler.sample(&mut task).unwrap();
        assert_eq!(set.samples.len(), 7);
        assert_eq!(calls.get(), 10);
        assert!(set.samples.iter().all(|s| *s >= 0.0));
    }

    #[test]
    fn test_time_budget_keeps_sampling_until_spent() {
        let mut task = Task::new("sleepy", || {
            std::thread::sleep(Duration::from_millis(2));
            Ok(())
        });
        let policy = StoppingPolicy::TimeBudget {
            budget: Duration::from_millis(10),
            min_samples: 1,
            max_samples: 1_000,
        };
        let set = Sampler::new(policy, 0).unwrap().sample(&mut task).unwrap();

        let total: f64 = set.samples.iter().sum();
        assert!(total >= 0.010);
        assert!(set.samples.len() <= 5);
    }

    #[test]
    fn test_error_aborts_sampling() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut task = Task::new("flaky", move || {
            counter.set(counter.get() + 1);
            if counter.get() == 3 {
                Err("third call breaks".into())
            } else {
                Ok(())
            }
        });

        let err = Sampler::new(StoppingPolicy::Samples(10), 0)
            .unwrap()
            .sample(&mut task)
            .unwrap_err();
        match err {
            HarnessError::TaskFailed { task, cause } => {
                assert_eq!(task, "flaky");
                assert_eq!(cause, "third call breaks");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_panic_is_reported_as_failure() {
        let mut task = Task::new("boom", || panic!("kaboom"));
        let err = Sampler::new(StoppingPolicy::Samples(1), 0)
            .unwrap()
            .sample(&mut task)
            .unwrap_err();
        assert!(err.to_string().contains("kaboom"));
    }

    #[test]
    fn test_warmup_failure_is_task_failure() {
        let mut task = Task::new("cold", || Err("not ready".into()));
        let err = Sampler::new(StoppingPolicy::Samples(1), 2)
            .unwrap()
            .sample(&mut task)
            .unwrap_err();
        assert!(matches!(err, HarnessError::TaskFailed { .. }));
    }

    #[test]
    fn test_context_is_released_after_failure() {
        let released = Rc::new(Cell::new(false));
        let flag = Rc::clone(&released);

        struct Context(Rc<Cell<bool>>);
        impl Drop for Context {
            fn drop(&mut self) {
                self.0.set(true);
            }
        }

        let mut task = Task::with_context(
            "scoped",
            move || Ok(Context(Rc::clone(&flag))),
            |_ctx: &mut Context| Err("broken".into()),
        );
        let result = Sampler::new(StoppingPolicy::Samples(3), 0)
            .unwrap()
            .sample(&mut task);

        assert!(result.is_err());
        assert!(released.get());
    }

    #[test]
    fn test_panicking_release_does_not_stop_siblings() {
        struct Brittle;
        impl Drop for Brittle {
            fn drop(&mut self) {
                panic!("teardown exploded");
            }
        }

        let group = Group::new("teardown")
            .with_task(Task::with_context(
                "brittle",
                || Ok(Brittle),
                |_ctx: &mut Brittle| Ok(()),
            ))
            .and_then(|g| g.with_task(Task::new("sturdy", || Ok(()))))
            .unwrap();

        let outcome = Sampler::new(StoppingPolicy::Samples(3), 0)
            .unwrap()
            .run_group(group);

        assert_eq!(outcome.statistics.len(), 1);
        assert_eq!(outcome.statistics[0].name, "sturdy");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].task, "brittle");
        assert!(outcome.failures[0].cause.contains("teardown exploded"));
    }

    #[test]
    fn test_suite_reports_each_group_in_order() {
        let sampler = Sampler::new(StoppingPolicy::Samples(2), 0).unwrap();
        let mut suite = Suite::new(sampler);
        suite
            .add_group(Group::new("first").with_task(Task::new("a", || Ok(()))).unwrap())
            .add_group(Group::new("second"));

        let mut seen = Vec::new();
        let outcomes = suite.run(|outcome| seen.push(outcome.title.clone()));

        assert_eq!(seen, ["first", "second"]);
        assert_eq!(outcomes[0].statistics.len(), 1);
        assert_eq!(outcomes[0].statistics[0].sample_count, 2);
        assert!(outcomes[1].statistics.is_empty());
        assert!(!outcomes[1].has_failures());
    }
}
