//! Error types for the benchmark harness.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type produced by workload routines.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a single workload invocation.
pub type TaskResult = std::result::Result<(), BoxError>;

/// Main error type for harness operations
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A workload raised during warm-up or sampling
    #[error("task '{task}' failed: {cause}")]
    TaskFailed { task: String, cause: String },

    /// The stopping policy can never produce a sample
    #[error("invalid stopping policy: {0}")]
    InvalidStoppingPolicy(String),

    /// Two tasks in one group share a name
    #[error("group '{group}' already has a task named '{task}'")]
    DuplicateTask { group: String, task: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Recorded form of a [`HarnessError::TaskFailed`] inside a group outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub task: String,
    pub cause: String,
}

impl TaskFailure {
    pub fn new(task: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            cause: cause.into(),
        }
    }
}

impl From<TaskFailure> for HarnessError {
    fn from(failure: TaskFailure) -> Self {
        HarnessError::TaskFailed {
            task: failure.task,
            cause: failure.cause,
        }
    }
}
