//! Strictly serial task execution.
//!
//! Tasks touch the global representation toggle, so they must never
//! overlap. The queue is a plain sequential fold that stops at the first
//! failure; later tasks are dropped without being started.

use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::error::HarnessError;

pub type TaskFuture<'a> = LocalBoxFuture<'a, Result<(), HarnessError>>;

/// Deferred unit of comparison work.
pub struct Task<'a> {
    label: String,
    run: Box<dyn FnOnce() -> TaskFuture<'a> + 'a>,
}

impl<'a> Task<'a> {
    pub fn new(label: impl Into<String>, run: impl FnOnce() -> TaskFuture<'a> + 'a) -> Self {
        Self {
            label: label.into(),
            run: Box::new(run),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Default)]
pub struct TaskQueue<'a> {
    tasks: Vec<Task<'a>>,
}

impl<'a> TaskQueue<'a> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn push(&mut self, task: Task<'a>) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.tasks.iter().map(Task::label).collect()
    }

    /// Run every task in order. Task N+1 starts only after task N resolved;
    /// the first failure is returned verbatim.
    pub async fn run_series(self) -> Result<(), HarnessError> {
        let total = self.tasks.len();
        for (index, task) in self.tasks.into_iter().enumerate() {
            let Task { label, run } = task;
            debug!(task = %label, index, total, "task start");
            if let Err(err) = run().await {
                warn!(
                    task = %label,
                    index,
                    total,
                    error = %err,
                    "task failed; remaining tasks skipped"
                );
                return Err(err);
            }
        }
        debug!(total, "task queue drained");
        Ok(())
    }
}
