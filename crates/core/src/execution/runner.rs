//! Bounded-concurrency task runner
//!
//! This module dispatches a fixed list of named tasks with an upper bound on
//! how many run at once. Admission is strict input order: the dispatcher
//! blocks on a semaphore permit before spawning the next task, so a slot must
//! free up before another task starts. Completion order is whatever the
//! underlying I/O dictates; results are reported back in input order.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::types::{DotsmithError, DotsmithResult};

/// How an action finished, as reported by the action itself.
///
/// Skipping is an action-level decision (a repo already present, a dry run);
/// the runner never skips a task on its own.
#[derive(Debug)]
pub enum Completion {
    /// The action ran its side effects to completion.
    Done,
    /// The action determined there was nothing to do.
    Skipped(String),
}

/// Boxed future produced by a task action.
pub type TaskAction = Pin<Box<dyn Future<Output = DotsmithResult<Completion>> + Send>>;

/// One independent unit of work: an opaque identifier plus the action that
/// performs its side effects. Immutable once enqueued.
pub struct Task {
    id: String,
    action: TaskAction,
}

impl Task {
    pub fn new<F>(id: impl Into<String>, action: F) -> Self
    where
        F: Future<Output = DotsmithResult<Completion>> + Send + 'static,
    {
        Self {
            id: id.into(),
            action: Box::pin(action),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Terminal state recorded for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Skipped(String),
    Failed(String),
}

/// Identifier plus outcome. Produced exactly once per task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub id: String,
    pub outcome: TaskOutcome,
}

impl TaskResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Failed(_))
    }
}

/// Aggregate outcome of a run, covering every enqueued task in input order.
#[derive(Debug, Default)]
pub struct RunSummary {
    results: Vec<TaskResult>,
}

impl RunSummary {
    pub fn results(&self) -> &[TaskResult] {
        &self.results
    }

    /// Look up a result by task identifier.
    pub fn get(&self, id: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Succeeded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(TaskResult::is_failure)
    }

    fn count(&self, pred: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Run every task with at most `limit` executing concurrently and return the
/// aggregate result once all of them have reached a terminal state.
///
/// An individual task's failure is recorded in its [`TaskResult`] and does
/// not cancel or block the others. The call itself fails only on invalid
/// configuration: a zero limit or duplicate task identifiers, both rejected
/// before any action starts. There is no retry and no cancellation.
pub async fn run_tasks(tasks: Vec<Task>, limit: usize) -> DotsmithResult<RunSummary> {
    if limit == 0 {
        return Err(DotsmithError::Config(
            "concurrency limit must be at least 1".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for task in &tasks {
        if !seen.insert(task.id.clone()) {
            return Err(DotsmithError::Config(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
    }

    if tasks.is_empty() {
        return Ok(RunSummary::default());
    }

    let total = tasks.len();
    let semaphore = Arc::new(Semaphore::new(limit));
    let mut join_set = JoinSet::new();

    for (index, task) in tasks.into_iter().enumerate() {
        // Blocking the dispatcher here is what enforces input-order admission.
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| DotsmithError::Task(format!("task slot unavailable: {e}")))?;

        join_set.spawn(async move {
            let Task { id, action } = task;
            let outcome = match action.await {
                Ok(Completion::Done) => TaskOutcome::Succeeded,
                Ok(Completion::Skipped(reason)) => TaskOutcome::Skipped(reason),
                Err(e) => TaskOutcome::Failed(e.to_string()),
            };
            drop(permit);
            (index, TaskResult { id, outcome })
        });
    }

    // Join-all: partial results are never returned early.
    let mut slots: Vec<Option<TaskResult>> = (0..total).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (index, result) =
            joined.map_err(|e| DotsmithError::Task(format!("task execution failed: {e}")))?;
        slots[index] = Some(result);
    }

    let results: Vec<TaskResult> = slots.into_iter().flatten().collect();
    debug_assert_eq!(results.len(), total);

    Ok(RunSummary { results })
}
