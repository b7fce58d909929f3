//! Fire-and-forget work started by actions
//!
//! Actions return as soon as their work is launched. Whatever keeps running
//! (tone playback, temp file cleanup, child process reaping) is tracked here
//! so failures still reach the log and tests can await completion.

use crate::error::Result;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub label: &'static str,
    pub reason: String,
}

pub struct BackgroundTasks {
    handle: Handle,
    tasks: Vec<(&'static str, JoinHandle<Result<()>>)>,
}

impl BackgroundTasks {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            tasks: Vec::new(),
        }
    }

    pub fn spawn<F>(&mut self, label: &'static str, fut: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let task = self.handle.spawn(fut);
        self.tasks.push((label, task));
    }

    /// Runtime the tasks are spawned on
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Collect tasks that already finished, without waiting on the rest
    pub async fn reap(&mut self) -> Vec<TaskFailure> {
        let (done, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|(_, task)| task.is_finished());
        self.tasks = live;
        collect(done).await
    }

    /// Wait for every tracked task
    pub async fn join_all(&mut self) -> Vec<TaskFailure> {
        collect(std::mem::take(&mut self.tasks)).await
    }
}

async fn collect(done: Vec<(&'static str, JoinHandle<Result<()>>)>) -> Vec<TaskFailure> {
    let mut failures = Vec::new();
    for (label, task) in done {
        let reason = match task.await {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("task aborted: {e}"),
        };
        log::warn!("Background task `{label}` failed: {reason}");
        failures.push(TaskFailure { label, reason });
    }
    failures
}
