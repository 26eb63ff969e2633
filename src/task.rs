// src/task.rs
// Observable, cancellable units of simulated back-end work. A task walks a
// list of labelled steps with a delay between them, then runs its work
// closure. The UI polls or subscribes to the state; terminal states are final.

use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::errors::GuardError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProgress {
    /// 1-based index of the step in flight.
    pub step: usize,
    pub total_steps: usize,
    pub label: String,
    pub percent: u8,
}

impl TaskProgress {
    fn at_step(index: usize, total_steps: usize, label: &str) -> Self {
        let percent = if total_steps == 0 {
            0
        } else {
            (index * 100 / total_steps).min(100) as u8
        };
        Self {
            step: index + 1,
            total_steps,
            label: label.to_string(),
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskState<T> {
    Pending(TaskProgress),
    Succeeded(T),
    Failed(String),
    Cancelled,
}

impl<T> TaskState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Pending(_))
    }

    pub fn progress(&self) -> Option<&TaskProgress> {
        match self {
            TaskState::Pending(progress) => Some(progress),
            _ => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            TaskState::Pending(_) => "pending",
            TaskState::Succeeded(_) => "succeeded",
            TaskState::Failed(_) => "failed",
            TaskState::Cancelled => "cancelled",
        }
    }
}

pub struct TaskHandle<T> {
    name: String,
    state_rx: watch::Receiver<TaskState<T>>,
    cancel_tx: watch::Sender<bool>,
}

impl<T: Clone> TaskHandle<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TaskState<T> {
        self.state_rx.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.state_rx.borrow().is_terminal()
    }

    /// Requests cancellation. A no-op once the task has finished.
    pub fn cancel(&self) {
        if self.is_finished() {
            return;
        }
        debug!("Cancellation requested for task '{}'", self.name);
        // Fails only when the task already exited.
        let _ = self.cancel_tx.send(true);
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState<T>> {
        self.state_rx.clone()
    }

    /// Resolves with the terminal state.
    pub async fn wait(&self) -> TaskState<T> {
        let mut rx = self.state_rx.clone();
        let outcome = match rx.wait_for(|state| state.is_terminal()).await {
            Ok(state) => state.clone(),
            Err(_) => TaskState::Failed(format!("task '{}' ended without a result", self.name)),
        };
        outcome
    }
}

async fn cancellation(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Handle dropped: nobody can cancel any more.
            std::future::pending::<()>().await;
        }
    }
}

/// Spawns a staged task on the current tokio runtime.
pub fn spawn_staged<T, F>(
    name: impl Into<String>,
    steps: Vec<String>,
    step_delay: Duration,
    work: F,
) -> TaskHandle<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Result<T, GuardError> + Send + 'static,
{
    let name = name.into();
    let total_steps = steps.len();
    let first_label = steps.first().map(String::as_str).unwrap_or("queued");
    let (state_tx, state_rx) = watch::channel(TaskState::Pending(TaskProgress::at_step(0, total_steps, first_label)));
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    let task_name = name.clone();
    tokio::spawn(async move {
        info!("Task '{}' started ({} steps)", task_name, total_steps);
        for (index, label) in steps.iter().enumerate() {
            state_tx.send_replace(TaskState::Pending(TaskProgress::at_step(index, total_steps, label)));
            debug!("Task '{}' step {}/{}: {}", task_name, index + 1, total_steps, label);
            tokio::select! {
                _ = tokio::time::sleep(step_delay) => {}
                _ = cancellation(&mut cancel_rx) => {
                    info!("Task '{}' cancelled during '{}'", task_name, label);
                    state_tx.send_replace(TaskState::Cancelled);
                    return;
                }
            }
        }
        if *cancel_rx.borrow() {
            info!("Task '{}' cancelled before completion", task_name);
            state_tx.send_replace(TaskState::Cancelled);
            return;
        }
        let outcome = match work() {
            Ok(value) => {
                info!("Task '{}' succeeded", task_name);
                TaskState::Succeeded(value)
            }
            Err(e) => {
                error!("Task '{}' failed: {}", task_name, e);
                TaskState::Failed(e.to_string())
            }
        };
        state_tx.send_replace(outcome);
    });

    TaskHandle {
        name,
        state_rx,
        cancel_tx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn runs_every_step_then_succeeds() {
        let handle = spawn_staged("sum", steps(&["one", "two"]), Duration::from_millis(5), || Ok(2 + 2));
        assert!(matches!(handle.state(), TaskState::Pending(_)));
        assert_eq!(handle.wait().await, TaskState::Succeeded(4));
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn work_errors_become_failed() {
        let handle: TaskHandle<u32> = spawn_staged("broken", steps(&["only"]), Duration::from_millis(1), || {
            Err(GuardError::task_input("broken", "name is blank"))
        });
        match handle.wait().await {
            TaskState::Failed(message) => assert!(message.contains("name is blank")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancel_interrupts_a_running_step() {
        let handle = spawn_staged("slow", steps(&["wait"]), Duration::from_secs(30), || Ok(()));
        handle.cancel();
        let outcome = tokio::time::timeout(Duration::from_secs(5), handle.wait()).await;
        assert_eq!(outcome.ok(), Some(TaskState::Cancelled));
    }

    #[tokio::test]
    async fn cancelling_a_finished_task_keeps_its_result() {
        let handle = spawn_staged("quick", Vec::new(), Duration::from_millis(1), || Ok("done"));
        assert_eq!(handle.wait().await, TaskState::Succeeded("done"));
        handle.cancel();
        assert_eq!(handle.state(), TaskState::Succeeded("done"));
    }

    #[tokio::test]
    async fn subscribers_observe_step_progress() {
        let handle = spawn_staged(
            "staged",
            steps(&["a", "b", "c", "d"]),
            Duration::from_millis(10),
            || Ok(()),
        );
        let mut rx = handle.subscribe();
        let mut seen = Vec::new();
        loop {
            let state = rx.borrow_and_update().clone();
            if let Some(progress) = state.progress() {
                if seen.last() != Some(&progress.step) {
                    seen.push(progress.step);
                }
            }
            if state.is_terminal() {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn progress_percent_tracks_completed_steps() {
        assert_eq!(TaskProgress::at_step(0, 5, "x").percent, 0);
        assert_eq!(TaskProgress::at_step(2, 5, "x").percent, 40);
        assert_eq!(TaskProgress::at_step(0, 0, "x").percent, 0);
    }
}
