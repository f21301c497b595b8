//! Per-session behavior records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{Task, TaskKind};
use crate::timer::{Mode, SessionEnd};

/// Ratios below this are "finished early".
pub const EARLY_RATIO: f64 = 0.8;
/// Ratios above this are "extended".
pub const EXTENDED_RATIO: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Completed,
    Extended,
    FinishedEarly,
    Skipped,
}

impl SessionOutcome {
    pub fn classify(completion_ratio: f64) -> Self {
        if completion_ratio < EARLY_RATIO {
            SessionOutcome::FinishedEarly
        } else if completion_ratio > EXTENDED_RATIO {
            SessionOutcome::Extended
        } else {
            SessionOutcome::Completed
        }
    }
}

/// Snapshot of the task a session was bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskContext {
    pub task_id: u64,
    pub name: String,
    pub kind: TaskKind,
    pub category: String,
    pub subject: String,
    #[serde(default)]
    pub phase: Option<String>,
}

impl From<&Task> for TaskContext {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id,
            name: task.name.clone(),
            kind: task.kind,
            category: task.category.clone(),
            subject: task.subject.clone(),
            phase: task.phase.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: Uuid,
    pub mode: Mode,
    pub nominal_secs: u64,
    pub elapsed_secs: u64,
    pub completion_ratio: f64,
    pub outcome: SessionOutcome,
    #[serde(default)]
    pub task: Option<TaskContext>,
    pub at: DateTime<Utc>,
}

impl BehaviorEvent {
    pub fn completed(end: &SessionEnd, task: Option<TaskContext>) -> Self {
        Self::build(end, task, SessionOutcome::classify(end.completion_ratio))
    }

    pub fn skipped(end: &SessionEnd, task: Option<TaskContext>) -> Self {
        Self::build(end, task, SessionOutcome::Skipped)
    }

    fn build(end: &SessionEnd, task: Option<TaskContext>, outcome: SessionOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: end.mode,
            nominal_secs: end.nominal_secs,
            elapsed_secs: end.elapsed_secs,
            completion_ratio: end.completion_ratio,
            outcome,
            task,
            at: end.ended_at,
        }
    }

    pub fn is_work(&self) -> bool {
        self.mode == Mode::Work
    }
}
