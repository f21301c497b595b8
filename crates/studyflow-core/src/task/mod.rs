//! Task records and the task queue.
//!
//! A [`Task`] is the atomic schedulable unit. Work and break tasks share one
//! record; the break variant only exists on the `Break` arm of [`TaskKind`],
//! so a work task can never carry one.

mod store;

pub use store::{TaskList, TaskStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

pub const DEFAULT_CLASSIFICATION: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakVariant {
    Short,
    Long,
}

/// Kind of task; breaks carry their variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskKind {
    Work,
    Break { variant: BreakVariant },
}

impl TaskKind {
    pub const SHORT_BREAK: TaskKind = TaskKind::Break {
        variant: BreakVariant::Short,
    };
    pub const LONG_BREAK: TaskKind = TaskKind::Break {
        variant: BreakVariant::Long,
    };

    pub fn is_work(&self) -> bool {
        matches!(self, TaskKind::Work)
    }

    pub fn is_break(&self) -> bool {
        matches!(self, TaskKind::Break { .. })
    }

    /// Clock mode used to time a task of this kind.
    pub fn mode(&self) -> Mode {
        match self {
            TaskKind::Work => Mode::Work,
            TaskKind::Break {
                variant: BreakVariant::Short,
            } => Mode::ShortBreak,
            TaskKind::Break {
                variant: BreakVariant::Long,
            } => Mode::LongBreak,
        }
    }
}

/// How a task got completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionSource {
    /// The countdown ran out.
    Timer,
    /// The user ticked the checkbox.
    Manual,
    /// The session was skipped; the task is closed but does not count as a
    /// finished work session.
    Skipped,
}

impl CompletionSource {
    /// Whether a Work task closed this way counts toward long-break cadence.
    pub fn counts_as_session(self) -> bool {
        !matches!(self, CompletionSource::Skipped)
    }
}

/// Optional classification attached to a task on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    pub phase: Option<String>,
    pub category: String,
    pub subject: String,
}

impl Default for TaskMetadata {
    fn default() -> Self {
        Self {
            phase: None,
            category: DEFAULT_CLASSIFICATION.to_string(),
            subject: DEFAULT_CLASSIFICATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, monotonically assigned identifier
    pub id: u64,
    pub name: String,
    pub duration_minutes: u32,
    pub kind: TaskKind,
    /// Plan phase tag (warmup, main, deep, ...)
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default = "default_classification")]
    pub category: String,
    #[serde(default = "default_classification")]
    pub subject: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion: Option<CompletionSource>,
    /// Inserted by the break scheduler; eligible for regeneration.
    #[serde(default)]
    pub auto_generated: bool,
}

fn default_classification() -> String {
    DEFAULT_CLASSIFICATION.to_string()
}

impl Task {
    pub fn is_pending(&self) -> bool {
        !self.completed
    }

    /// Pending auto-generated break, i.e. something recalculation may drop.
    pub fn is_regenerable(&self) -> bool {
        self.auto_generated && !self.completed && self.kind.is_break()
    }
}
