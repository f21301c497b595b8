//! Ordered task queue with automatic break insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BreakVariant, CompletionSource, Task, TaskKind, TaskMetadata};
use crate::planner::StudyPlan;
use crate::timer::{DurationRange, ModeDurations, LONG_BREAK_EVERY};

/// Persisted form of a [`TaskStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub current: Option<u64>,
    #[serde(default)]
    pub completed_work_count: u32,
}

fn first_id() -> u64 {
    1
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: first_id(),
            current: None,
            completed_work_count: 0,
        }
    }
}

/// Ordered list of tasks.
///
/// Every structural change to the work subsequence regenerates the pending
/// auto-generated breaks. Completed tasks and tasks the user (or a plan)
/// added are never touched by that regeneration.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    current: Option<u64>,
    completed_work_count: u32,
    break_durations: ModeDurations,
    duration_range: DurationRange,
}

impl TaskStore {
    pub fn new(break_durations: ModeDurations, duration_range: DurationRange) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            current: None,
            completed_work_count: 0,
            break_durations,
            duration_range,
        }
    }

    /// Rebuild a store from its persisted form, repairing ids and the
    /// highlight if the stored data is inconsistent.
    pub fn from_list(
        list: TaskList,
        break_durations: ModeDurations,
        duration_range: DurationRange,
    ) -> Self {
        let max_id = list.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let mut store = Self {
            tasks: list.tasks,
            next_id: list.next_id.max(max_id + 1),
            current: None,
            completed_work_count: list.completed_work_count,
            break_durations,
            duration_range,
        };
        store.highlight_current(list.current);
        store
    }

    pub fn to_list(&self) -> TaskList {
        TaskList {
            tasks: self.tasks.clone(),
            next_id: self.next_id,
            current: self.current,
            completed_work_count: self.completed_work_count,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get_task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_pending())
    }

    pub fn next_pending_task(&self) -> Option<&Task> {
        self.pending_tasks().next()
    }

    pub fn next_pending_work_task(&self) -> Option<&Task> {
        self.pending_tasks().find(|t| t.kind.is_work())
    }

    pub fn current(&self) -> Option<u64> {
        self.current
    }

    /// Finished Work sessions, used for long-break cadence.
    pub fn completed_work_count(&self) -> u32 {
        self.completed_work_count
    }

    pub fn duration_range(&self) -> DurationRange {
        self.duration_range
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a task. Returns its id, or `None` when `name` is blank.
    pub fn add_task(
        &mut self,
        name: &str,
        duration_minutes: u32,
        kind: TaskKind,
        metadata: TaskMetadata,
    ) -> Option<u64> {
        let id = self.push_task(name, duration_minutes, kind, metadata, false)?;
        self.recalculate_breaks();
        Some(id)
    }

    /// Remove a task. Removing a work task reschedules the pending breaks.
    pub fn delete_task(&mut self, id: u64) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(pos);
        if self.current == Some(id) {
            self.current = None;
        }
        if removed.kind.is_work() {
            self.recalculate_breaks();
        }
        Some(removed)
    }

    /// Mark a task complete at `now`. Returns `false` for unknown or already
    /// completed tasks.
    pub fn complete_task(
        &mut self,
        id: u64,
        source: CompletionSource,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if task.completed {
            return false;
        }
        task.completed = true;
        task.completed_at = Some(now);
        task.completion = Some(source);
        if task.kind.is_work() && source.counts_as_session() {
            self.completed_work_count += 1;
        }
        if self.current == Some(id) {
            self.current = None;
        }
        debug!(task_id = id, ?source, "task completed");
        true
    }

    /// Reverse a completion. Returns `false` for unknown or pending tasks.
    pub fn uncomplete_task(&mut self, id: u64) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if !task.completed {
            return false;
        }
        let counted = task.kind.is_work()
            && task.completion.map(|s| s.counts_as_session()).unwrap_or(false);
        task.completed = false;
        task.completed_at = None;
        task.completion = None;
        if counted {
            self.completed_work_count = self.completed_work_count.saturating_sub(1);
        }
        true
    }

    /// Count a finished work session that was not bound to any task.
    pub fn record_ambient_work_session(&mut self) {
        self.completed_work_count += 1;
    }

    /// Set the highlighted task. Unknown or completed ids are ignored.
    pub fn highlight_current(&mut self, id: Option<u64>) -> bool {
        match id {
            None => {
                self.current = None;
                true
            }
            Some(id) => match self.get_task(id) {
                Some(task) if task.is_pending() => {
                    self.current = Some(id);
                    true
                }
                _ => false,
            },
        }
    }

    /// Append every template of `plan` and reschedule once.
    pub fn apply_plan(&mut self, plan: &StudyPlan) -> Vec<u64> {
        let ids: Vec<u64> = plan
            .tasks
            .iter()
            .filter_map(|template| {
                let metadata = TaskMetadata {
                    phase: Some(template.phase.clone()),
                    category: plan.category.label().to_string(),
                    subject: plan.subject.label().to_string(),
                };
                self.push_task(
                    &template.name,
                    template.duration_minutes,
                    template.kind,
                    metadata,
                    false,
                )
            })
            .collect();
        self.recalculate_breaks();
        ids
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.current = None;
    }

    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.is_pending());
        before - self.tasks.len()
    }

    /// Update the break lengths used for future auto-generated breaks.
    pub fn set_break_durations(&mut self, durations: ModeDurations) {
        self.break_durations = durations;
    }

    pub fn set_duration_range(&mut self, range: DurationRange) {
        self.duration_range = range;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push_task(
        &mut self,
        name: &str,
        duration_minutes: u32,
        kind: TaskKind,
        metadata: TaskMetadata,
        auto_generated: bool,
    ) -> Option<u64> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            name: name.to_string(),
            duration_minutes: self.duration_range.clamp(duration_minutes),
            kind,
            phase: metadata.phase,
            category: metadata.category,
            subject: metadata.subject,
            completed: false,
            completed_at: None,
            completion: None,
            auto_generated,
        });
        Some(id)
    }

    fn auto_break(&mut self, variant: BreakVariant) -> Task {
        let id = self.next_id;
        self.next_id += 1;
        let (name, minutes) = match variant {
            BreakVariant::Short => ("Short Break", self.break_durations.short_break),
            BreakVariant::Long => ("Long Break", self.break_durations.long_break),
        };
        Task {
            id,
            name: name.to_string(),
            duration_minutes: minutes.max(1),
            kind: TaskKind::Break { variant },
            phase: Some("break".to_string()),
            category: super::DEFAULT_CLASSIFICATION.to_string(),
            subject: super::DEFAULT_CLASSIFICATION.to_string(),
            completed: false,
            completed_at: None,
            completion: None,
            auto_generated: true,
        }
    }

    /// Drop pending auto breaks and re-interleave fresh ones after every
    /// pending work task except the last. Completed tasks move behind the
    /// pending frontier, keeping their relative order.
    fn recalculate_breaks(&mut self) {
        let all = std::mem::take(&mut self.tasks);
        let (pending, completed): (Vec<Task>, Vec<Task>) =
            all.into_iter().partition(|t| t.is_pending());
        let kept: Vec<Task> = pending.into_iter().filter(|t| !t.is_regenerable()).collect();
        let last_work = kept.iter().rposition(|t| t.kind.is_work());

        let mut rebuilt = Vec::with_capacity(kept.len() * 2 + completed.len());
        let mut work_seen: u32 = 0;
        let mut iter = kept.into_iter().enumerate().peekable();
        while let Some((idx, task)) = iter.next() {
            let is_work = task.kind.is_work();
            rebuilt.push(task);
            if !is_work || Some(idx) == last_work {
                continue;
            }
            work_seen += 1;
            let followed_by_break = iter
                .peek()
                .map(|(_, next)| next.kind.is_break())
                .unwrap_or(false);
            if !followed_by_break {
                let variant = if work_seen % LONG_BREAK_EVERY == 0 {
                    BreakVariant::Long
                } else {
                    BreakVariant::Short
                };
                let brk = self.auto_break(variant);
                rebuilt.push(brk);
            }
        }
        rebuilt.extend(completed);
        self.tasks = rebuilt;

        if let Some(id) = self.current {
            if self.get_task(id).is_none() {
                self.current = None;
            }
        }
        debug!(tasks = self.tasks.len(), "breaks recalculated");
    }
}
