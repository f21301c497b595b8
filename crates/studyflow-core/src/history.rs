//! Recent-session log and the statistics derived from it.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::session::{BehaviorEvent, SessionOutcome};

/// Number of behavior events kept.
pub const HISTORY_CAPACITY: usize = 50;

/// Work sessions considered for the focus level.
const FOCUS_WINDOW: usize = 5;
const FOCUS_MIN_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusStats {
    pub total_sessions: usize,
    pub completed_work_sessions: usize,
    pub skipped_sessions: usize,
    pub focus_minutes: u64,
    pub average_completion: f64,
    pub favorite_category: Option<String>,
    pub focus_level: Option<FocusLevel>,
    pub insight: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusHistory {
    entries: VecDeque<BehaviorEvent>,
}

impl FocusHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, keeping the newest ones.
    pub fn from_entries(entries: Vec<BehaviorEvent>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            history.push(entry);
        }
        history
    }

    pub fn push(&mut self, event: BehaviorEvent) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &BehaviorEvent> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<BehaviorEvent> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean completion ratio of the last few Work sessions.
    pub fn recent_focus(&self) -> Option<f64> {
        let recent: Vec<f64> = self
            .entries
            .iter()
            .rev()
            .filter(|e| e.is_work())
            .take(FOCUS_WINDOW)
            .map(|e| e.completion_ratio)
            .collect();
        if recent.len() < FOCUS_MIN_SAMPLES {
            return None;
        }
        Some(recent.iter().sum::<f64>() / recent.len() as f64)
    }

    pub fn focus_level(&self) -> Option<FocusLevel> {
        self.recent_focus().map(|mean| {
            if mean < 0.6 {
                FocusLevel::Low
            } else if mean > 0.95 {
                FocusLevel::High
            } else {
                FocusLevel::Medium
            }
        })
    }

    pub fn insight(&self) -> String {
        match (self.focus_level(), self.recent_focus()) {
            (Some(FocusLevel::Low), _) => {
                "Shorter, manageable sessions will help build focus".to_string()
            }
            (Some(FocusLevel::High), _) => {
                "You're in great focus form! Try extending your sessions".to_string()
            }
            (Some(FocusLevel::Medium), Some(mean)) => {
                format!("Steady focus: {:.0}% average completion", mean * 100.0)
            }
            _ => "Building your focus profile...".to_string(),
        }
    }

    pub fn stats(&self) -> FocusStats {
        let skipped = self
            .entries
            .iter()
            .filter(|e| e.outcome == SessionOutcome::Skipped)
            .count();
        let finished_work: Vec<&BehaviorEvent> = self
            .entries
            .iter()
            .filter(|e| e.is_work() && e.outcome != SessionOutcome::Skipped)
            .collect();
        let focus_secs: u64 = self
            .entries
            .iter()
            .filter(|e| e.is_work())
            .map(|e| e.elapsed_secs)
            .sum();
        let average_completion = if self.entries.is_empty() {
            0.0
        } else {
            self.entries.iter().map(|e| e.completion_ratio).sum::<f64>() / self.entries.len() as f64
        };

        FocusStats {
            total_sessions: self.entries.len(),
            completed_work_sessions: finished_work.len(),
            skipped_sessions: skipped,
            focus_minutes: focus_secs / 60,
            average_completion,
            favorite_category: favorite_category(&finished_work),
            focus_level: self.focus_level(),
            insight: self.insight(),
        }
    }
}

/// Most frequent task category; the one seen first wins ties.
fn favorite_category(sessions: &[&BehaviorEvent]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, event) in sessions.iter().enumerate() {
        if let Some(task) = &event.task {
            counts.entry(task.category.as_str()).or_insert((0, order)).0 += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
        .map(|(category, _)| category.to_string())
}

/// Encouragement shown after a session, banded by completion ratio.
pub fn completion_message(ratio: f64) -> &'static str {
    if ratio >= 0.9 {
        "Outstanding session! Keep this momentum!"
    } else if ratio >= 0.7 {
        "Solid progress! Building great habits!"
    } else if ratio >= 0.5 {
        "Good effort! Every session counts!"
    } else {
        "Thanks for trying! Tomorrow is a fresh start!"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TaskContext;
    use crate::task::TaskKind;
    use crate::timer::Mode;
    use chrono::Utc;
    use uuid::Uuid;

    fn event(mode: Mode, ratio: f64, outcome: SessionOutcome, category: Option<&str>) -> BehaviorEvent {
        BehaviorEvent {
            id: Uuid::new_v4(),
            mode,
            nominal_secs: 600,
            elapsed_secs: (600.0 * ratio) as u64,
            completion_ratio: ratio,
            outcome,
            task: category.map(|c| TaskContext {
                task_id: 1,
                name: "t".into(),
                kind: TaskKind::Work,
                category: c.into(),
                subject: "general".into(),
                phase: None,
            }),
            at: Utc::now(),
        }
    }

    fn work(ratio: f64) -> BehaviorEvent {
        event(Mode::Work, ratio, SessionOutcome::classify(ratio), None)
    }

    #[test]
    fn keeps_only_the_newest_entries() {
        let mut history = FocusHistory::new();
        for i in 0..(HISTORY_CAPACITY + 7) {
            history.push(work(i as f64 / 100.0));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.entries().next().unwrap().completion_ratio, 0.07);
    }

    #[test]
    fn focus_level_needs_three_work_sessions() {
        let mut history = FocusHistory::new();
        history.push(work(1.0));
        history.push(event(Mode::ShortBreak, 1.0, SessionOutcome::Completed, None));
        history.push(work(1.0));
        assert_eq!(history.focus_level(), None);
        assert_eq!(history.insight(), "Building your focus profile...");

        history.push(work(1.0));
        assert_eq!(history.focus_level(), Some(FocusLevel::High));
    }

    #[test]
    fn focus_level_uses_last_five_work_sessions() {
        let mut history = FocusHistory::new();
        for _ in 0..5 {
            history.push(work(1.0));
        }
        for _ in 0..5 {
            history.push(work(0.3));
        }
        assert_eq!(history.focus_level(), Some(FocusLevel::Low));

        history.push(work(0.9));
        history.push(work(0.9));
        // last five: 0.9, 0.9, 0.3, 0.3, 0.3 -> 0.54
        assert_eq!(history.focus_level(), Some(FocusLevel::Low));
        history.push(work(0.9));
        // 0.9 x3, 0.3 x2 -> 0.66
        assert_eq!(history.focus_level(), Some(FocusLevel::Medium));
        assert_eq!(history.insight(), "Steady focus: 66% average completion");
    }

    #[test]
    fn stats_summarize_history() {
        let mut history = FocusHistory::new();
        history.push(event(Mode::Work, 1.0, SessionOutcome::Completed, Some("review")));
        history.push(event(Mode::Work, 1.0, SessionOutcome::Completed, Some("study")));
        history.push(event(Mode::Work, 0.0, SessionOutcome::Skipped, Some("study")));
        history.push(event(Mode::ShortBreak, 1.0, SessionOutcome::Completed, None));

        let stats = history.stats();
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.completed_work_sessions, 2);
        assert_eq!(stats.skipped_sessions, 1);
        assert_eq!(stats.focus_minutes, 20);
        assert!((stats.average_completion - 0.75).abs() < 1e-9);
        // review and study tie at one finished session each; review came first.
        assert_eq!(stats.favorite_category.as_deref(), Some("review"));
    }

    #[test]
    fn empty_history_stats() {
        let stats = FocusHistory::new().stats();
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.average_completion, 0.0);
        assert_eq!(stats.favorite_category, None);
        assert_eq!(stats.focus_level, None);
    }

    #[test]
    fn completion_message_bands() {
        assert_eq!(completion_message(1.0), "Outstanding session! Keep this momentum!");
        assert_eq!(completion_message(0.75), "Solid progress! Building great habits!");
        assert_eq!(completion_message(0.5), "Good effort! Every session counts!");
        assert_eq!(completion_message(0.1), "Thanks for trying! Tomorrow is a fresh start!");
    }
}
