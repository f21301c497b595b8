//! Turning a [`GoalAnalysis`] into timed work/break blocks.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::analysis::{Category, Difficulty, GoalAnalysis, Subject};
use super::phrases;
use crate::error::PlanError;
use crate::task::{BreakVariant, TaskKind};

/// Every generated block lasts between these many minutes.
pub const MIN_BLOCK_MINUTES: u32 = 10;
pub const MAX_BLOCK_MINUTES: u32 = 60;

/// Share of the target time spent on work blocks, in percent.
const WORK_SHARE_PCT: u32 = 70;
const FORCED_WARMUP_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLength {
    Short,
    Medium,
    Long,
}

impl SessionLength {
    pub fn pattern(self) -> &'static [Phase] {
        match self {
            SessionLength::Short => &[Phase::Warmup, Phase::Main],
            SessionLength::Medium => &[Phase::Warmup, Phase::Main, Phase::Deep, Phase::Review],
            SessionLength::Long => &[
                Phase::Warmup,
                Phase::Main,
                Phase::Deep,
                Phase::Main2,
                Phase::Deep2,
                Phase::Review,
            ],
        }
    }

    pub fn target_minutes(self) -> u32 {
        match self {
            SessionLength::Short => 60,
            SessionLength::Medium => 180,
            SessionLength::Long => 360,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionLength::Short => "short",
            SessionLength::Medium => "medium",
            SessionLength::Long => "long",
        }
    }
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SessionLength {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SessionLength::Short),
            "medium" => Ok(SessionLength::Medium),
            "long" => Ok(SessionLength::Long),
            _ => Err(PlanError::UnknownSessionLength(s.to_string())),
        }
    }
}

/// Role of a work block within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Main,
    Deep,
    Main2,
    Deep2,
    Review,
}

impl Phase {
    fn multiplier(self) -> f64 {
        match self {
            Phase::Warmup => 0.4,
            Phase::Main | Phase::Main2 => 1.0,
            Phase::Deep => 1.3,
            Phase::Deep2 => 1.2,
            Phase::Review => 0.7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Warmup => "warmup",
            Phase::Main => "main",
            Phase::Deep => "deep",
            Phase::Main2 => "main2",
            Phase::Deep2 => "deep2",
            Phase::Review => "review",
        }
    }
}

/// One block of a generated plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTask {
    /// Position-derived id, 1-based, local to the plan.
    pub id: u32,
    pub name: String,
    pub duration_minutes: u32,
    pub kind: TaskKind,
    /// Phase label, or "break".
    pub phase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub goal: String,
    pub session_length: SessionLength,
    pub category: Category,
    pub subject: Subject,
    pub difficulty: Difficulty,
    pub target_minutes: u32,
    /// Sum of every block, breaks included.
    pub total_minutes: u32,
    pub work_blocks: usize,
    pub break_count: usize,
    pub motivation: String,
    pub tasks: Vec<PlanTask>,
}

/// Minutes for one work phase.
pub fn phase_minutes(phase: Phase, length: SessionLength, difficulty: Difficulty) -> u32 {
    let pattern_len = length.pattern().len() as u32;
    let work_budget = length.target_minutes() * WORK_SHARE_PCT / 100;
    let base = work_budget / pattern_len;
    let scaled = (f64::from(base) * phase.multiplier() * difficulty.factor()).round() as u32;
    let minutes = if phase == Phase::Warmup && length != SessionLength::Short {
        FORCED_WARMUP_MINUTES
    } else {
        scaled
    };
    minutes.clamp(MIN_BLOCK_MINUTES, MAX_BLOCK_MINUTES)
}

/// Minutes for the break that follows the phase at `index`.
pub fn break_minutes(index: usize, length: SessionLength) -> u32 {
    let midpoint = length.pattern().len() / 2 - 1;
    match length {
        SessionLength::Long if index == midpoint => 15,
        SessionLength::Medium if index == midpoint => 10,
        _ => 5,
    }
}

pub fn build_plan<R: Rng + ?Sized>(
    goal: &str,
    analysis: &GoalAnalysis,
    length: SessionLength,
    rng: &mut R,
) -> StudyPlan {
    let pattern = length.pattern();
    let mut tasks = Vec::with_capacity(pattern.len() * 2);

    for (index, &phase) in pattern.iter().enumerate() {
        tasks.push(PlanTask {
            id: tasks.len() as u32 + 1,
            name: phrases::task_name(analysis.category, analysis.subject, phase),
            duration_minutes: phase_minutes(phase, length, analysis.difficulty),
            kind: TaskKind::Work,
            phase: phase.label().to_string(),
        });

        if index + 1 < pattern.len() {
            let minutes = break_minutes(index, length);
            let variant = if minutes >= 15 {
                BreakVariant::Long
            } else {
                BreakVariant::Short
            };
            tasks.push(PlanTask {
                id: tasks.len() as u32 + 1,
                name: phrases::break_activity(minutes, rng),
                duration_minutes: minutes,
                kind: TaskKind::Break { variant },
                phase: "break".to_string(),
            });
        }
    }

    let total_minutes = tasks.iter().map(|t| t.duration_minutes).sum();
    let work_blocks = tasks.iter().filter(|t| t.kind.is_work()).count();
    StudyPlan {
        goal: goal.to_string(),
        session_length: length,
        category: analysis.category,
        subject: analysis.subject,
        difficulty: analysis.difficulty,
        target_minutes: length.target_minutes(),
        total_minutes,
        work_blocks,
        break_count: tasks.len() - work_blocks,
        motivation: phrases::motivation(analysis.category, rng),
        tasks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::analysis::analyze_goal;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn plan(goal: &str, length: SessionLength) -> StudyPlan {
        let analysis = analyze_goal(goal);
        build_plan(goal, &analysis, length, &mut Mcg128Xsl64::seed_from_u64(1))
    }

    fn phases(plan: &StudyPlan) -> Vec<&str> {
        plan.tasks.iter().map(|t| t.phase.as_str()).collect()
    }

    #[test]
    fn short_plan_shape() {
        let p = plan("read chapter three", SessionLength::Short);
        assert_eq!(phases(&p), vec!["warmup", "break", "main"]);
        assert_eq!(p.target_minutes, 60);
        assert_eq!(p.break_count, 1);
        assert_eq!(p.tasks[1].duration_minutes, 5);
        assert_eq!(p.tasks[1].kind, TaskKind::SHORT_BREAK);
        // 42 / 2 = 21; warmup 21 * 0.4 = 8 clamps up to 10.
        assert_eq!(p.tasks[0].duration_minutes, 10);
        assert_eq!(p.tasks[2].duration_minutes, 21);
        assert_eq!(p.total_minutes, 36);
    }

    #[test]
    fn medium_plan_durations() {
        let p = plan("learn statistics", SessionLength::Medium);
        let work: Vec<u32> = p
            .tasks
            .iter()
            .filter(|t| t.kind.is_work())
            .map(|t| t.duration_minutes)
            .collect();
        // base = floor(126 / 4) = 31
        assert_eq!(work, vec![10, 31, 40, 22]);
        let breaks: Vec<u32> = p
            .tasks
            .iter()
            .filter(|t| t.kind.is_break())
            .map(|t| t.duration_minutes)
            .collect();
        assert_eq!(breaks, vec![5, 10, 5]);
    }

    #[test]
    fn long_plan_midpoint_break_is_long() {
        let p = plan("build a compiler", SessionLength::Long);
        assert_eq!(
            phases(&p),
            vec![
                "warmup", "break", "main", "break", "deep", "break", "main2", "break", "deep2",
                "break", "review"
            ]
        );
        let breaks: Vec<(u32, TaskKind)> = p
            .tasks
            .iter()
            .filter(|t| t.kind.is_break())
            .map(|t| (t.duration_minutes, t.kind))
            .collect();
        assert_eq!(breaks[2], (15, TaskKind::LONG_BREAK));
        assert!(breaks
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || *b == (5, TaskKind::SHORT_BREAK)));
        assert_eq!(p.work_blocks, 6);
    }

    #[test]
    fn long_warmup_is_always_ten_minutes() {
        for goal in ["advanced complex calculus", "basic overview", "study"] {
            let p = plan(goal, SessionLength::Long);
            assert_eq!(p.tasks[0].phase, "warmup");
            assert_eq!(p.tasks[0].duration_minutes, 10, "goal: {goal}");
        }
    }

    #[test]
    fn difficulty_scales_work_blocks() {
        assert_eq!(phase_minutes(Phase::Main, SessionLength::Long, Difficulty::Medium), 42);
        assert_eq!(phase_minutes(Phase::Main, SessionLength::Long, Difficulty::Hard), 46);
        assert_eq!(phase_minutes(Phase::Main, SessionLength::Long, Difficulty::Easy), 38);
        assert_eq!(phase_minutes(Phase::Deep, SessionLength::Long, Difficulty::Hard), 60);
    }

    #[test]
    fn block_ids_follow_position() {
        let p = plan("review notes", SessionLength::Medium);
        let ids: Vec<u32> = p.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn parses_session_length() {
        assert_eq!("Long".parse::<SessionLength>().unwrap(), SessionLength::Long);
        assert_eq!(
            "epic".parse::<SessionLength>(),
            Err(PlanError::UnknownSessionLength("epic".into()))
        );
    }
}
