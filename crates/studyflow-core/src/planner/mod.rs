//! Rule-based study planner.
//!
//! A goal string is classified locally ([`analyze_goal`]) and expanded into
//! an ordered list of work and break blocks ([`build_plan`]). Results are
//! cached per `(goal, session length)` for the lifetime of the generator.
//!
//! Randomness (break activities, motivation) comes from an injected PCG
//! generator so that seeded runs are reproducible.

mod analysis;
mod build;
mod phrases;

pub use analysis::{analyze_goal, Category, Difficulty, GoalAnalysis, Subject};
pub use build::{
    break_minutes, build_plan, phase_minutes, Phase, PlanTask, SessionLength, StudyPlan,
    MAX_BLOCK_MINUTES, MIN_BLOCK_MINUTES,
};

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info};

use crate::error::PlanError;

/// Goals shorter than this (after trimming) are rejected.
pub const MIN_GOAL_CHARS: usize = 2;

/// Shared "a plan is being generated" flag.
///
/// A presentation layer holds a permit while it waits on a request; any
/// generation attempted in the meantime is rejected, not queued.
#[derive(Debug, Clone, Default)]
pub struct GenerationGate {
    busy: Rc<Cell<bool>>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Claim the gate. Returns `None` if it is already held.
    pub fn try_acquire(&self) -> Option<GenerationPermit> {
        if self.busy.replace(true) {
            return None;
        }
        Some(GenerationPermit {
            busy: Rc::clone(&self.busy),
        })
    }
}

/// Releases the gate when dropped.
#[derive(Debug)]
pub struct GenerationPermit {
    busy: Rc<Cell<bool>>,
}

impl Drop for GenerationPermit {
    fn drop(&mut self) {
        self.busy.set(false);
    }
}

pub struct PlanGenerator {
    cache: HashMap<(String, SessionLength), StudyPlan>,
    rng: Mcg128Xsl64,
    gate: GenerationGate,
}

impl PlanGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(Mcg128Xsl64::from_entropy())
    }

    /// Deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Mcg128Xsl64::seed_from_u64(seed))
    }

    pub fn with_rng(rng: Mcg128Xsl64) -> Self {
        Self {
            cache: HashMap::new(),
            rng,
            gate: GenerationGate::new(),
        }
    }

    /// Share an existing gate with a presentation layer.
    pub fn with_gate(mut self, gate: GenerationGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> GenerationGate {
        self.gate.clone()
    }

    pub fn cached_plans(&self) -> usize {
        self.cache.len()
    }

    /// Analyze `goal` and build a plan, or return the cached one.
    ///
    /// # Errors
    /// `GoalTooShort` when the trimmed goal is under [`MIN_GOAL_CHARS`]
    /// (the gate is left untouched), `InFlight` while the gate is held.
    pub fn generate(&mut self, goal: &str, length: SessionLength) -> Result<StudyPlan, PlanError> {
        let goal = goal.trim();
        if goal.chars().count() < MIN_GOAL_CHARS {
            return Err(PlanError::GoalTooShort {
                min_chars: MIN_GOAL_CHARS,
            });
        }
        let _permit = self.gate.try_acquire().ok_or(PlanError::InFlight)?;

        let key = (goal.to_string(), length);
        if let Some(plan) = self.cache.get(&key) {
            debug!(goal, %length, "plan cache hit");
            return Ok(plan.clone());
        }

        let analysis = analyze_goal(goal);
        let plan = build_plan(goal, &analysis, length, &mut self.rng);
        info!(
            category = %plan.category,
            subject = %plan.subject,
            total_minutes = plan.total_minutes,
            work_blocks = plan.work_blocks,
            "plan generated"
        );
        self.cache.insert(key, plan.clone());
        Ok(plan)
    }
}

impl Default for PlanGenerator {
    fn default() -> Self {
        Self::new()
    }
}
