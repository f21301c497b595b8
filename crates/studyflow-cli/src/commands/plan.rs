use clap::Subcommand;
use studyflow_core::{Config, PlanGenerator, SessionLength};

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Build a study plan from a free-text goal
    Generate {
        /// What you want to get done, e.g. "review calculus chapter 5"
        goal: String,
        /// short (1h), medium (3h) or long (6h); defaults to planner.default_length
        #[arg(long)]
        length: Option<SessionLength>,
        /// Seed for reproducible break activities and motivation
        #[arg(long)]
        seed: Option<u64>,
        /// Append the plan to the task queue
        #[arg(long)]
        apply: bool,
        /// Replace the queue instead of appending
        #[arg(long, requires = "apply")]
        replace: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            goal,
            length,
            seed,
            apply,
            replace,
        } => {
            let config = Config::load_or_default();
            let length = length.unwrap_or(config.planner.default_length);
            let mut planner = match seed.or(config.planner.seed) {
                Some(seed) => PlanGenerator::with_seed(seed),
                None => PlanGenerator::new(),
            };
            let plan = planner.generate(&goal, length)?;

            if !apply {
                return print_json(&plan);
            }
            let mut ws = Workspace::open()?;
            let task_ids = ws.orch.apply_plan(&plan, replace);
            ws.save()?;
            print_json(&serde_json::json!({ "plan": plan, "task_ids": task_ids }))?;
        }
    }
    Ok(())
}
