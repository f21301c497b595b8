use clap::Subcommand;
use studyflow_core::BehaviorEvent;

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Summary of recent sessions
    Show,
    /// Most recent behavior records, newest first
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open()?;

    match action {
        StatsAction::Show => {
            let stats = ws.orch.history().stats();
            print_json(&serde_json::json!({
                "stats": stats,
                "completed_work_count": ws.orch.store().completed_work_count(),
            }))?;
        }
        StatsAction::History { limit } => {
            let recent: Vec<&BehaviorEvent> = ws.orch.history().entries().rev().take(limit).collect();
            print_json(&recent)?;
        }
    }
    Ok(())
}
