use clap::Subcommand;
use studyflow_core::ModeDurations;

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum DurationsAction {
    /// Show mode durations and their allowed ranges
    Show,
    /// Change one or more mode durations (values are clamped)
    Set {
        #[arg(long)]
        work: Option<u32>,
        #[arg(long)]
        short_break: Option<u32>,
        #[arg(long)]
        long_break: Option<u32>,
    },
}

pub fn run(action: DurationsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;

    match action {
        DurationsAction::Show => {
            print_json(&serde_json::json!({
                "durations": ws.orch.durations(),
                "limits": ws.orch.limits(),
            }))?;
        }
        DurationsAction::Set {
            work,
            short_break,
            long_break,
        } => {
            let current = ws.orch.durations();
            let applied = ws.orch.set_durations(ModeDurations {
                work: work.unwrap_or(current.work),
                short_break: short_break.unwrap_or(current.short_break),
                long_break: long_break.unwrap_or(current.long_break),
            });
            ws.save()?;
            print_json(&applied)?;
        }
    }
    Ok(())
}
