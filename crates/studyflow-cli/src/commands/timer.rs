use clap::Subcommand;
use std::time::Duration;
use studyflow_core::{completion_message, Mode, SessionOrchestrator};
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::{print_json, Workspace};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground (Ctrl-C pauses and exits)
    Run {
        /// Number of sessions to run back to back
        #[arg(long, default_value_t = 1)]
        sessions: u32,
    },
    /// Skip/abandon the current (paused) session
    Skip,
    /// Switch to a mode and reset the countdown
    Mode {
        /// work, short_break or long_break
        mode: Mode,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Status => {
            let ws = Workspace::open()?;
            print_status(&ws.orch)?;
        }
        TimerAction::Run { sessions } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_sessions(sessions))?;
        }
        TimerAction::Skip => {
            let mut ws = Workspace::open()?;
            if ws.orch.skip().is_none() {
                info!("nothing to skip, timer is idle");
            }
            ws.save()?;
            print_status(&ws.orch)?;
        }
        TimerAction::Mode { mode } => {
            let mut ws = Workspace::open()?;
            ws.orch.switch_mode(mode);
            ws.save()?;
            print_status(&ws.orch)?;
        }
    }
    Ok(())
}

async fn run_sessions(sessions: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;
    let show_messages = ws.config.notifications.enabled;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    ws.orch.start();
    emit_events(&mut ws.orch)?;
    let mut finished = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(end) = ws.orch.tick() else {
                    continue;
                };
                finished += 1;
                if show_messages {
                    eprintln!("{}", completion_message(end.completion_ratio));
                }
                emit_events(&mut ws.orch)?;
                ws.save()?;
                if finished >= sessions {
                    break;
                }
                if !ws.orch.clock().is_running() {
                    ws.orch.start();
                    emit_events(&mut ws.orch)?;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    // auto_advance may already have started the next session
    ws.orch.pause();
    emit_events(&mut ws.orch)?;
    ws.save()?;
    Ok(())
}

/// One compact JSON object per line.
fn emit_events(orch: &mut SessionOrchestrator) -> Result<(), Box<dyn std::error::Error>> {
    for event in orch.drain_events() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

fn print_status(orch: &SessionOrchestrator) -> Result<(), Box<dyn std::error::Error>> {
    let state = orch.state();
    let task = state
        .active_task_id
        .and_then(|id| orch.store().get_task(id))
        .map(|t| t.name.clone());
    print_json(&serde_json::json!({
        "mode": state.mode,
        "state": state.state,
        "remaining_secs": state.remaining_secs,
        "active_task_id": state.active_task_id,
        "active_task": task,
        "completed_work_count": state.completed_work_count,
    }))
}
