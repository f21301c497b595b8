use clap::{Subcommand, ValueEnum};
use studyflow_core::{Task, TaskKind, TaskMetadata};
use tracing::info;

use super::{print_json, Workspace};

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<KindArg> for TaskKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Work => TaskKind::Work,
            KindArg::ShortBreak => TaskKind::SHORT_BREAK,
            KindArg::LongBreak => TaskKind::LONG_BREAK,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a task to the queue
    Add {
        /// Task name
        name: String,
        /// Duration in minutes
        #[arg(long, short, default_value_t = 25)]
        minutes: u32,
        #[arg(long, value_enum, default_value = "work")]
        kind: KindArg,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        phase: Option<String>,
    },
    /// List tasks as JSON
    List {
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
    },
    /// Delete a task
    Delete { id: u64 },
    /// Mark a task complete
    Complete { id: u64 },
    /// Mark a completed task pending again
    Uncomplete { id: u64 },
    /// Highlight a task as current (omit the id to clear)
    Highlight { id: Option<u64> },
    /// Remove tasks
    Clear {
        /// Only remove completed tasks
        #[arg(long)]
        completed: bool,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;

    match action {
        TaskAction::Add {
            name,
            minutes,
            kind,
            category,
            subject,
            phase,
        } => {
            let mut metadata = TaskMetadata::default();
            if let Some(category) = category {
                metadata.category = category;
            }
            if let Some(subject) = subject {
                metadata.subject = subject;
            }
            metadata.phase = phase;
            match ws.orch.add_task(&name, minutes, kind.into(), metadata) {
                Some(id) => {
                    ws.save()?;
                    print_task(&ws, id)?;
                }
                None => {
                    info!("blank task name ignored");
                    print_json(&Option::<Task>::None)?;
                }
            }
        }
        TaskAction::List { pending } => {
            let tasks: Vec<&Task> = ws
                .orch
                .store()
                .tasks()
                .iter()
                .filter(|t| !pending || t.is_pending())
                .collect();
            print_json(&tasks)?;
        }
        TaskAction::Delete { id } => {
            let removed = ws.orch.delete_task(id);
            if removed.is_some() {
                ws.save()?;
            } else {
                info!(task_id = id, "no such task");
            }
            print_json(&removed)?;
        }
        TaskAction::Complete { id } => {
            if ws.orch.complete_task(id) {
                ws.save()?;
            } else {
                info!(task_id = id, "task unknown or already completed");
            }
            print_task(&ws, id)?;
        }
        TaskAction::Uncomplete { id } => {
            if ws.orch.uncomplete_task(id) {
                ws.save()?;
            } else {
                info!(task_id = id, "task unknown or not completed");
            }
            print_task(&ws, id)?;
        }
        TaskAction::Highlight { id } => {
            if ws.orch.highlight(id) {
                ws.save()?;
            } else {
                info!(task_id = ?id, "task cannot be highlighted");
            }
            print_json(&serde_json::json!({ "current": ws.orch.store().current() }))?;
        }
        TaskAction::Clear { completed } => {
            let removed = if completed {
                ws.orch.clear_completed()
            } else {
                let count = ws.orch.store().len();
                ws.orch.clear_tasks();
                count
            };
            ws.save()?;
            print_json(&serde_json::json!({ "removed": removed }))?;
        }
    }
    Ok(())
}

/// The task as JSON, or `null` when it does not exist.
fn print_task(ws: &Workspace, id: u64) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&ws.orch.store().get_task(id))
}
