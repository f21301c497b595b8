pub mod config;
pub mod durations;
pub mod plan;
pub mod stats;
pub mod task;
pub mod timer;

use serde::Serialize;
use studyflow_core::{
    Config, Database, Notifier, Persistence, SessionOrchestrator, SilentNotifier, TaskStore,
    TerminalBell,
};
use tracing::debug;

/// Everything a command needs: the orchestrator rebuilt from storage, the
/// store to write it back to, and the loaded config.
pub struct Workspace {
    pub orch: SessionOrchestrator,
    pub persistence: Persistence<Database>,
    pub config: Config,
}

impl Workspace {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_or_default();
        let persistence = Persistence::new(Database::open()?);

        let durations = persistence.load_durations();
        let store = TaskStore::from_list(persistence.load_tasks(), durations, config.limits.task);
        let mut orch = SessionOrchestrator::new(store, durations, config.limits)
            .with_history(persistence.load_history())
            .with_notifier(notifier(&config))
            .with_auto_advance(config.auto_advance);
        if let Some(clock) = persistence.load_clock() {
            orch = orch.with_clock(clock);
        }
        debug!(tasks = orch.store().len(), "workspace loaded");

        Ok(Self {
            orch,
            persistence,
            config,
        })
    }

    pub fn save(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.persistence.save_session(&self.orch)?;
        Ok(())
    }
}

fn notifier(config: &Config) -> Box<dyn Notifier> {
    if config.notifications.enabled && config.notifications.sound {
        Box::new(TerminalBell::stderr())
    } else {
        Box::new(SilentNotifier)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
