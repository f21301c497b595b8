//! # Studyflow Core Library
//!
//! This library provides the core business logic for the Studyflow study
//! timer. Everything runs locally and synchronously; a presentation layer
//! (the `studyflow` CLI, or any UI) drives it and listens to its events.
//!
//! ## Architecture
//!
//! - **Task queue**: ordered work and break tasks with automatic break
//!   insertion between work tasks
//! - **Session clock**: a countdown state machine that requires the caller to
//!   invoke `tick()` once per second
//! - **Orchestrator**: binds the clock to the queue and decides what comes next
//! - **Planner**: turns a free-text study goal into a timed plan, offline
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`TaskStore`]: Task queue
//! - [`SessionClock`]: Countdown state machine
//! - [`SessionOrchestrator`]: Session lifecycle and rotation
//! - [`PlanGenerator`]: Goal analysis and plan building
//! - [`Database`] / [`Persistence`]: State persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod history;
pub mod notify;
pub mod planner;
pub mod session;
pub mod storage;
pub mod task;
pub mod time;
pub mod timer;

pub use error::{ConfigError, NotifyError, PlanError, StorageError};
pub use events::{Event, EventBus};
pub use history::{completion_message, FocusHistory, FocusLevel, FocusStats};
pub use notify::{Notifier, SilentNotifier, TerminalBell};
pub use planner::{analyze_goal, PlanGenerator, SessionLength, StudyPlan};
pub use session::{BehaviorEvent, SessionOrchestrator, SessionOutcome};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, Persistence};
pub use task::{CompletionSource, Task, TaskKind, TaskMetadata, TaskStore};
pub use time::{ManualTime, SystemTimeSource, TimeSource};
pub use timer::{ClockState, DurationLimits, Mode, ModeDurations, SessionClock, SessionState};
