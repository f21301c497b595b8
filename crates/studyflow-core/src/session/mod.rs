//! Session orchestration: wiring the clock to the task queue.

mod orchestrator;
mod telemetry;

pub use orchestrator::{SessionOrchestrator, TIME_UP_MESSAGE};
pub use telemetry::{BehaviorEvent, SessionOutcome, TaskContext, EARLY_RATIO, EXTENDED_RATIO};
