use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planner::Category;
use crate::session::BehaviorEvent;
use crate::timer::{Mode, ModeDurations};

/// Every state change in the core produces an Event.
/// Presentation layers subscribe to them or drain the outbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TasksChanged {
        pending: usize,
        total: usize,
        at: DateTime<Utc>,
    },
    PlanApplied {
        task_ids: Vec<u64>,
        category: Category,
        at: DateTime<Utc>,
    },
    /// The clock was configured for a new session (not started yet).
    SessionLoaded {
        mode: Mode,
        duration_secs: u64,
        task_id: Option<u64>,
        at: DateTime<Utc>,
    },
    SessionStarted {
        mode: Mode,
        remaining_secs: u64,
        task_id: Option<u64>,
        resumed: bool,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Delivered to subscribers only; never buffered in the outbox.
    Tick {
        remaining_secs: u64,
    },
    SessionCompleted {
        mode: Mode,
        task_id: Option<u64>,
        completion_ratio: f64,
        at: DateTime<Utc>,
    },
    SessionSkipped {
        mode: Mode,
        task_id: Option<u64>,
        at: DateTime<Utc>,
    },
    BreakFinished {
        at: DateTime<Utc>,
    },
    DurationsChanged {
        durations: ModeDurations,
        at: DateTime<Utc>,
    },
    Behavior(BehaviorEvent),
    /// The completion signal failed; show this text instead.
    NotificationFallback {
        message: String,
        at: DateTime<Utc>,
    },
}

pub type Subscriber = Box<dyn FnMut(&Event)>;

/// Explicit publish/subscribe channel between the core and its observers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    outbox: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Event) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn publish(&mut self, event: Event) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
        if !matches!(event, Event::Tick { .. }) {
            self.outbox.push(event);
        }
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("outbox", &self.outbox.len())
            .finish()
    }
}
