//! Session countdown clock.
//!
//! The clock is a plain state machine. It does not own a thread or a timer:
//! the caller drives it by calling `tick()` once per second and passes the
//! current wall-clock time into every time-dependent operation.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |           |
//!           +-(0s / skip)-> Idle
//! ```
//!
//! `remaining_secs` is decremented by exactly one per tick, while the
//! completion ratio is measured on active wall time. A lagging driver can
//! therefore report a ratio above 1.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mode::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    Idle,
    Running,
    Paused,
}

/// How a session ended, as measured by the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEnd {
    pub mode: Mode,
    /// Task the session was started against, even if it has since been
    /// detached from the clock.
    pub task_id: Option<u64>,
    /// Countdown length when the session was first started.
    pub nominal_secs: u64,
    /// Active (non-paused) wall time spent in the session.
    pub elapsed_secs: u64,
    /// `elapsed / nominal`; always 0.0 for skips.
    pub completion_ratio: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClockEvent {
    Started {
        mode: Mode,
        remaining_secs: u64,
        resumed: bool,
    },
    Paused {
        remaining_secs: u64,
    },
    Tick {
        remaining_secs: u64,
    },
    Completed(SessionEnd),
    Skipped(SessionEnd),
}

/// Read-only view of the clock for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: Mode,
    pub state: ClockState,
    pub remaining_secs: u64,
    pub active_task_id: Option<u64>,
    pub completed_work_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClock {
    mode: Mode,
    state: ClockState,
    remaining_secs: u64,
    active_task_id: Option<u64>,
    /// Binding captured at the first start of the current session.
    #[serde(default)]
    session_task_id: Option<u64>,
    /// Wall-clock time of the first start of the current session.
    started_at: Option<DateTime<Utc>>,
    /// Countdown length captured at the first start.
    nominal_secs: u64,
    /// Active time accumulated before the latest pause.
    active_ms_baseline: u64,
    /// Set while running; the start of the current running span.
    running_since: Option<DateTime<Utc>>,
}

impl SessionClock {
    /// Create an idle clock showing `minutes` of `mode`.
    pub fn new(mode: Mode, minutes: u32) -> Self {
        Self {
            mode,
            state: ClockState::Idle,
            remaining_secs: minutes_to_secs(minutes),
            active_task_id: None,
            session_task_id: None,
            started_at: None,
            nominal_secs: 0,
            active_ms_baseline: 0,
            running_since: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn is_idle(&self) -> bool {
        self.state == ClockState::Idle
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn active_task_id(&self) -> Option<u64> {
        self.active_task_id
    }

    pub fn snapshot(&self, completed_work_count: u32) -> SessionState {
        SessionState {
            mode: self.mode,
            state: self.state,
            remaining_secs: self.remaining_secs,
            active_task_id: self.active_task_id,
            completed_work_count,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<ClockEvent> {
        match self.state {
            ClockState::Running => None,
            ClockState::Idle | ClockState::Paused => {
                let resumed = self.state == ClockState::Paused;
                if !resumed {
                    self.started_at = Some(now);
                    self.session_task_id = self.active_task_id;
                    self.nominal_secs = self.remaining_secs;
                    self.active_ms_baseline = 0;
                }
                self.state = ClockState::Running;
                self.running_since = Some(now);
                Some(ClockEvent::Started {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    resumed,
                })
            }
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<ClockEvent> {
        if self.state != ClockState::Running {
            return None;
        }
        self.active_ms_baseline = self.elapsed_ms(now);
        self.running_since = None;
        self.state = ClockState::Paused;
        Some(ClockEvent::Paused {
            remaining_secs: self.remaining_secs,
        })
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<ClockEvent> {
        if self.state != ClockState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return Some(ClockEvent::Tick {
                remaining_secs: self.remaining_secs,
            });
        }

        let elapsed_ms = self.elapsed_ms(now);
        let ratio = if self.nominal_secs == 0 {
            0.0
        } else {
            elapsed_ms as f64 / (self.nominal_secs as f64 * 1000.0)
        };
        let end = self.finish(now, elapsed_ms, ratio);
        Some(ClockEvent::Completed(end))
    }

    /// Abandon the current session. Skips are always recorded with a zero
    /// completion ratio.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Option<ClockEvent> {
        if self.state == ClockState::Idle {
            return None;
        }
        let elapsed_ms = self.elapsed_ms(now);
        let end = self.finish(now, elapsed_ms, 0.0);
        Some(ClockEvent::Skipped(end))
    }

    /// Stop and show a fresh countdown of `minutes` for `mode`, bound to
    /// `task_id` if given.
    pub fn load(&mut self, mode: Mode, minutes: u32, task_id: Option<u64>) {
        self.mode = mode;
        self.active_task_id = task_id;
        self.remaining_secs = minutes_to_secs(minutes);
        self.state = ClockState::Idle;
        self.clear_tracking();
    }

    /// Pause a clock restored from storage in the Running state. Nothing
    /// drove it while it was stored, so the current running span is
    /// credited with the seconds actually counted down, not wall time.
    pub fn suspend(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        let counted_ms = self
            .nominal_secs
            .saturating_sub(self.remaining_secs)
            .saturating_mul(1000);
        self.active_ms_baseline = self.active_ms_baseline.max(counted_ms);
        self.running_since = None;
        self.state = ClockState::Paused;
        true
    }

    /// Update the displayed countdown. Only has an effect while idle.
    pub fn reapply_idle_duration(&mut self, minutes: u32) -> bool {
        if self.state != ClockState::Idle {
            return false;
        }
        self.remaining_secs = minutes_to_secs(minutes);
        true
    }

    /// Drop the task back-reference, e.g. because the task was deleted.
    pub fn detach_task(&mut self) {
        self.active_task_id = None;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let running = self
            .running_since
            .map(|since| (now - since).num_milliseconds().max(0) as u64)
            .unwrap_or(0);
        self.active_ms_baseline.saturating_add(running)
    }

    fn finish(&mut self, now: DateTime<Utc>, elapsed_ms: u64, ratio: f64) -> SessionEnd {
        let end = SessionEnd {
            mode: self.mode,
            task_id: self.session_task_id.or(self.active_task_id),
            nominal_secs: self.nominal_secs,
            elapsed_secs: elapsed_ms / 1000,
            completion_ratio: ratio,
            started_at: self.started_at,
            ended_at: now,
        };
        self.state = ClockState::Idle;
        self.clear_tracking();
        end
    }

    fn clear_tracking(&mut self) {
        self.started_at = None;
        self.session_task_id = None;
        self.nominal_secs = 0;
        self.active_ms_baseline = 0;
        self.running_since = None;
    }
}

fn minutes_to_secs(minutes: u32) -> u64 {
    u64::from(minutes).saturating_mul(60)
}
