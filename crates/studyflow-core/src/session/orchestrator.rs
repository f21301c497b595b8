//! Drives the session clock from the task queue.
//!
//! The orchestrator owns one [`TaskStore`] and one [`SessionClock`] and is
//! the only place where the two meet: it decides which task the clock is
//! bound to, what happens when a session completes or is skipped, and what
//! gets loaded next. Every change is published on the [`EventBus`].
//!
//! ## Rotation
//!
//! ```text
//! Work done   -> next pending task, else ambient break (long every 4th)
//! Break done  -> next pending Work task, else ambient Work
//! ```

use tracing::{debug, info, warn};

use super::telemetry::{BehaviorEvent, TaskContext};
use crate::events::{Event, EventBus};
use crate::history::FocusHistory;
use crate::notify::{Notifier, SilentNotifier};
use crate::planner::StudyPlan;
use crate::task::{CompletionSource, Task, TaskKind, TaskMetadata, TaskStore};
use crate::time::{SystemTimeSource, TimeSource};
use crate::timer::{
    ClockEvent, DurationLimits, Mode, ModeDurations, SessionClock, SessionEnd, SessionState,
};

/// Shown when the completion signal cannot be played.
pub const TIME_UP_MESSAGE: &str = "Time's up! Session complete.";

pub struct SessionOrchestrator {
    store: TaskStore,
    clock: SessionClock,
    durations: ModeDurations,
    limits: DurationLimits,
    auto_advance: bool,
    history: FocusHistory,
    notifier: Box<dyn Notifier>,
    time: Box<dyn TimeSource>,
    bus: EventBus,
}

impl SessionOrchestrator {
    /// Build an orchestrator around an existing queue. `durations` are
    /// clamped into `limits`; the clock starts idle in ambient Work mode.
    pub fn new(mut store: TaskStore, durations: ModeDurations, limits: DurationLimits) -> Self {
        let durations = durations.clamped(&limits);
        store.set_break_durations(durations);
        store.set_duration_range(limits.task);
        Self {
            store,
            clock: SessionClock::new(Mode::Work, durations.work),
            durations,
            limits,
            auto_advance: false,
            history: FocusHistory::new(),
            notifier: Box::new(SilentNotifier),
            time: Box::new(SystemTimeSource),
            bus: EventBus::new(),
        }
    }

    /// Restore a clock saved by an earlier run. A clock saved while running
    /// comes back paused, and a binding to a task that no longer exists or
    /// is already done is dropped.
    pub fn with_clock(mut self, clock: SessionClock) -> Self {
        self.clock = clock;
        if self.clock.suspend() {
            info!(
                remaining_secs = self.clock.remaining_secs(),
                "restored running session as paused"
            );
        }
        self.release_stale_task();
        self
    }

    pub fn with_history(mut self, history: FocusHistory) -> Self {
        self.history = history;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Box::new(time);
        self
    }

    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.clock.snapshot(self.store.completed_work_count())
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn durations(&self) -> ModeDurations {
        self.durations
    }

    pub fn limits(&self) -> &DurationLimits {
        &self.limits
    }

    pub fn history(&self) -> &FocusHistory {
        &self.history
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    // ── Events ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Event) + 'static) {
        self.bus.subscribe(subscriber);
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    // ── Session commands ─────────────────────────────────────────────

    /// Start or resume. With nothing bound and the clock idle, the next
    /// pending task is loaded first.
    pub fn start(&mut self) -> bool {
        if self.clock.is_idle() && self.clock.active_task_id().is_none() {
            if let Some(task) = self.store.next_pending_task().cloned() {
                self.bind_task(&task);
            }
        }
        let now = self.time.now();
        match self.clock.start(now) {
            Some(ClockEvent::Started {
                mode,
                remaining_secs,
                resumed,
            }) => {
                info!(%mode, remaining_secs, resumed, "session started");
                self.bus.publish(Event::SessionStarted {
                    mode,
                    remaining_secs,
                    task_id: self.clock.active_task_id(),
                    resumed,
                    at: now,
                });
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        let now = self.time.now();
        match self.clock.pause(now) {
            Some(ClockEvent::Paused { remaining_secs }) => {
                info!(remaining_secs, "session paused");
                self.bus.publish(Event::SessionPaused {
                    remaining_secs,
                    at: now,
                });
                true
            }
            _ => false,
        }
    }

    /// One-second heartbeat. Returns the session end when this tick
    /// finished the countdown.
    pub fn tick(&mut self) -> Option<SessionEnd> {
        let now = self.time.now();
        match self.clock.tick(now)? {
            ClockEvent::Tick { remaining_secs } => {
                debug!(remaining_secs, "tick");
                self.bus.publish(Event::Tick { remaining_secs });
                None
            }
            ClockEvent::Completed(end) => {
                self.on_completed(&end);
                Some(end)
            }
            _ => None,
        }
    }

    /// Abandon the running or paused session. No-op while idle.
    pub fn skip(&mut self) -> Option<SessionEnd> {
        let now = self.time.now();
        match self.clock.skip(now)? {
            ClockEvent::Skipped(end) => {
                self.on_skipped(&end);
                Some(end)
            }
            _ => None,
        }
    }

    /// Stop and reset into `mode`. The active task stays bound only when
    /// its kind is timed in that mode.
    pub fn switch_mode(&mut self, mode: Mode) {
        let kept = self
            .clock
            .active_task_id()
            .and_then(|id| self.store.get_task(id))
            .filter(|task| task.is_pending() && task.kind.mode() == mode)
            .map(|task| (task.id, task.duration_minutes));
        match kept {
            Some((id, minutes)) => self.load(mode, minutes, Some(id)),
            None => {
                self.store.highlight_current(None);
                self.load(mode, self.durations.minutes(mode), None);
            }
        }
    }

    /// Replace the mode durations. Values are clamped; the clamped set is
    /// returned for the caller to persist.
    pub fn set_durations(&mut self, durations: ModeDurations) -> ModeDurations {
        let clamped = durations.clamped(&self.limits);
        self.durations = clamped;
        self.store.set_break_durations(clamped);
        let minutes = self
            .bound_task_minutes()
            .unwrap_or_else(|| clamped.minutes(self.clock.mode()));
        self.clock.reapply_idle_duration(minutes);
        info!(?clamped, "durations updated");
        self.bus.publish(Event::DurationsChanged {
            durations: clamped,
            at: self.time.now(),
        });
        clamped
    }

    // ── Task commands ────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        name: &str,
        duration_minutes: u32,
        kind: TaskKind,
        metadata: TaskMetadata,
    ) -> Option<u64> {
        let id = self.store.add_task(name, duration_minutes, kind, metadata)?;
        self.after_task_change();
        Some(id)
    }

    pub fn delete_task(&mut self, id: u64) -> Option<Task> {
        let removed = self.store.delete_task(id)?;
        self.after_task_change();
        Some(removed)
    }

    /// Manual completion from the task list.
    pub fn complete_task(&mut self, id: u64) -> bool {
        let now = self.time.now();
        if !self.store.complete_task(id, CompletionSource::Manual, now) {
            return false;
        }
        self.after_task_change();
        true
    }

    pub fn uncomplete_task(&mut self, id: u64) -> bool {
        if !self.store.uncomplete_task(id) {
            return false;
        }
        self.after_task_change();
        true
    }

    pub fn highlight(&mut self, id: Option<u64>) -> bool {
        if !self.store.highlight_current(id) {
            return false;
        }
        self.publish_tasks_changed();
        true
    }

    pub fn clear_tasks(&mut self) {
        self.store.clear();
        self.after_task_change();
    }

    pub fn clear_completed(&mut self) -> usize {
        let removed = self.store.clear_completed();
        if removed > 0 {
            self.after_task_change();
        }
        removed
    }

    /// Append a generated plan to the queue, optionally replacing it.
    pub fn apply_plan(&mut self, plan: &StudyPlan, replace: bool) -> Vec<u64> {
        if replace {
            self.store.clear();
        }
        let ids = self.store.apply_plan(plan);
        info!(tasks = ids.len(), category = %plan.category, replace, "plan applied");
        self.bus.publish(Event::PlanApplied {
            task_ids: ids.clone(),
            category: plan.category,
            at: self.time.now(),
        });
        self.after_task_change();
        ids
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn on_completed(&mut self, end: &SessionEnd) {
        let context = self.task_context(end.task_id);
        // A task completed by hand mid-session was already counted.
        let task_known = match end.task_id {
            Some(id) => {
                self.store.complete_task(id, CompletionSource::Timer, end.ended_at);
                self.store.get_task(id).is_some()
            }
            None => false,
        };
        if !task_known && end.mode == Mode::Work {
            self.store.record_ambient_work_session();
        }
        info!(
            mode = %end.mode,
            task_id = ?end.task_id,
            ratio = end.completion_ratio,
            "session completed"
        );

        self.signal_completion();
        self.record_behavior(BehaviorEvent::completed(end, context));
        self.bus.publish(Event::SessionCompleted {
            mode: end.mode,
            task_id: end.task_id,
            completion_ratio: end.completion_ratio,
            at: end.ended_at,
        });
        self.publish_tasks_changed();

        if end.mode.is_break() {
            self.bus.publish(Event::BreakFinished { at: end.ended_at });
            self.load_next_work();
        } else {
            self.load_next(end.mode);
        }
    }

    fn on_skipped(&mut self, end: &SessionEnd) {
        let context = self.task_context(end.task_id);
        if let Some(id) = end.task_id {
            self.store.complete_task(id, CompletionSource::Skipped, end.ended_at);
        }
        info!(mode = %end.mode, task_id = ?end.task_id, "session skipped");

        self.record_behavior(BehaviorEvent::skipped(end, context));
        self.bus.publish(Event::SessionSkipped {
            mode: end.mode,
            task_id: end.task_id,
            at: end.ended_at,
        });
        self.publish_tasks_changed();

        if end.mode.is_break() {
            self.load_next_work();
        } else {
            self.load_next(end.mode);
        }
    }

    /// Next pending task of any kind, else the ambient rotation.
    fn load_next(&mut self, finished: Mode) {
        if let Some(task) = self.store.next_pending_task().cloned() {
            self.bind_task(&task);
        } else {
            let mode = if finished == Mode::Work {
                Mode::break_after(self.store.completed_work_count())
            } else {
                Mode::Work
            };
            self.load_ambient(mode);
        }
        self.maybe_auto_start();
    }

    /// Next pending Work task. Breaks queued in front of it are passed over
    /// and marked skipped.
    fn load_next_work(&mut self) {
        let passed: Vec<u64> = self
            .store
            .pending_tasks()
            .take_while(|t| t.kind.is_break())
            .map(|t| t.id)
            .collect();
        if !passed.is_empty() {
            let now = self.time.now();
            for id in &passed {
                self.store.complete_task(*id, CompletionSource::Skipped, now);
            }
            debug!(?passed, "queued breaks passed over");
            self.publish_tasks_changed();
        }
        if let Some(task) = self.store.next_pending_work_task().cloned() {
            self.bind_task(&task);
        } else {
            self.load_ambient(Mode::Work);
        }
        self.maybe_auto_start();
    }

    fn bind_task(&mut self, task: &Task) {
        self.store.highlight_current(Some(task.id));
        self.load(task.kind.mode(), task.duration_minutes, Some(task.id));
    }

    fn load_ambient(&mut self, mode: Mode) {
        self.store.highlight_current(None);
        self.load(mode, self.durations.minutes(mode), None);
    }

    fn load(&mut self, mode: Mode, minutes: u32, task_id: Option<u64>) {
        self.clock.load(mode, minutes, task_id);
        debug!(%mode, minutes, ?task_id, "session loaded");
        self.bus.publish(Event::SessionLoaded {
            mode,
            duration_secs: self.clock.remaining_secs(),
            task_id,
            at: self.time.now(),
        });
    }

    fn maybe_auto_start(&mut self) {
        if self.auto_advance {
            self.start();
        }
    }

    fn after_task_change(&mut self) {
        self.release_stale_task();
        self.publish_tasks_changed();
    }

    /// Drop a binding to a task that vanished or got completed. An idle
    /// clock falls back to the ambient duration of its mode.
    fn release_stale_task(&mut self) {
        let stale = self
            .clock
            .active_task_id()
            .is_some_and(|id| self.store.get_task(id).map_or(true, |t| t.completed));
        if stale {
            self.clock.detach_task();
            if self.clock.reapply_idle_duration(self.durations.minutes(self.clock.mode())) {
                debug!(mode = %self.clock.mode(), "active task gone, ambient duration restored");
            }
        }
    }

    fn bound_task_minutes(&self) -> Option<u32> {
        self.clock
            .active_task_id()
            .and_then(|id| self.store.get_task(id))
            .map(|task| task.duration_minutes)
    }

    fn task_context(&self, task_id: Option<u64>) -> Option<TaskContext> {
        task_id
            .and_then(|id| self.store.get_task(id))
            .map(TaskContext::from)
    }

    fn record_behavior(&mut self, event: BehaviorEvent) {
        self.history.push(event.clone());
        self.bus.publish(Event::Behavior(event));
    }

    fn signal_completion(&mut self) {
        if let Err(err) = self.notifier.play_completion_signal() {
            warn!(error = %err, "completion signal failed, showing fallback message");
            self.bus.publish(Event::NotificationFallback {
                message: TIME_UP_MESSAGE.to_string(),
                at: self.time.now(),
            });
        }
    }

    fn publish_tasks_changed(&mut self) {
        self.bus.publish(Event::TasksChanged {
            pending: self.store.pending_tasks().count(),
            total: self.store.len(),
            at: self.time.now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::session::SessionOutcome;
    use crate::storage::{MemoryStore, Persistence};
    use crate::time::ManualTime;
    use crate::timer::ClockState;
    use chrono::{TimeZone, Utc};

    struct BrokenSpeaker;

    impl Notifier for BrokenSpeaker {
        fn play_completion_signal(&mut self) -> Result<(), NotifyError> {
            Err(NotifyError::PlaybackFailed("no audio device".into()))
        }
    }

    fn setup() -> (SessionOrchestrator, ManualTime) {
        let time = ManualTime::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let limits = DurationLimits::default();
        let store = TaskStore::new(ModeDurations::default(), limits.task);
        let orch = SessionOrchestrator::new(store, ModeDurations::default(), limits)
            .with_time_source(time.clone());
        (orch, time)
    }

    /// Tick until the countdown finishes, advancing the manual clock in step.
    fn run_out(orch: &mut SessionOrchestrator, time: &ManualTime) -> SessionEnd {
        loop {
            time.advance_secs(1);
            if let Some(end) = orch.tick() {
                return end;
            }
        }
    }

    fn work(orch: &mut SessionOrchestrator, name: &str, minutes: u32) -> u64 {
        orch.add_task(name, minutes, TaskKind::Work, TaskMetadata::default())
            .unwrap()
    }

    #[test]
    fn start_pulls_the_next_pending_task() {
        let (mut orch, _) = setup();
        let id = work(&mut orch, "Read", 10);
        assert!(orch.start());
        let state = orch.state();
        assert_eq!(state.state, ClockState::Running);
        assert_eq!(state.active_task_id, Some(id));
        assert_eq!(state.remaining_secs, 600);
        assert_eq!(orch.store().current(), Some(id));
    }

    #[test]
    fn ambient_work_completion_counts_and_rotates_to_break() {
        let (mut orch, time) = setup();
        orch.set_durations(ModeDurations {
            work: 1,
            short_break: 1,
            long_break: 1,
        });
        orch.start();
        let end = run_out(&mut orch, &time);
        assert_eq!(end.mode, Mode::Work);
        assert!((end.completion_ratio - 1.0).abs() < 1e-9);
        assert_eq!(orch.store().completed_work_count(), 1);
        assert_eq!(orch.state().mode, Mode::ShortBreak);
        assert_eq!(orch.state().state, ClockState::Idle);

        orch.start();
        run_out(&mut orch, &time);
        assert_eq!(orch.state().mode, Mode::Work);
    }

    #[test]
    fn fourth_ambient_session_earns_a_long_break() {
        let (mut orch, time) = setup();
        orch.set_durations(ModeDurations {
            work: 1,
            short_break: 1,
            long_break: 1,
        });
        for _ in 0..3 {
            orch.start();
            run_out(&mut orch, &time);
            orch.start();
            run_out(&mut orch, &time);
        }
        orch.start();
        run_out(&mut orch, &time);
        assert_eq!(orch.store().completed_work_count(), 4);
        assert_eq!(orch.state().mode, Mode::LongBreak);
    }

    #[test]
    fn task_completion_loads_the_inserted_break() {
        let (mut orch, time) = setup();
        let a = work(&mut orch, "A", 1);
        let b = work(&mut orch, "B", 1);
        orch.start();
        run_out(&mut orch, &time);

        assert!(orch.store().get_task(a).unwrap().completed);
        let state = orch.state();
        assert_eq!(state.mode, Mode::ShortBreak);
        let break_id = state.active_task_id.unwrap();
        assert!(orch.store().get_task(break_id).unwrap().kind.is_break());

        orch.start();
        run_out(&mut orch, &time);
        assert_eq!(orch.state().active_task_id, Some(b));
        assert_eq!(orch.state().mode, Mode::Work);
        assert!(orch
            .drain_events()
            .iter()
            .any(|e| matches!(e, Event::BreakFinished { .. })));
    }

    #[test]
    fn skipping_work_records_zero_ratio_without_counting() {
        let (mut orch, time) = setup();
        let a = work(&mut orch, "A", 10);
        work(&mut orch, "B", 10);
        orch.start();
        time.advance_secs(120);
        let end = orch.skip().unwrap();

        assert_eq!(end.completion_ratio, 0.0);
        assert_eq!(orch.store().completed_work_count(), 0);
        let task = orch.store().get_task(a).unwrap();
        assert_eq!(task.completion, Some(CompletionSource::Skipped));
        let last = orch.history().entries().last().unwrap();
        assert_eq!(last.outcome, SessionOutcome::Skipped);
        assert_eq!(last.elapsed_secs, 120);
        // the queue moved on to the auto break
        assert_eq!(orch.state().mode, Mode::ShortBreak);
    }

    #[test]
    fn skipping_a_break_goes_straight_to_work() {
        let (mut orch, _) = setup();
        orch.add_task("Stretch", 5, TaskKind::SHORT_BREAK, TaskMetadata::default());
        let nap = orch
            .add_task("Nap", 15, TaskKind::LONG_BREAK, TaskMetadata::default())
            .unwrap();
        let w = work(&mut orch, "Essay", 30);

        orch.start();
        assert_eq!(orch.state().mode, Mode::ShortBreak);
        orch.skip();
        let state = orch.state();
        assert_eq!(state.mode, Mode::Work);
        assert_eq!(state.active_task_id, Some(w));

        // the queued break behind it is passed over, not deferred
        let nap = orch.store().get_task(nap).unwrap();
        assert_eq!(nap.completion, Some(CompletionSource::Skipped));
        assert_eq!(orch.store().next_pending_task().map(|t| t.id), Some(w));
    }

    #[test]
    fn skip_while_idle_is_a_noop() {
        let (mut orch, _) = setup();
        assert!(orch.skip().is_none());
        assert!(orch.history().is_empty());
    }

    #[test]
    fn paused_time_is_excluded_from_ratio() {
        let (mut orch, time) = setup();
        work(&mut orch, "A", 1);
        orch.start();
        for _ in 0..30 {
            time.advance_secs(1);
            orch.tick();
        }
        orch.pause();
        time.advance_secs(600);
        orch.start();
        let end = run_out(&mut orch, &time);
        assert_eq!(end.elapsed_secs, 60);
        assert!((end.completion_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn deleting_the_active_task_falls_back_to_ambient() {
        let (mut orch, _) = setup();
        let id = work(&mut orch, "A", 40);
        orch.start();
        orch.pause();
        orch.delete_task(id);
        // paused countdown is kept, only the binding is dropped
        assert_eq!(orch.state().active_task_id, None);
        assert_eq!(orch.state().remaining_secs, 2400);

        orch.switch_mode(Mode::Work);
        assert_eq!(orch.state().remaining_secs, 25 * 60);
    }

    #[test]
    fn deleting_the_bound_task_while_idle_restores_ambient_duration() {
        let (mut orch, _) = setup();
        let id = work(&mut orch, "A", 40);
        work(&mut orch, "B", 40);
        orch.start();
        orch.switch_mode(Mode::Work);
        assert_eq!(orch.state().active_task_id, Some(id));
        assert_eq!(orch.state().remaining_secs, 2400);

        orch.delete_task(id);
        assert_eq!(orch.state().active_task_id, None);
        assert_eq!(orch.state().remaining_secs, 25 * 60);
    }

    #[test]
    fn switch_mode_keeps_matching_task_only() {
        let (mut orch, _) = setup();
        let id = work(&mut orch, "A", 40);
        orch.start();
        orch.switch_mode(Mode::Work);
        assert_eq!(orch.state().active_task_id, Some(id));
        assert_eq!(orch.state().remaining_secs, 2400);
        assert_eq!(orch.state().state, ClockState::Idle);

        orch.switch_mode(Mode::LongBreak);
        assert_eq!(orch.state().active_task_id, None);
        assert_eq!(orch.state().remaining_secs, 15 * 60);
        assert_eq!(orch.store().current(), None);
    }

    #[test]
    fn set_durations_clamps_and_reapplies_when_idle() {
        let (mut orch, _) = setup();
        let applied = orch.set_durations(ModeDurations {
            work: 500,
            short_break: 0,
            long_break: 20,
        });
        assert_eq!(applied.work, 90);
        assert_eq!(applied.short_break, 1);
        assert_eq!(orch.state().remaining_secs, 90 * 60);

        orch.start();
        orch.set_durations(ModeDurations::default());
        assert_eq!(orch.state().remaining_secs, 90 * 60);
    }

    #[test]
    fn failed_signal_publishes_fallback_message() {
        let (orch, time) = setup();
        let mut orch = orch.with_notifier(Box::new(BrokenSpeaker));
        orch.set_durations(ModeDurations {
            work: 1,
            short_break: 1,
            long_break: 1,
        });
        orch.start();
        run_out(&mut orch, &time);
        let events = orch.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::NotificationFallback { message, .. } if message == TIME_UP_MESSAGE
        )));
    }

    #[test]
    fn auto_advance_starts_the_next_session() {
        let (orch, time) = setup();
        let mut orch = orch.with_auto_advance(true);
        work(&mut orch, "A", 1);
        work(&mut orch, "B", 1);
        orch.start();
        run_out(&mut orch, &time);
        assert_eq!(orch.state().state, ClockState::Running);
        assert_eq!(orch.state().mode, Mode::ShortBreak);
    }

    #[test]
    fn manual_completion_of_bound_task_detaches_it() {
        let (mut orch, _) = setup();
        let id = work(&mut orch, "A", 40);
        orch.start();
        orch.pause();
        assert!(orch.complete_task(id));
        assert_eq!(orch.state().active_task_id, None);
        assert_eq!(orch.store().completed_work_count(), 1);
        assert!(orch.uncomplete_task(id));
        assert_eq!(orch.store().completed_work_count(), 0);
    }

    #[test]
    fn manual_completion_mid_session_counts_once() {
        let (mut orch, time) = setup();
        let a = work(&mut orch, "A", 1);
        orch.start();
        let completed_at = time.now();
        assert!(orch.complete_task(a));
        assert_eq!(orch.store().completed_work_count(), 1);

        let end = run_out(&mut orch, &time);
        assert_eq!(end.task_id, Some(a));
        assert_eq!(orch.store().completed_work_count(), 1);
        let task = orch.store().get_task(a).unwrap();
        assert_eq!(task.completion, Some(CompletionSource::Manual));
        assert_eq!(task.completed_at, Some(completed_at));
        let last = orch.history().entries().last().unwrap();
        assert_eq!(last.task.as_ref().map(|t| t.task_id), Some(a));
    }

    #[test]
    fn restored_running_session_ignores_time_in_storage() {
        let (orch, time) = setup();
        let mut orch = orch.with_auto_advance(true);
        orch.set_durations(ModeDurations {
            work: 1,
            short_break: 1,
            long_break: 1,
        });
        orch.start();
        run_out(&mut orch, &time);
        assert_eq!(orch.state().state, ClockState::Running);

        let mut persistence = Persistence::new(MemoryStore::new());
        persistence.save_session(&orch).unwrap();
        time.advance_secs(3600);

        let limits = DurationLimits::default();
        let durations = persistence.load_durations();
        let store = TaskStore::from_list(persistence.load_tasks(), durations, limits.task);
        let mut restored = SessionOrchestrator::new(store, durations, limits)
            .with_time_source(time.clone())
            .with_clock(persistence.load_clock().unwrap());
        assert_eq!(restored.state().state, ClockState::Paused);
        assert_eq!(restored.state().mode, Mode::ShortBreak);

        assert!(restored.start());
        let end = run_out(&mut restored, &time);
        assert_eq!(end.mode, Mode::ShortBreak);
        assert_eq!(end.elapsed_secs, 60);
        let last = restored.history().entries().last().unwrap();
        assert_eq!(last.outcome, SessionOutcome::Completed);
    }

    #[test]
    fn task_changes_are_published() {
        let (mut orch, _) = setup();
        work(&mut orch, "A", 10);
        assert!(!orch.highlight(Some(999)));
        let events = orch.drain_events();
        assert!(matches!(
            events.last(),
            Some(Event::TasksChanged {
                pending: 1,
                total: 1,
                ..
            })
        ));
    }
}
