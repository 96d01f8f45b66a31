//! Session lifecycle orchestrator.
//!
//! The [`SessionManager`] owns the current [`Session`], the
//! [`PomodoroCycle`], today's [`DailyStatistics`] and the statistics
//! history, and drives a [`CountdownTimer`].
//!
//! ## State Transitions
//!
//! ```text
//! NotStarted -> Running                 start_focus | start_break | start_long_break
//! Running    -> Paused                  pause
//! Paused     -> Running                 resume
//! Running|Paused -> Running             restart (same type, duration, goal)
//! Running|Paused -> Cancelled           cancel
//! Running|Paused -> Completed           timer completion | skip
//! ```
//!
//! Invalid calls (pausing a paused session, resuming without a session, ...)
//! are ignored. Every transition persists a [`Snapshot`] from a detached
//! task and then publishes a [`SessionEvent::StateChanged`].
//!
//! All state sits behind one mutex. Lifecycle calls and the task draining
//! the timer's signals are the only writers, and the lock is never held
//! across an await. Lifecycle calls spawn tasks, so they must run inside a
//! tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::clock::Clock;
use crate::events::SessionEvent;
use crate::session::{PomodoroCycle, Session, SessionStatus, SessionType};
use crate::snapshot::Snapshot;
use crate::sound::CompletionSound;
use crate::stats::{merge_into_history, DailyStatistics, SessionRecord, SupplementalActivity};
use crate::storage::SnapshotStore;
use crate::timer::{CountdownTimer, TimerSignal, DEFAULT_POLL_INTERVAL};

pub struct SessionManager {
    state: Arc<Mutex<ManagerState>>,
    pump: JoinHandle<()>,
}

struct ManagerState {
    current: Option<Session>,
    cycle: PomodoroCycle,
    today: DailyStatistics,
    /// Past days only; today lives in `today`.
    history: Vec<DailyStatistics>,
    timer: CountdownTimer,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
    clock: Arc<dyn Clock>,
    store: Arc<dyn SnapshotStore>,
    sound: Arc<dyn CompletionSound>,
}

impl SessionManager {
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn SnapshotStore>,
        sound: Arc<dyn CompletionSound>,
    ) -> Self {
        Self::with_poll_interval(clock, store, sound, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        clock: Arc<dyn Clock>,
        store: Arc<dyn SnapshotStore>,
        sound: Arc<dyn CompletionSound>,
        poll_interval: Duration,
    ) -> Self {
        let (timer, signals) = CountdownTimer::new(poll_interval);
        let today = DailyStatistics::new(clock.today());
        let state = Arc::new(Mutex::new(ManagerState {
            current: None,
            cycle: PomodoroCycle::new(),
            today,
            history: Vec::new(),
            timer,
            subscribers: Vec::new(),
            clock,
            store,
            sound,
        }));
        let pump = tokio::spawn(pump_timer_signals(Arc::downgrade(&state), signals));
        Self { state, pump }
    }

    /// Register an observer. Events are delivered in publication order;
    /// dropping the receiver unregisters it.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_session(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    pub fn cycle(&self) -> PomodoroCycle {
        self.lock().cycle
    }

    pub fn today_statistics(&self) -> DailyStatistics {
        self.lock().today.clone()
    }

    /// Past days plus today (when it has activity), most recent first.
    pub fn statistics_history(&self) -> Vec<DailyStatistics> {
        let state = self.lock();
        let mut history = state.history.clone();
        merge_into_history(&mut history, &state.today);
        history
    }

    /// The projection that would be persisted right now.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a default-length focus session.
    pub fn start_focus(&self, goal: Option<String>) {
        self.lock().start(Session::focus(goal));
    }

    pub fn start_focus_for(&self, duration: Duration, goal: Option<String>) {
        self.lock().start(Session::focus_for(duration, goal));
    }

    /// Always a 5-minute short break; use [`start_long_break`] after a
    /// completed cycle.
    ///
    /// [`start_long_break`]: SessionManager::start_long_break
    pub fn start_break(&self) {
        self.lock().start(Session::short_break());
    }

    pub fn start_long_break(&self) {
        self.lock().start(Session::long_break());
    }

    pub fn pause(&self) {
        self.lock().pause();
    }

    pub fn resume(&self) {
        self.lock().resume();
    }

    pub fn cancel(&self) {
        self.lock().cancel();
    }

    /// Complete the current session now, with the same effects as the timer
    /// running out.
    pub fn skip(&self) {
        self.lock().skip();
    }

    pub fn restart(&self) {
        self.lock().restart();
    }

    /// Amend the most recent session record. Does nothing when no focus
    /// session has completed yet.
    pub fn record_session_results(&self, results: Option<String>, rating: Option<u8>) {
        self.lock().record_session_results(results, rating);
    }

    pub fn add_supplemental_activity(&self, description: impl Into<String>) {
        self.lock().add_supplemental_activity(description.into());
    }

    /// Load the persisted snapshot and adopt it.
    ///
    /// A missing, corrupt or unreadable snapshot leaves the manager as is.
    /// A paused session comes back paused (announced as NotStarted ->
    /// Paused); a session that was running when the snapshot was taken is
    /// dropped. Call before starting any session.
    pub async fn restore_state(&self) {
        let store = Arc::clone(&self.lock().store);
        match store.load().await {
            Ok(Some(snapshot)) => self.lock().apply_snapshot(snapshot),
            Ok(None) => debug!("no saved state to restore"),
            Err(e) => warn!(error = %e, "failed to load saved state, starting fresh"),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

async fn pump_timer_signals(
    state: Weak<Mutex<ManagerState>>,
    mut signals: mpsc::UnboundedReceiver<TimerSignal>,
) {
    while let Some(signal) = signals.recv().await {
        let Some(state) = state.upgrade() else {
            break;
        };
        let mut guard = state.lock().unwrap_or_else(|e| e.into_inner());
        guard.on_timer_signal(signal);
    }
}

impl ManagerState {
    fn start(&mut self, mut session: Session) {
        if self
            .current
            .as_ref()
            .is_some_and(|s| s.status() == SessionStatus::Running)
        {
            self.cancel();
        }

        session.set_status(SessionStatus::Running);
        session.set_started_at(Some(self.clock.now()));
        self.timer.start(session.duration());
        info!(
            session_type = session.session_type().label(),
            duration_secs = session.duration().as_secs(),
            "session started"
        );
        self.current = Some(session);

        self.persist();
        self.publish_state_change(SessionStatus::NotStarted, SessionStatus::Running);
    }

    fn pause(&mut self) {
        let Some(session) = self
            .current
            .as_mut()
            .filter(|s| s.status() == SessionStatus::Running)
        else {
            debug!("pause ignored: no running session");
            return;
        };

        self.timer.pause();
        session.set_time_remaining(self.timer.remaining());
        session.set_status(SessionStatus::Paused);

        self.persist();
        self.publish_state_change(SessionStatus::Running, SessionStatus::Paused);
    }

    fn resume(&mut self) {
        let Some(session) = self
            .current
            .as_mut()
            .filter(|s| s.status() == SessionStatus::Paused)
        else {
            debug!("resume ignored: no paused session");
            return;
        };

        self.timer.resume(session.time_remaining());
        session.set_status(SessionStatus::Running);

        self.persist();
        self.publish_state_change(SessionStatus::Paused, SessionStatus::Running);
    }

    fn cancel(&mut self) {
        let Some(session) = self.current.as_mut().filter(|s| s.status().is_active()) else {
            debug!("cancel ignored: no active session");
            return;
        };

        let previous = session.status();
        self.timer.stop();
        session.set_status(SessionStatus::Cancelled);
        info!(session_type = session.session_type().label(), "session cancelled");

        self.persist();
        self.publish_state_change(previous, SessionStatus::Cancelled);
    }

    fn skip(&mut self) {
        if !self.current.as_ref().is_some_and(|s| s.status().is_active()) {
            debug!("skip ignored: no active session");
            return;
        }
        self.timer.stop();
        self.complete();
    }

    fn restart(&mut self) {
        let Some(session) = self.current.as_mut().filter(|s| s.status().is_active()) else {
            debug!("restart ignored: no active session");
            return;
        };

        let previous = session.status();
        session.rearm();
        self.timer.start(session.duration());

        self.persist();
        self.publish_state_change(previous, SessionStatus::Running);
    }

    fn complete(&mut self) {
        self.roll_day();
        let now = self.clock.now();
        let Some(session) = self.current.as_mut() else {
            return;
        };

        let previous = session.status();
        session.set_status(SessionStatus::Completed);
        session.set_completed_at(Some(now));
        session.set_time_remaining(Duration::ZERO);

        let session_type = session.session_type();
        let duration = session.duration();
        match session_type {
            SessionType::Focus => {
                self.today.record_focus_session(duration);
                if self.cycle.increment_focus_count() {
                    self.today.record_cycle_completed();
                }
                self.today.add_session_record(SessionRecord::new(
                    session.goal().map(str::to_owned),
                    duration,
                    session.started_at().unwrap_or(now),
                    now,
                ));
            }
            SessionType::ShortBreak => self.today.record_break_session(duration),
            SessionType::LongBreak => {
                self.today.record_break_session(duration);
                self.cycle.reset();
            }
        }
        info!(
            session_type = session_type.label(),
            cycle = self.cycle.completed_focus_sessions(),
            "session completed"
        );

        self.play_completion_sound(session_type);
        self.persist();
        self.publish_state_change(previous, SessionStatus::Completed);
    }

    fn record_session_results(&mut self, results: Option<String>, rating: Option<u8>) {
        let Some(record) = self.today.last_session_record_mut() else {
            debug!("results ignored: no completed focus session today");
            return;
        };
        record.set_outcome(results, rating);
        self.persist();
    }

    fn add_supplemental_activity(&mut self, description: String) {
        let description = description.trim();
        if description.is_empty() {
            debug!("empty supplemental activity ignored");
            return;
        }
        self.roll_day();
        self.today
            .add_supplemental_activity(SupplementalActivity::new(description));
        self.persist();
    }

    fn on_timer_signal(&mut self, signal: TimerSignal) {
        if !self.timer.is_current(&signal) {
            trace!(run = signal.run(), "dropping stale timer signal");
            return;
        }

        match signal {
            TimerSignal::Tick {
                elapsed, remaining, ..
            } => {
                if let Some(session) = self.current.as_mut() {
                    session.set_time_remaining(remaining);
                }
                self.publish(SessionEvent::Tick { elapsed, remaining });
            }
            TimerSignal::Completed { .. } => {
                self.timer.stop();
                if self
                    .current
                    .as_ref()
                    .is_some_and(|s| s.status() == SessionStatus::Running)
                {
                    self.complete();
                }
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.cycle = snapshot.restore_cycle();
        self.history = snapshot.restore_history();

        let today = self.clock.today();
        match snapshot.restore_statistics() {
            Some(stats) if stats.date == today => self.today = stats,
            stale => {
                if let Some(stale) = stale {
                    info!(date = %stale.date, "saved statistics are from an earlier day, moving to history");
                    merge_into_history(&mut self.history, &stale);
                }
                if let Some(pos) = self.history.iter().position(|d| d.date == today) {
                    self.today = self.history.remove(pos);
                }
            }
        }
        self.history.retain(|d| d.date != today);

        match snapshot.restore_session() {
            Some(session) if session.status() == SessionStatus::Paused => {
                info!(
                    session_type = session.session_type().label(),
                    remaining_secs = session.time_remaining().as_secs(),
                    "restored paused session"
                );
                self.current = Some(session);
                self.publish_state_change(SessionStatus::NotStarted, SessionStatus::Paused);
            }
            Some(session) if session.status() == SessionStatus::Running => {
                info!("session was running at shutdown, not restoring it");
            }
            _ => {}
        }
    }

    /// File today's statistics under history once the date has moved on.
    fn roll_day(&mut self) {
        let today = self.clock.today();
        if self.today.date == today {
            return;
        }
        let finished = std::mem::replace(&mut self.today, DailyStatistics::new(today));
        info!(date = %finished.date, "day rolled over");
        merge_into_history(&mut self.history, &finished);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            self.current.as_ref(),
            &self.cycle,
            Some(&self.today),
            &self.history,
            self.clock.now(),
        )
    }

    /// Fire-and-forget: the write may finish after later writes.
    fn persist(&self) {
        let snapshot = self.snapshot();
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.save(&snapshot).await {
                warn!(error = %e, "failed to persist session snapshot");
            }
        });
    }

    fn play_completion_sound(&self, session_type: SessionType) {
        let sound = Arc::clone(&self.sound);
        tokio::spawn(async move {
            if let Err(e) = sound.play_completion(session_type).await {
                debug!(error = %e, "completion sound failed");
            }
        });
    }

    fn publish_state_change(&mut self, previous: SessionStatus, current: SessionStatus) {
        if let Some(session) = self.current.clone() {
            self.publish(SessionEvent::StateChanged {
                session,
                previous,
                current,
            });
        }
    }

    fn publish(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
