//! Drift-corrected countdown.
//!
//! The countdown never accumulates per-tick decrements. Every poll
//! recomputes `remaining = duration - elapsed` from a monotonic instant, so
//! a late or skipped poll cannot make the timer drift.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running (start | resume) -> (Paused | Stopped)
//! Running -> Stopped  (remaining reached zero, Completed emitted once)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let (mut timer, mut signals) = CountdownTimer::new(DEFAULT_POLL_INTERVAL);
//! timer.start(Duration::from_secs(25 * 60));
//! while let Some(signal) = signals.recv().await {
//!     if !timer.is_current(&signal) { continue; }
//!     // Tick { elapsed, remaining } ... Completed
//! }
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// How often a running countdown re-reads the monotonic clock.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Progress notifications produced by a running countdown.
///
/// `run` identifies the start/resume that produced the signal. Signals
/// already queued when the timer is paused, stopped or re-armed carry a
/// stale run and must be discarded by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Tick {
        run: u64,
        elapsed: Duration,
        remaining: Duration,
    },
    Completed {
        run: u64,
    },
}

impl TimerSignal {
    pub fn run(&self) -> u64 {
        match self {
            TimerSignal::Tick { run, .. } | TimerSignal::Completed { run } => *run,
        }
    }
}

/// Countdown timer driven by a spawned tokio task.
///
/// Arming the timer (`start`/`resume`) must happen inside a tokio runtime.
#[derive(Debug)]
pub struct CountdownTimer {
    poll_interval: Duration,
    signals: mpsc::UnboundedSender<TimerSignal>,
    /// Length of the current run (the full duration, or the remainder on resume).
    duration: Duration,
    started: Option<Instant>,
    /// Frozen value while not running.
    remaining: Duration,
    run: u64,
    ticker: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Create a stopped timer and the receiving end of its signal channel.
    pub fn new(poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<TimerSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            poll_interval: poll_interval.max(Duration::from_millis(1)),
            signals: tx,
            duration: Duration::ZERO,
            started: None,
            remaining: Duration::ZERO,
            run: 0,
            ticker: None,
        };
        (timer, rx)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn remaining(&self) -> Duration {
        match self.started {
            Some(started) => self.duration.saturating_sub(started.elapsed()),
            None => self.remaining,
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run
    }

    /// Whether `signal` belongs to the run currently counting down.
    pub fn is_current(&self, signal: &TimerSignal) -> bool {
        self.is_running() && signal.run() == self.run
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, duration: Duration) {
        self.arm(duration);
    }

    /// Count down from an explicit remainder, typically after a pause.
    pub fn resume(&mut self, remaining: Duration) {
        self.arm(remaining);
    }

    /// Stop ticking and freeze `remaining` at the elapsed-corrected value.
    pub fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.remaining = self.duration.saturating_sub(started.elapsed());
        }
        self.disarm();
    }

    /// Halt and reset `remaining` to zero.
    pub fn stop(&mut self) {
        self.started = None;
        self.remaining = Duration::ZERO;
        self.disarm();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm(&mut self, duration: Duration) {
        self.disarm();
        let started = Instant::now();
        self.duration = duration;
        self.remaining = duration;
        self.started = Some(started);
        self.ticker = Some(tokio::spawn(run_ticker(
            self.run,
            duration,
            started,
            self.poll_interval,
            self.signals.clone(),
        )));
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
        self.run = self.run.wrapping_add(1);
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

async fn run_ticker(
    run: u64,
    duration: Duration,
    started: Instant,
    poll_interval: Duration,
    signals: mpsc::UnboundedSender<TimerSignal>,
) {
    let mut interval = time::interval_at(started + poll_interval, poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let elapsed = started.elapsed();
        match duration.checked_sub(elapsed) {
            Some(remaining) if !remaining.is_zero() => {
                let tick = TimerSignal::Tick {
                    run,
                    elapsed,
                    remaining,
                };
                if signals.send(tick).is_err() {
                    return;
                }
            }
            _ => {
                let _ = signals.send(TimerSignal::Completed { run });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerSignal>) -> Vec<TimerSignal> {
        let mut out = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            out.push(signal);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_then_completes_once() {
        let (mut timer, mut rx) = CountdownTimer::new(Duration::from_millis(250));
        timer.start(Duration::from_secs(1));
        assert!(timer.is_running());

        let mut ticks = Vec::new();
        loop {
            match rx.recv().await.unwrap() {
                TimerSignal::Tick { remaining, run, .. } => {
                    assert_eq!(run, timer.run_id());
                    ticks.push(remaining);
                }
                TimerSignal::Completed { run } => {
                    assert_eq!(run, timer.run_id());
                    break;
                }
            }
        }

        assert_eq!(
            ticks,
            vec![
                Duration::from_millis(750),
                Duration::from_millis(500),
                Duration::from_millis(250)
            ]
        );

        time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_remaining_and_silences_ticks() {
        let (mut timer, mut rx) = CountdownTimer::new(DEFAULT_POLL_INTERVAL);
        timer.start(Duration::from_secs(10));
        time::sleep(Duration::from_secs(3)).await;

        timer.pause();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Duration::from_secs(7));

        let stale = drain(&mut rx);
        assert!(stale.iter().all(|s| !timer.is_current(s)));

        time::sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(timer.remaining(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn resume_counts_down_from_remainder() {
        let (mut timer, mut rx) = CountdownTimer::new(DEFAULT_POLL_INTERVAL);
        timer.start(Duration::from_secs(4));
        time::sleep(Duration::from_secs(1)).await;
        timer.pause();
        drain(&mut rx);

        let before = Instant::now();
        timer.resume(Duration::from_secs(3));
        let run = timer.run_id();
        loop {
            let signal = rx.recv().await.unwrap();
            assert_eq!(signal.run(), run);
            if let TimerSignal::Completed { .. } = signal {
                break;
            }
        }
        assert_eq!(before.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_resets_remaining() {
        let (mut timer, _rx) = CountdownTimer::new(DEFAULT_POLL_INTERVAL);
        timer.start(Duration::from_secs(60));
        time::sleep(Duration::from_secs(1)).await;
        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_invalidates_previous_run() {
        let (mut timer, mut rx) = CountdownTimer::new(DEFAULT_POLL_INTERVAL);
        timer.start(Duration::from_secs(60));
        time::sleep(Duration::from_millis(600)).await;
        let first_run_signals = drain(&mut rx);
        timer.start(Duration::from_secs(60));

        assert!(!first_run_signals.is_empty());
        assert!(first_run_signals.iter().all(|s| !timer.is_current(s)));
        assert_eq!(timer.remaining(), Duration::from_secs(60));
    }
}
