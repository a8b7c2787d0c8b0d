//! Countdown engine.
//!
//! The engine is a whole-second state machine. It does not sleep or spawn;
//! `start()` asks the injected [`Scheduler`] for a repeating one-second
//! handle and the host calls `tick(handle)` each time it fires.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Finished
//!   ^________ reset / configure ________|
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.configure(0, 25, 0, &mut sched);
//! engine.start(&mut sched);
//! // For every fire of the scheduler:
//! engine.tick(handle, &mut sched); // Some(Event::Completed { .. }) at zero
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;
use crate::format::{format_duration, DurationInput};
use crate::scheduler::{Repeat, Scheduler, TimerHandle};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Point-in-time copy of the engine state, consumed by the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub total_secs: u64,
    pub remaining_secs: u64,
    /// Duration the progress bar measures against.
    pub original_secs: u64,
}

#[derive(Debug)]
pub struct TimerEngine {
    total_secs: u64,
    remaining_secs: u64,
    original_secs: u64,
    status: TimerStatus,
    /// Live tick timer; `Some` only while Running.
    tick: Option<TimerHandle>,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Create an idle engine with no duration set.
    pub fn new() -> Self {
        Self {
            total_secs: 0,
            remaining_secs: 0,
            original_secs: 0,
            status: TimerStatus::Idle,
            tick: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn original_secs(&self) -> u64 {
        self.original_secs
    }

    pub fn tick_handle(&self) -> Option<TimerHandle> {
        self.tick
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            original_secs: self.original_secs,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn configure(
        &mut self,
        hours: u64,
        minutes: u64,
        seconds: u64,
        sched: &mut dyn Scheduler,
    ) -> Event {
        self.stop(sched);

        let total = DurationInput::new(hours, minutes, seconds).total_secs();
        self.total_secs = total;
        self.remaining_secs = total;
        self.original_secs = total;
        self.status = TimerStatus::Idle;
        debug!(total_secs = total, "timer configured");

        Event::Configured {
            total_secs: total,
            formatted: format_duration(total),
            at: Utc::now(),
        }
    }

    /// Returns `None` when already running.
    pub fn start(&mut self, sched: &mut dyn Scheduler) -> Option<Event> {
        if self.total_secs == 0 {
            debug!("start ignored: no duration set");
            return Some(Event::StartRejected { at: Utc::now() });
        }

        let resumed = match self.status {
            TimerStatus::Running => return None,
            TimerStatus::Paused => true,
            TimerStatus::Idle => false,
            TimerStatus::Finished => {
                self.remaining_secs = self.total_secs;
                false
            }
        };

        self.cancel_tick(sched);
        self.tick = Some(sched.schedule(TICK_INTERVAL, Repeat::Every));
        self.status = TimerStatus::Running;
        debug!(remaining_secs = self.remaining_secs, resumed, "timer started");

        Some(Event::Started {
            remaining_secs: self.remaining_secs,
            resumed,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self, sched: &mut dyn Scheduler) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.cancel_tick(sched);
        self.status = TimerStatus::Paused;
        debug!(remaining_secs = self.remaining_secs, "timer paused");

        Some(Event::Paused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self, sched: &mut dyn Scheduler) -> Event {
        self.cancel_tick(sched);
        self.remaining_secs = self.total_secs;
        self.status = TimerStatus::Idle;
        debug!(total_secs = self.total_secs, "timer reset");

        Event::Reset {
            total_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    /// Halt ticking without touching the remaining time.
    pub fn stop(&mut self, sched: &mut dyn Scheduler) {
        self.cancel_tick(sched);
        if matches!(self.status, TimerStatus::Running | TimerStatus::Paused) {
            self.status = TimerStatus::Idle;
        }
    }

    /// Handle one fire of the tick timer.
    ///
    /// Fires from a handle other than the live one are stale and ignored.
    pub fn tick(&mut self, handle: TimerHandle, sched: &mut dyn Scheduler) -> Option<Event> {
        if self.status != TimerStatus::Running || self.tick != Some(handle) {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete(sched));
        }
        Some(Event::Ticked {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    fn complete(&mut self, sched: &mut dyn Scheduler) -> Event {
        self.stop(sched);
        self.status = TimerStatus::Finished;
        info!(total_secs = self.total_secs, "study session complete");

        Event::Completed {
            total_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cancel_tick(&mut self, sched: &mut dyn Scheduler) {
        if let Some(handle) = self.tick.take() {
            sched.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;

    fn running(h: u64, m: u64, s: u64) -> (TimerEngine, ManualScheduler, TimerHandle) {
        let mut sched = ManualScheduler::new();
        let mut engine = TimerEngine::new();
        engine.configure(h, m, s, &mut sched);
        engine.start(&mut sched);
        let handle = engine.tick_handle().unwrap();
        (engine, sched, handle)
    }

    #[test]
    fn new_engine_is_idle_and_empty() {
        let engine = TimerEngine::new();
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.total_secs(), 0);
        assert_eq!(engine.remaining_secs(), 0);
        assert!(engine.tick_handle().is_none());
    }

    #[test]
    fn configure_sets_all_durations() {
        let mut sched = ManualScheduler::new();
        let mut engine = TimerEngine::new();
        let event = engine.configure(1, 2, 3, &mut sched);

        assert_eq!(engine.total_secs(), 3723);
        assert_eq!(engine.remaining_secs(), 3723);
        assert_eq!(engine.original_secs(), 3723);
        match event {
            Event::Configured { formatted, .. } => assert_eq!(formatted, "1:02:03"),
            other => panic!("Expected Configured, got {other:?}"),
        }
    }

    #[test]
    fn start_with_zero_duration_is_rejected() {
        let mut sched = ManualScheduler::new();
        let mut engine = TimerEngine::new();

        let event = engine.start(&mut sched);
        assert!(matches!(event, Some(Event::StartRejected { .. })));
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(sched.active_count(), 0);
    }

    #[test]
    fn start_while_running_schedules_nothing() {
        let (mut engine, mut sched, handle) = running(0, 1, 0);
        assert!(engine.start(&mut sched).is_none());
        assert_eq!(sched.active_count(), 1);
        assert_eq!(engine.tick_handle(), Some(handle));
    }

    #[test]
    fn tick_counts_down() {
        let (mut engine, mut sched, handle) = running(0, 0, 10);
        for _ in 0..3 {
            engine.tick(handle, &mut sched);
        }
        assert_eq!(engine.remaining_secs(), 7);
        assert_eq!(engine.status(), TimerStatus::Running);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let (mut engine, mut sched, handle) = running(0, 0, 10);
        engine.pause(&mut sched);
        engine.start(&mut sched);

        assert!(engine.tick(handle, &mut sched).is_none());
        assert_eq!(engine.remaining_secs(), 10);
    }

    #[test]
    fn completes_exactly_once() {
        let (mut engine, mut sched, handle) = running(0, 0, 2);
        assert!(matches!(
            engine.tick(handle, &mut sched),
            Some(Event::Ticked { remaining_secs: 1, .. })
        ));
        assert!(matches!(
            engine.tick(handle, &mut sched),
            Some(Event::Completed { total_secs: 2, .. })
        ));
        assert_eq!(engine.status(), TimerStatus::Finished);
        assert_eq!(engine.remaining_secs(), 0);
        assert_eq!(sched.active_count(), 0);
        assert!(engine.tick(handle, &mut sched).is_none());
    }

    #[test]
    fn pause_then_start_resumes() {
        let (mut engine, mut sched, handle) = running(0, 0, 30);
        for _ in 0..12 {
            engine.tick(handle, &mut sched);
        }
        assert!(engine.pause(&mut sched).is_some());
        assert_eq!(engine.status(), TimerStatus::Paused);
        assert_eq!(sched.active_count(), 0);

        match engine.start(&mut sched) {
            Some(Event::Started {
                remaining_secs,
                resumed,
                ..
            }) => {
                assert_eq!(remaining_secs, 18);
                assert!(resumed);
            }
            other => panic!("Expected Started, got {other:?}"),
        }
    }

    #[test]
    fn pause_when_not_running_is_noop() {
        let mut sched = ManualScheduler::new();
        let mut engine = TimerEngine::new();
        engine.configure(0, 1, 0, &mut sched);
        assert!(engine.pause(&mut sched).is_none());
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn reset_restores_total() {
        let (mut engine, mut sched, handle) = running(0, 1, 0);
        for _ in 0..20 {
            engine.tick(handle, &mut sched);
        }
        engine.reset(&mut sched);
        assert_eq!(engine.remaining_secs(), 60);
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(sched.active_count(), 0);
    }

    #[test]
    fn configure_while_running_stops_countdown() {
        let (mut engine, mut sched, handle) = running(0, 1, 0);
        engine.tick(handle, &mut sched);
        engine.configure(0, 5, 0, &mut sched);

        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.remaining_secs(), 300);
        assert_eq!(sched.active_count(), 0);
    }

    #[test]
    fn stop_keeps_remaining() {
        let (mut engine, mut sched, handle) = running(0, 0, 10);
        engine.tick(handle, &mut sched);
        engine.stop(&mut sched);
        assert_eq!(engine.status(), TimerStatus::Idle);
        assert_eq!(engine.remaining_secs(), 9);
    }

    #[test]
    fn start_after_finish_rewinds() {
        let (mut engine, mut sched, handle) = running(0, 0, 1);
        engine.tick(handle, &mut sched);
        assert_eq!(engine.status(), TimerStatus::Finished);

        engine.start(&mut sched);
        assert_eq!(engine.status(), TimerStatus::Running);
        assert_eq!(engine.remaining_secs(), 1);
    }
}
