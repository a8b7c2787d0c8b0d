//! Timer scheduling abstraction.
//!
//! The engine and the display never sleep or spawn anything themselves.
//! They ask a [`Scheduler`] for a [`TimerHandle`] and the host delivers
//! each fire back to the widget, which routes it by handle.
//!
//! Handles are never reused. A fire that arrives after its handle was
//! cancelled no longer matches the owner's live handle and is dropped,
//! which makes cancellation take effect immediately.

use std::time::Duration;

/// Identifies one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Every,
}

pub trait Scheduler {
    /// Arrange for `handle` to fire after `period`, and every `period`
    /// thereafter when `repeat` is [`Repeat::Every`].
    fn schedule(&mut self, period: Duration, repeat: Repeat) -> TimerHandle;

    /// Stop a timer. Unknown or already finished handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    due: Duration,
    period: Option<Duration>,
}

/// Virtual-clock scheduler for tests and simulations.
///
/// Nothing fires on its own; the owner pulls due timers one at a time with
/// [`ManualScheduler::fire_next`] so that a handler may cancel timers
/// before the next one is released.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.pending.len()
    }

    /// Release the earliest timer due at or before `until`, moving the
    /// clock to its due time. Ties fire in creation order.
    pub fn fire_next(&mut self, until: Duration) -> Option<TimerHandle> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.handle))
            .map(|(i, _)| i)?;

        let Pending {
            handle,
            due,
            period,
        } = self.pending[idx].clone();
        self.now = self.now.max(due);
        match period {
            Some(period) => self.pending[idx].due = due + period,
            None => {
                self.pending.remove(idx);
            }
        }
        Some(handle)
    }

    /// Move the clock forward to `until` once nothing more is due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration, repeat: Repeat) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push(Pending {
            handle,
            due: self.now + period,
            period: match repeat {
                Repeat::Every => Some(period),
                Repeat::Once => None,
            },
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|p| p.handle != handle);
    }
}
