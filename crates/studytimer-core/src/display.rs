//! Display synchronization.
//!
//! The [`DisplayAdapter`] turns engine snapshots into a [`ViewModel`]. It
//! remembers the previously rendered digits so that every group whose
//! value changed gets a short bounce highlight. Highlights accumulate until
//! one clear timer, restarted on every render, fires 900 ms after the most
//! recent render.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::{DigitGroup, DigitGroups};
use crate::scheduler::{Repeat, Scheduler, TimerHandle};
use crate::status::StatusLine;
use crate::timer::TimerSnapshot;

pub const BOUNCE_DURATION: Duration = Duration::from_millis(900);

/// Everything a presentation layer needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub digits: DigitGroups,
    /// Full time for assistive technology, e.g. `00:24:59`.
    pub aria_label: String,
    /// Bounce flags indexed by [`DigitGroup::index`].
    pub bounce: [bool; 3],
    /// `None` when no duration has been set; keep the previous fill.
    pub progress_pct: Option<f64>,
    pub status: StatusLine,
}

impl ViewModel {
    pub fn is_bouncing(&self, group: DigitGroup) -> bool {
        self.bounce[group.index()]
    }
}

/// Presentation sink.
pub trait Renderer {
    fn render(&mut self, view: &ViewModel);
}

/// Percentage of the original duration already elapsed.
pub fn progress_pct(original_secs: u64, remaining_secs: u64) -> Option<f64> {
    if original_secs == 0 {
        return None;
    }
    let elapsed = original_secs.saturating_sub(remaining_secs);
    Some(elapsed as f64 / original_secs as f64 * 100.0)
}

#[derive(Debug, Default)]
pub struct DisplayAdapter {
    previous: Option<DigitGroups>,
    current: Option<DigitGroups>,
    bounce: [bool; 3],
    clear: Option<TimerHandle>,
    last_view: Option<ViewModel>,
}

impl DisplayAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_handle(&self) -> Option<TimerHandle> {
        self.clear
    }

    pub fn last_view(&self) -> Option<&ViewModel> {
        self.last_view.as_ref()
    }

    pub fn render(
        &mut self,
        snapshot: &TimerSnapshot,
        status: &StatusLine,
        sched: &mut dyn Scheduler,
    ) -> ViewModel {
        let digits = DigitGroups::from_secs(snapshot.remaining_secs);
        self.previous = self.current.replace(digits.clone());

        if let Some(previous) = &self.previous {
            for group in DigitGroup::ALL {
                if previous.get(group) != digits.get(group) {
                    self.bounce[group.index()] = true;
                }
            }
        }

        if let Some(handle) = self.clear.take() {
            sched.cancel(handle);
        }
        self.clear = Some(sched.schedule(BOUNCE_DURATION, Repeat::Once));

        let view = ViewModel {
            aria_label: digits.label(),
            digits,
            bounce: self.bounce,
            progress_pct: progress_pct(snapshot.original_secs, snapshot.remaining_secs),
            status: status.clone(),
        };
        self.last_view = Some(view.clone());
        view
    }

    /// Handle the bounce clear timer. Returns the refreshed view, or
    /// `None` for a stale handle.
    pub fn clear(&mut self, handle: TimerHandle) -> Option<ViewModel> {
        if self.clear != Some(handle) {
            return None;
        }
        self.clear = None;
        self.bounce = [false; 3];

        let view = self.last_view.as_mut()?;
        view.bounce = self.bounce;
        Some(view.clone())
    }

    /// Re-emit the last view with a new status line, keeping digits and
    /// highlights untouched.
    pub fn restatus(&mut self, status: &StatusLine) -> Option<ViewModel> {
        let view = self.last_view.as_mut()?;
        view.status = status.clone();
        Some(view.clone())
    }
}
