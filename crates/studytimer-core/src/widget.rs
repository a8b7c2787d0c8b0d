//! The study timer widget.
//!
//! [`StudyTimer`] is the application shell: it owns the engine, the display
//! adapter, the scheduler and the injected platform capabilities, and
//! exposes the handful of user actions the page offers (start, pause,
//! reset, presets). Hosts feed scheduler fires back in through
//! [`StudyTimer::fire`].

use std::time::Duration;

use tracing::{debug, trace};

use crate::display::{DisplayAdapter, Renderer, ViewModel};
use crate::effects::{
    play_best_effort, CompletionNotifier, Notification, Notifier, Permission, Tone, ToneEmitter,
};
use crate::events::Event;
use crate::format::DurationInput;
use crate::scheduler::{ManualScheduler, Scheduler, TimerHandle};
use crate::status::StatusLine;
use crate::storage::Preset;
use crate::timer::{TimerEngine, TimerSnapshot, TimerStatus};

pub struct StudyTimer<S: Scheduler> {
    engine: TimerEngine,
    display: DisplayAdapter,
    scheduler: S,
    renderer: Box<dyn Renderer>,
    tone: Box<dyn ToneEmitter>,
    notifier: CompletionNotifier,
    status: StatusLine,
}

impl<S: Scheduler> StudyTimer<S> {
    /// Build the widget, draw the empty clock and ask for notification
    /// permission if it was never asked.
    pub fn new(
        scheduler: S,
        renderer: Box<dyn Renderer>,
        tone: Box<dyn ToneEmitter>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let mut timer = Self {
            engine: TimerEngine::new(),
            display: DisplayAdapter::new(),
            scheduler,
            renderer,
            tone,
            notifier: CompletionNotifier::new(notifier),
            status: StatusLine::ready(),
        };
        timer.redraw();
        timer.notifier.prime();
        timer
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn view(&self) -> Option<&ViewModel> {
        self.display.last_view()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notification_permission(&self) -> Permission {
        self.notifier.permission()
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// The start button: resume a paused countdown, otherwise configure
    /// from the input fields and start.
    pub fn start_from_input(&mut self, input: DurationInput) -> Vec<Event> {
        if self.engine.status() == TimerStatus::Paused {
            return self.start().into_iter().collect();
        }
        let mut events = vec![self.configure(input)];
        events.extend(self.start());
        events
    }

    /// Configure from a preset without starting.
    pub fn apply_preset(&mut self, preset: &Preset) -> Event {
        debug!(preset = %preset.label, "preset selected");
        self.configure(preset.input())
    }

    pub fn configure(&mut self, input: DurationInput) -> Event {
        let event = self.engine.configure(
            input.hours,
            input.minutes,
            input.seconds,
            &mut self.scheduler,
        );
        self.apply(&event);
        event
    }

    /// `None` when the countdown is already running.
    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start(&mut self.scheduler)?;
        self.apply(&event);
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause(&mut self.scheduler)?;
        self.apply(&event);
        Some(event)
    }

    pub fn reset(&mut self) -> Event {
        let event = self.engine.reset(&mut self.scheduler);
        self.apply(&event);
        event
    }

    /// Route one scheduler fire to its owner. Stale handles are dropped.
    pub fn fire(&mut self, handle: TimerHandle) -> Option<Event> {
        if self.engine.tick_handle() == Some(handle) {
            let event = self.engine.tick(handle, &mut self.scheduler)?;
            self.apply(&event);
            return Some(event);
        }
        if self.display.clear_handle() == Some(handle) {
            if let Some(view) = self.display.clear(handle) {
                self.renderer.render(&view);
            }
            return None;
        }
        trace!(handle = handle.id(), "stale timer fire ignored");
        None
    }

    /// Draw the last view again without diffing, e.g. after other output
    /// scrolled it away.
    pub fn refresh(&mut self) {
        if let Some(view) = self.display.last_view() {
            self.renderer.render(view);
        }
    }

    /// Deliver the answer to a permission prompt that was still open.
    pub fn permission_resolved(&mut self, permission: Permission) {
        self.notifier.permission_resolved(permission);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, event: &Event) {
        if let Some(line) = StatusLine::for_event(event, &self.status) {
            self.status = line;
        }

        match event {
            Event::Configured { .. } | Event::Reset { .. } | Event::Ticked { .. } => self.redraw(),
            Event::Started { .. } | Event::Paused { .. } | Event::StartRejected { .. } => {
                if let Some(view) = self.display.restatus(&self.status) {
                    self.renderer.render(&view);
                }
            }
            Event::Completed { .. } => {
                self.redraw();
                play_best_effort(self.tone.as_mut(), &Tone::chime());
                self.notifier.notify(Notification::session_complete());
            }
        }
    }

    fn redraw(&mut self) {
        let view = self
            .display
            .render(&self.engine.snapshot(), &self.status, &mut self.scheduler);
        self.renderer.render(&view);
    }
}

impl StudyTimer<ManualScheduler> {
    /// Let `by` of virtual time pass, handling every fire in order.
    pub fn advance(&mut self, by: Duration) -> Vec<Event> {
        let until = self.scheduler.now() + by;
        let mut events = Vec::new();
        while let Some(handle) = self.scheduler.fire_next(until) {
            events.extend(self.fire(handle));
        }
        self.scheduler.settle(until);
        events
    }
}
