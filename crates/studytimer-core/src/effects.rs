//! Completion effects: the chime and the system notification.
//!
//! Both are best-effort platform capabilities injected into the widget.
//! Their failures are logged and never reach the timer flow.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EffectError;

pub const NOTIFICATION_TITLE: &str = "Study Timer Complete!";
pub const NOTIFICATION_BODY: &str = "Congratulations! Your study session is complete!";
pub const NOTIFICATION_ICON: &str = "📚";

/// A sine tone with a linear attack and exponential release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    /// Gain reached at the end of the linear attack.
    pub peak_gain: f32,
    pub attack: Duration,
    /// Gain the exponential release decays to at `duration`.
    pub floor_gain: f32,
    pub duration: Duration,
}

impl Tone {
    /// The completion chime: 800 Hz sine, 0.1 s fade-in to 0.3, then an
    /// exponential fade to 0.01 by the one second mark.
    pub fn chime() -> Self {
        Self {
            frequency_hz: 800.0,
            peak_gain: 0.3,
            attack: Duration::from_millis(100),
            floor_gain: 0.01,
            duration: Duration::from_secs(1),
        }
    }

    /// Envelope gain at `t` seconds from the start of the tone.
    pub fn gain_at(&self, t: f32) -> f32 {
        let attack = self.attack.as_secs_f32();
        let end = self.duration.as_secs_f32();
        if t <= 0.0 || t >= end {
            return 0.0;
        }
        if t < attack {
            return self.peak_gain * t / attack;
        }
        let span = end - attack;
        if span <= 0.0 {
            return self.peak_gain;
        }
        let progress = (t - attack) / span;
        self.peak_gain * (self.floor_gain / self.peak_gain).powf(progress)
    }

    /// Mono PCM samples in `-1.0..=1.0`.
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let count = (self.duration.as_secs_f32() * sample_rate as f32) as usize;
        (0..count)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (t * self.frequency_hz * std::f32::consts::TAU).sin() * self.gain_at(t)
            })
            .collect()
    }
}

pub trait ToneEmitter {
    fn play(&mut self, tone: &Tone) -> Result<(), EffectError>;
}

/// Tone emitter for hosts without audio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentTone;

impl ToneEmitter for SilentTone {
    fn play(&mut self, _tone: &Tone) -> Result<(), EffectError> {
        Ok(())
    }
}

/// Play a tone, logging instead of propagating failures.
pub fn play_best_effort(emitter: &mut dyn ToneEmitter, tone: &Tone) {
    if let Err(e) = emitter.play(tone) {
        warn!("Audio notification not supported: {e}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Notification {
    pub fn session_complete() -> Self {
        Self {
            title: NOTIFICATION_TITLE.into(),
            body: NOTIFICATION_BODY.into(),
            icon: NOTIFICATION_ICON.into(),
        }
    }
}

/// Platform notification service.
pub trait Notifier {
    fn permission(&self) -> Permission;

    /// Ask the user for permission. `Some` when the answer is known right
    /// away, `None` when it will be delivered later through
    /// [`CompletionNotifier::permission_resolved`].
    fn request_permission(&mut self) -> Option<Permission>;

    fn fire(&mut self, notification: &Notification) -> Result<(), EffectError>;
}

/// Notifier for hosts without a notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNotifier;

impl Notifier for NoNotifier {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&mut self) -> Option<Permission> {
        Some(Permission::Denied)
    }

    fn fire(&mut self, _notification: &Notification) -> Result<(), EffectError> {
        Ok(())
    }
}

/// Gates notifications on permission.
///
/// When permission is undetermined the notification is parked while the
/// request is outstanding. A grant delivers it; anything else drops it.
pub struct CompletionNotifier {
    notifier: Box<dyn Notifier>,
    pending: Option<Notification>,
}

impl CompletionNotifier {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier,
            pending: None,
        }
    }

    pub fn permission(&self) -> Permission {
        self.notifier.permission()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Ask for permission ahead of time if it has never been asked.
    pub fn prime(&mut self) {
        if self.notifier.permission() == Permission::Default {
            let answer = self.notifier.request_permission();
            debug!(?answer, "notification permission requested");
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        match self.notifier.permission() {
            Permission::Granted => self.fire(&notification),
            Permission::Denied => debug!("notification skipped: permission denied"),
            Permission::Default => match self.notifier.request_permission() {
                Some(Permission::Granted) => self.fire(&notification),
                Some(_) => debug!("notification skipped: permission not granted"),
                None => self.pending = Some(notification),
            },
        }
    }

    /// Deliver the outcome of an outstanding permission request.
    pub fn permission_resolved(&mut self, permission: Permission) {
        let Some(notification) = self.pending.take() else {
            return;
        };
        if permission == Permission::Granted {
            self.fire(&notification);
        } else {
            debug!(?permission, "pending notification dropped");
        }
    }

    fn fire(&mut self, notification: &Notification) {
        if let Err(e) = self.notifier.fire(notification) {
            warn!("{e}");
        }
    }
}
