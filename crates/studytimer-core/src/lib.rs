//! # Study Timer Core Library
//!
//! This library provides the core logic for the Study Timer countdown widget.
//! Hosts (the terminal CLI, or any other front end) supply a scheduler, a
//! renderer and the platform effects; everything else lives here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A whole-second countdown state machine driven by
//!   scheduler fires
//! - **Display Adapter**: Diffs successive digit groups into a view model with
//!   bounce highlights and progress
//! - **Effects**: Completion chime and permission-gated notification
//! - **Storage**: TOML-based configuration (presets, sound, notifications)
//!
//! ## Key Components
//!
//! - [`StudyTimer`]: Application shell wiring the pieces together
//! - [`TimerEngine`]: Core timer state machine
//! - [`DisplayAdapter`]: View model production
//! - [`Scheduler`]: Timer scheduling seam, with [`ManualScheduler`] for tests
//! - [`Config`]: Application configuration management

pub mod display;
pub mod effects;
pub mod error;
pub mod events;
pub mod format;
pub mod scheduler;
pub mod status;
pub mod storage;
pub mod timer;
pub mod widget;

pub use display::{DisplayAdapter, Renderer, ViewModel};
pub use effects::{Notification, Notifier, Permission, Tone, ToneEmitter};
pub use error::{ConfigError, CoreError, EffectError};
pub use events::Event;
pub use format::{format_duration, DigitGroup, DigitGroups, DurationInput};
pub use scheduler::{ManualScheduler, Repeat, Scheduler, TimerHandle};
pub use status::{StatusLine, StatusTone};
pub use storage::{Config, Preset};
pub use timer::{TimerEngine, TimerSnapshot, TimerStatus};
pub use widget::StudyTimer;
