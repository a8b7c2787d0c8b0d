//! User-facing status lines derived from engine events.

use serde::{Deserialize, Serialize};

use crate::events::Event;

pub const READY_MESSAGE: &str = "Timer Ready - Set your study time!";
pub const SET_TIME_FIRST_MESSAGE: &str = "Please set the time first!";
pub const RUNNING_MESSAGE: &str = "📚 Study Time is Running! Stay Focused!";
pub const PAUSED_MESSAGE: &str = "⏸️ Timer Paused - Press Start to Continue";
pub const RESET_MESSAGE: &str = "Timer reset - Ready to start!";
pub const COMPLETE_MESSAGE: &str = "🎉 Congratulations! Study Session Complete! 🎉";

/// Visual flavour of the status area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Idle,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLine {
    pub message: String,
    pub tone: StatusTone,
}

impl StatusLine {
    pub fn new(message: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }

    pub fn ready() -> Self {
        Self::new(READY_MESSAGE, StatusTone::Idle)
    }

    /// Status line for an event, or `None` when the event leaves the
    /// current line in place (ticks, and the rejected start which keeps
    /// the previous tone).
    pub fn for_event(event: &Event, current: &StatusLine) -> Option<Self> {
        let line = match event {
            Event::Configured { formatted, .. } => Self::new(
                format!("Timer set for {formatted} - Ready to start!"),
                StatusTone::Idle,
            ),
            Event::StartRejected { .. } => Self::new(SET_TIME_FIRST_MESSAGE, current.tone),
            Event::Started { .. } => Self::new(RUNNING_MESSAGE, StatusTone::Running),
            Event::Paused { .. } => Self::new(PAUSED_MESSAGE, StatusTone::Paused),
            Event::Reset { total_secs, .. } if *total_secs > 0 => {
                Self::new(RESET_MESSAGE, StatusTone::Idle)
            }
            Event::Reset { .. } => Self::ready(),
            Event::Completed { .. } => Self::new(COMPLETE_MESSAGE, StatusTone::Finished),
            Event::Ticked { .. } => return None,
        };
        Some(line)
    }
}
