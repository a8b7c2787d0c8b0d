use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every transition of the timer engine produces an Event.
/// The shell turns events into status lines; hosts may also log them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Configured {
        total_secs: u64,
        /// Duration as shown to the user, e.g. `25:00`.
        formatted: String,
        at: DateTime<Utc>,
    },
    Started {
        remaining_secs: u64,
        /// True when continuing from a pause.
        resumed: bool,
        at: DateTime<Utc>,
    },
    /// Start was requested with no duration set.
    StartRejected {
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Reset {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Completed {
        total_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::Configured { at, .. }
            | Event::Started { at, .. }
            | Event::StartRejected { at }
            | Event::Paused { at, .. }
            | Event::Reset { at, .. }
            | Event::Ticked { at, .. }
            | Event::Completed { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::Paused {
            remaining_secs: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Paused");
        assert_eq!(json["remaining_secs"], 42);
    }
}
