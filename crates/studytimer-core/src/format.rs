//! Time formatting and duration input parsing.

use serde::{Deserialize, Serialize};

const SECS_PER_HOUR: u64 = 3600;
const SECS_PER_MINUTE: u64 = 60;

/// Split a second count into `(hours, minutes, seconds)`.
pub fn split_hms(total_secs: u64) -> (u64, u64, u64) {
    (
        total_secs / SECS_PER_HOUR,
        (total_secs % SECS_PER_HOUR) / SECS_PER_MINUTE,
        total_secs % SECS_PER_MINUTE,
    )
}

/// Human readable duration used in status messages.
///
/// `H:MM:SS` when there is at least one hour, otherwise `M:SS` with
/// unpadded minutes.
pub fn format_duration(total_secs: u64) -> String {
    let (h, m, s) = split_hms(total_secs);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// The three digit groups shown on the clock face.
///
/// Every group is zero padded to two characters; hours past 99 simply
/// grow wider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitGroups {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl DigitGroups {
    pub fn from_secs(total_secs: u64) -> Self {
        let (h, m, s) = split_hms(total_secs);
        Self {
            hours: format!("{h:02}"),
            minutes: format!("{m:02}"),
            seconds: format!("{s:02}"),
        }
    }

    pub fn get(&self, group: DigitGroup) -> &str {
        match group {
            DigitGroup::Hours => &self.hours,
            DigitGroup::Minutes => &self.minutes,
            DigitGroup::Seconds => &self.seconds,
        }
    }

    /// Accessible label, e.g. `00:25:00`.
    pub fn label(&self) -> String {
        format!("{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

/// One of the hour/minute/second fields of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGroup {
    Hours,
    Minutes,
    Seconds,
}

impl DigitGroup {
    pub const ALL: [DigitGroup; 3] = [DigitGroup::Hours, DigitGroup::Minutes, DigitGroup::Seconds];

    pub fn index(self) -> usize {
        match self {
            DigitGroup::Hours => 0,
            DigitGroup::Minutes => 1,
            DigitGroup::Seconds => 2,
        }
    }
}

/// Hours, minutes and seconds as typed into the input fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationInput {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationInput {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Read three raw text fields. Unparseable fields count as zero.
    pub fn parse(hours: &str, minutes: &str, seconds: &str) -> Self {
        Self::new(
            parse_field(hours),
            parse_field(minutes),
            parse_field(seconds),
        )
    }

    pub fn total_secs(&self) -> u64 {
        self.hours
            .saturating_mul(SECS_PER_HOUR)
            .saturating_add(self.minutes.saturating_mul(SECS_PER_MINUTE))
            .saturating_add(self.seconds)
    }
}

/// Lenient integer field: leading digits after optional whitespace,
/// zero for anything else (including negative numbers).
pub fn parse_field(raw: &str) -> u64 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}
