//! Time conversion and segment editing primitives
//!
//! All durations are carried as signed total seconds. Negative totals mean
//! overtime; the segment decomposition is always the unsigned magnitude.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum representable time in seconds (99:59:59).
///
/// Shared by the conversion utilities and the editing engine so the clamp
/// bound cannot drift between them.
pub const MAX_TIME_SECONDS: i64 = 99 * 3600 + 59 * 60 + 59;

/// Milliseconds between timer ticks.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Which part of the HH:MM:SS display an edit operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSegmentKey {
    Hours,
    Minutes,
    Seconds,
}

impl TimeSegmentKey {
    /// Seconds per unit of this segment.
    pub fn weight(self) -> i64 {
        match self {
            TimeSegmentKey::Hours => 3600,
            TimeSegmentKey::Minutes => 60,
            TimeSegmentKey::Seconds => 1,
        }
    }

    /// Largest value a single segment can hold when typed directly.
    pub fn cap(self) -> i64 {
        match self {
            TimeSegmentKey::Hours => 99,
            TimeSegmentKey::Minutes => 59,
            TimeSegmentKey::Seconds => 59,
        }
    }

    /// The segment to the left, clamped at hours.
    pub fn left(self) -> TimeSegmentKey {
        match self {
            TimeSegmentKey::Hours => TimeSegmentKey::Hours,
            TimeSegmentKey::Minutes => TimeSegmentKey::Hours,
            TimeSegmentKey::Seconds => TimeSegmentKey::Minutes,
        }
    }

    /// The segment to the right, clamped at seconds.
    pub fn right(self) -> TimeSegmentKey {
        match self {
            TimeSegmentKey::Hours => TimeSegmentKey::Minutes,
            TimeSegmentKey::Minutes => TimeSegmentKey::Seconds,
            TimeSegmentKey::Seconds => TimeSegmentKey::Seconds,
        }
    }
}

impl fmt::Display for TimeSegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSegmentKey::Hours => write!(f, "hours"),
            TimeSegmentKey::Minutes => write!(f, "minutes"),
            TimeSegmentKey::Seconds => write!(f, "seconds"),
        }
    }
}

impl FromStr for TimeSegmentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hours" => Ok(TimeSegmentKey::Hours),
            "minutes" => Ok(TimeSegmentKey::Minutes),
            "seconds" => Ok(TimeSegmentKey::Seconds),
            other => Err(format!("unknown time segment: {}", other)),
        }
    }
}

/// Unsigned decomposition of a duration magnitude.
///
/// Always derived from a total-seconds value, never mutated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegments {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Presentation projection of a total-seconds value (always HH:MM:SS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTime {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub is_negative: bool,
}

/// Decompose total seconds into segments, sign-blind and clamped to
/// [`MAX_TIME_SECONDS`].
pub fn seconds_to_segments(total_seconds: i64) -> TimeSegments {
    let clamped = total_seconds.saturating_abs().min(MAX_TIME_SECONDS);

    TimeSegments {
        hours: clamped / 3600,
        minutes: (clamped % 3600) / 60,
        seconds: clamped % 60,
    }
}

/// Recompose segments into total seconds. Exact inverse of
/// [`seconds_to_segments`] for in-range values.
pub fn segments_to_seconds(segments: &TimeSegments) -> i64 {
    segments.hours * 3600 + segments.minutes * 60 + segments.seconds
}

/// Zero-pad the magnitude of a segment value to two digits.
pub fn format_segment(value: i64) -> String {
    format!("{:02}", value.saturating_abs())
}

/// Format total seconds for display.
pub fn format_time_for_display(total_seconds: i64) -> DisplayTime {
    let segments = seconds_to_segments(total_seconds);

    DisplayTime {
        hours: format_segment(segments.hours),
        minutes: format_segment(segments.minutes),
        seconds: format_segment(segments.seconds),
        is_negative: total_seconds < 0,
    }
}

/// Human label for a preset duration, e.g. "15m" or "1h 30m".
///
/// The seconds component is dropped whenever hours or minutes is nonzero;
/// the label is deliberately lossy.
pub fn format_preset_label(seconds: i64) -> String {
    let segments = seconds_to_segments(seconds);

    if segments.hours > 0 && segments.minutes > 0 {
        format!("{}h {}m", segments.hours, segments.minutes)
    } else if segments.hours > 0 {
        format!("{}h", segments.hours)
    } else if segments.minutes > 0 {
        format!("{}m", segments.minutes)
    } else {
        format!("{}s", segments.seconds)
    }
}

/// Apply an arrow-key delta to one segment, returning the new total seconds.
///
/// The delta is weighted by the segment and added directly to the total, so
/// carry into neighboring segments emerges from plain addition. The result is
/// clamped to [-MAX_TIME_SECONDS, MAX_TIME_SECONDS] and may be negative.
pub fn update_segment_value(current_seconds: i64, segment: TimeSegmentKey, delta: i64) -> i64 {
    let new_seconds = current_seconds.saturating_add(delta.saturating_mul(segment.weight()));
    new_seconds.clamp(-MAX_TIME_SECONDS, MAX_TIME_SECONDS)
}

/// Set one segment to an absolute typed value, returning the new total.
///
/// The addressed segment is overwritten with `min(cap, |value|)`. A negative
/// typed value flips the sign of the entire duration, not just the segment;
/// this lets the user enter overtime directly without a sign toggle.
pub fn set_segment_value(current_seconds: i64, segment: TimeSegmentKey, value: i64) -> i64 {
    let capped = value.saturating_abs().min(segment.cap());
    let mut segments = seconds_to_segments(current_seconds);

    match segment {
        TimeSegmentKey::Hours => segments.hours = capped,
        TimeSegmentKey::Minutes => segments.minutes = capped,
        TimeSegmentKey::Seconds => segments.seconds = capped,
    }

    let result = segments_to_seconds(&segments);
    if value < 0 {
        -result
    } else {
        result
    }
}
