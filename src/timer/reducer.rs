//! The timer state machine
//!
//! A pure reducer over [`TimerState`]: every `(state, action)` pair yields a
//! defined next state, out-of-range input clamps rather than fails, and no
//! action is ever rejected. All mutation of a window's timer flows through
//! [`reduce`], which keeps the single-queue concurrency story trivial.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::time::{set_segment_value, TimeSegmentKey};

/// Timer lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Freshly set or reset, never started.
    Idle,
    /// Actively ticking with non-negative remaining time.
    Running,
    /// Ticking suspended, time preserved.
    Paused,
    /// Countdown only: still ticking, remaining time below zero.
    Overtime,
}

impl TimerStatus {
    /// Whether a tick source should be active for this status.
    pub fn is_ticking(self) -> bool {
        matches!(self, TimerStatus::Running | TimerStatus::Overtime)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerStatus::Idle => write!(f, "idle"),
            TimerStatus::Running => write!(f, "running"),
            TimerStatus::Paused => write!(f, "paused"),
            TimerStatus::Overtime => write!(f, "overtime"),
        }
    }
}

impl FromStr for TimerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(TimerStatus::Idle),
            "running" => Ok(TimerStatus::Running),
            "paused" => Ok(TimerStatus::Paused),
            "overtime" => Ok(TimerStatus::Overtime),
            other => Err(format!("unknown timer status: {}", other)),
        }
    }
}

/// Direction of the tick: counting down toward zero or up from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Countdown,
    Countup,
}

impl TimerMode {
    pub fn toggled(self) -> TimerMode {
        match self {
            TimerMode::Countdown => TimerMode::Countup,
            TimerMode::Countup => TimerMode::Countdown,
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerMode::Countdown => write!(f, "countdown"),
            TimerMode::Countup => write!(f, "countup"),
        }
    }
}

/// The sole mutable aggregate for one timer window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Remaining time in seconds; negative while in overtime.
    pub remaining_seconds: i64,
    /// The value RESET returns to; updated by every explicit time set.
    pub initial_seconds: i64,
    pub status: TimerStatus,
    /// Which segment is being edited, if any.
    pub editing_segment: Option<TimeSegmentKey>,
    /// Whether the timer was ticking when editing started, so STOP_EDITING
    /// can resume it. Meaningful only while `editing_segment` is set.
    pub was_running_before_edit: bool,
}

impl TimerState {
    pub fn new(initial_seconds: i64) -> Self {
        Self {
            remaining_seconds: initial_seconds,
            initial_seconds,
            status: TimerStatus::Idle,
            editing_segment: None,
            was_running_before_edit: false,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Actions accepted by the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Start,
    Pause,
    Tick(TimerMode),
    Reset,
    /// Set both remaining and initial time; stops editing and returns to idle.
    SetTime(i64),
    /// Set both remaining and initial time without touching edit state or
    /// status. Used mid-edit for arrow-key deltas.
    AdjustTime(i64),
    /// Overwrite one segment with a typed value.
    SetSegment(TimeSegmentKey, i64),
    StartEditing(TimeSegmentKey),
    StopEditing,
}

/// Compute the next state. Total over all `(state, action)` pairs.
pub fn reduce(state: &TimerState, action: TimerAction) -> TimerState {
    match action {
        TimerAction::Start => TimerState {
            status: if state.remaining_seconds < 0 {
                TimerStatus::Overtime
            } else {
                TimerStatus::Running
            },
            ..state.clone()
        },

        TimerAction::Pause => TimerState {
            status: TimerStatus::Paused,
            ..state.clone()
        },

        TimerAction::Tick(mode) => {
            let new_seconds = match mode {
                TimerMode::Countdown => state.remaining_seconds - 1,
                TimerMode::Countup => state.remaining_seconds + 1,
            };
            // Countdown crosses into overtime below zero; count-up just runs.
            let new_status = if mode == TimerMode::Countdown && new_seconds < 0 {
                TimerStatus::Overtime
            } else {
                TimerStatus::Running
            };
            TimerState {
                remaining_seconds: new_seconds,
                status: new_status,
                ..state.clone()
            }
        }

        TimerAction::Reset => TimerState {
            remaining_seconds: state.initial_seconds,
            status: TimerStatus::Idle,
            editing_segment: None,
            ..state.clone()
        },

        TimerAction::SetTime(seconds) => TimerState {
            remaining_seconds: seconds,
            initial_seconds: seconds,
            status: TimerStatus::Idle,
            editing_segment: None,
            ..state.clone()
        },

        TimerAction::AdjustTime(seconds) => TimerState {
            remaining_seconds: seconds,
            initial_seconds: seconds,
            ..state.clone()
        },

        TimerAction::SetSegment(segment, value) => {
            let new_seconds = set_segment_value(state.remaining_seconds, segment, value);
            TimerState {
                remaining_seconds: new_seconds,
                initial_seconds: new_seconds,
                ..state.clone()
            }
        }

        TimerAction::StartEditing(segment) => {
            let was_ticking = state.status.is_ticking();
            TimerState {
                editing_segment: Some(segment),
                was_running_before_edit: was_ticking,
                // Never edit a moving target
                status: if was_ticking {
                    TimerStatus::Paused
                } else {
                    state.status
                },
                ..state.clone()
            }
        }

        TimerAction::StopEditing => TimerState {
            editing_segment: None,
            status: if state.was_running_before_edit {
                TimerStatus::Running
            } else {
                state.status
            },
            was_running_before_edit: false,
            ..state.clone()
        },
    }
}
