//! Timer controller
//!
//! Stateful wrapper around the reducer for one window. Owns the canonical
//! [`TimerState`], the window's tick mode, and the typed-entry buffer for
//! segment editing. Every dispatch synchronously flushes the persisted
//! triple (remaining, initial, status) through the storage collaborator.

use std::sync::Arc;

use serde::Deserialize;

use crate::storage::{self, keys, window_storage_key, Storage};
use crate::theme::{ColorTheme, PAUSED_COLOR};

use super::reducer::{reduce, TimerAction, TimerMode, TimerState, TimerStatus};
use super::time::{
    format_time_for_display, seconds_to_segments, update_segment_value, DisplayTime,
    TimeSegmentKey, TimeSegments, MAX_TIME_SECONDS,
};

/// Left/right navigation between segments while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavDirection {
    Left,
    Right,
}

pub struct TimerController {
    window_id: String,
    state: TimerState,
    mode: TimerMode,
    /// Digits typed into the edited segment since editing began. `Some`
    /// means the user actually typed, so a commit must apply the value;
    /// arrow-key adjustments mutate state live and must not be re-applied.
    pending_entry: Option<String>,
    storage: Arc<dyn Storage>,
}

impl TimerController {
    /// Restore a controller from persisted state, falling back to
    /// `default_seconds` for a window never seen before.
    ///
    /// A persisted running or overtime status is downgraded to paused: a
    /// relaunched app never silently resumes a countdown.
    pub fn mount(storage: Arc<dyn Storage>, window_id: &str, default_seconds: i64) -> Self {
        let load = |base: &str| window_storage_key(base, window_id);

        let remaining: i64 = storage::load_json(storage.as_ref(), &load(keys::LAST_TIME))
            .unwrap_or(default_seconds);
        let initial: i64 = storage::load_json(storage.as_ref(), &load(keys::INITIAL_TIME))
            .unwrap_or(default_seconds);
        let status: TimerStatus =
            storage::load_json(storage.as_ref(), &load(keys::STATUS)).unwrap_or(TimerStatus::Idle);
        let mode: TimerMode = storage::load_json(storage.as_ref(), &load(keys::TIMER_MODE))
            .unwrap_or(TimerMode::Countdown);

        let status = if status.is_ticking() {
            TimerStatus::Paused
        } else {
            status
        };

        Self {
            window_id: window_id.to_string(),
            state: TimerState {
                remaining_seconds: remaining.clamp(-MAX_TIME_SECONDS, MAX_TIME_SECONDS),
                initial_seconds: initial.clamp(-MAX_TIME_SECONDS, MAX_TIME_SECONDS),
                status,
                editing_segment: None,
                was_running_before_edit: false,
            },
            mode,
            pending_entry: None,
            storage,
        }
    }

    fn dispatch(&mut self, action: TimerAction) {
        self.state = reduce(&self.state, action);
        self.persist();
    }

    /// Flush the persisted triple. Best-effort; failures stay in storage.
    fn persist(&self) {
        let key = |base: &str| window_storage_key(base, &self.window_id);
        storage::save_json(
            self.storage.as_ref(),
            &key(keys::LAST_TIME),
            &self.state.remaining_seconds,
        );
        storage::save_json(
            self.storage.as_ref(),
            &key(keys::INITIAL_TIME),
            &self.state.initial_seconds,
        );
        storage::save_json(self.storage.as_ref(), &key(keys::STATUS), &self.state.status);
    }

    pub fn start(&mut self) {
        self.dispatch(TimerAction::Start);
    }

    pub fn pause(&mut self) {
        self.dispatch(TimerAction::Pause);
    }

    /// Pause if ticking, start otherwise.
    pub fn toggle(&mut self) {
        if self.state.status.is_ticking() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.pending_entry = None;
        self.dispatch(TimerAction::Reset);
    }

    /// Set a new duration, clamped to the representable range.
    pub fn set_time(&mut self, seconds: i64) {
        self.pending_entry = None;
        self.dispatch(TimerAction::SetTime(
            seconds.clamp(-MAX_TIME_SECONDS, MAX_TIME_SECONDS),
        ));
    }

    /// Advance the clock by one tick in the window's current mode.
    /// The tick task gates on status; the reducer itself is unconditional.
    pub fn tick(&mut self) {
        self.dispatch(TimerAction::Tick(self.mode));
    }

    /// Arrow-key increment/decrement of one segment, applied live.
    pub fn adjust_segment(&mut self, segment: TimeSegmentKey, delta: i64) {
        let new_seconds = update_segment_value(self.state.remaining_seconds, segment, delta);
        self.dispatch(TimerAction::AdjustTime(new_seconds));
    }

    /// Overwrite one segment with an absolute value.
    pub fn set_segment(&mut self, segment: TimeSegmentKey, value: i64) {
        self.dispatch(TimerAction::SetSegment(segment, value));
    }

    /// Begin editing a segment. Pauses a ticking timer and remembers
    /// whether to resume on exit.
    pub fn start_editing(&mut self, segment: TimeSegmentKey) {
        self.pending_entry = None;
        self.dispatch(TimerAction::StartEditing(segment));
    }

    /// Record typed input for the edited segment. Ignored when no segment
    /// is being edited. Digits and a leading minus are kept, everything
    /// else is dropped; at most two digits survive.
    pub fn type_entry(&mut self, text: &str) {
        if self.state.editing_segment.is_none() {
            return;
        }
        self.pending_entry = Some(sanitize_entry(text));
    }

    /// Move editing focus to the adjacent segment, clamped at the ends.
    /// Leaving a segment commits its typed value, like focus moving away.
    pub fn navigate(&mut self, direction: NavDirection) {
        let Some(current) = self.state.editing_segment else {
            return;
        };
        self.commit_pending(current);
        let next = match direction {
            NavDirection::Left => current.left(),
            NavDirection::Right => current.right(),
        };
        if next != current {
            self.dispatch(TimerAction::StartEditing(next));
        }
    }

    /// Leave edit mode. With `commit`, typed input is applied first; arrow
    /// adjustments were already applied live and are never re-applied.
    /// Without `commit` (Escape), typed input is discarded.
    pub fn stop_editing(&mut self, commit: bool) {
        if commit {
            if let Some(segment) = self.state.editing_segment {
                self.commit_pending(segment);
            }
        }
        self.pending_entry = None;
        self.dispatch(TimerAction::StopEditing);
    }

    fn commit_pending(&mut self, segment: TimeSegmentKey) {
        if let Some(entry) = self.pending_entry.take() {
            let value = entry.parse::<i64>().unwrap_or(0);
            self.dispatch(TimerAction::SetSegment(segment, value));
        }
    }

    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Flip between countdown and count-up; persisted per window.
    pub fn toggle_mode(&mut self) -> TimerMode {
        self.mode = self.mode.toggled();
        storage::save_json(
            self.storage.as_ref(),
            &window_storage_key(keys::TIMER_MODE, &self.window_id),
            &self.mode,
        );
        self.mode
    }

    pub fn editing_segment(&self) -> Option<TimeSegmentKey> {
        self.state.editing_segment
    }

    pub fn display_time(&self) -> DisplayTime {
        format_time_for_display(self.state.remaining_seconds)
    }

    pub fn segments(&self) -> TimeSegments {
        seconds_to_segments(self.state.remaining_seconds)
    }

    /// Status-driven display color for the given theme pairing.
    pub fn display_color(&self, theme: &ColorTheme) -> &'static str {
        match self.state.status {
            TimerStatus::Running => theme.running,
            TimerStatus::Overtime => theme.overtime,
            TimerStatus::Paused | TimerStatus::Idle => PAUSED_COLOR,
        }
    }
}

/// Keep a leading minus and up to two digits, drop everything else.
fn sanitize_entry(text: &str) -> String {
    let mut out = String::new();
    let mut digits = 0;
    for (i, c) in text.chars().enumerate() {
        if c == '-' && i == 0 {
            out.push(c);
        } else if c.is_ascii_digit() && digits < 2 {
            out.push(c);
            digits += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::theme::theme_by_id;

    fn controller(default_seconds: i64) -> TimerController {
        TimerController::mount(Arc::new(MemoryStorage::new()), "timer-1", default_seconds)
    }

    #[test]
    fn test_mount_uses_default_when_storage_empty() {
        let c = controller(60);
        assert_eq!(c.state().remaining_seconds, 60);
        assert_eq!(c.state().initial_seconds, 60);
        assert_eq!(c.status(), TimerStatus::Idle);
        assert_eq!(c.mode(), TimerMode::Countdown);
    }

    #[test]
    fn test_persisted_running_status_loads_as_paused() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut c = TimerController::mount(Arc::clone(&storage) as Arc<dyn Storage>, "timer-1", 60);
            c.start();
            c.tick();
            assert_eq!(c.status(), TimerStatus::Running);
        }

        let c = TimerController::mount(storage as Arc<dyn Storage>, "timer-1", 60);
        assert_eq!(c.status(), TimerStatus::Paused);
        assert_eq!(c.state().remaining_seconds, 59);
        assert_eq!(c.state().initial_seconds, 60);
    }

    #[test]
    fn test_persistence_is_scoped_per_window() {
        let storage = Arc::new(MemoryStorage::new());
        let mut a = TimerController::mount(Arc::clone(&storage) as Arc<dyn Storage>, "timer-1", 60);
        let mut b = TimerController::mount(Arc::clone(&storage) as Arc<dyn Storage>, "timer-2", 60);
        a.set_time(900);
        b.set_time(30);

        let a2 = TimerController::mount(Arc::clone(&storage) as Arc<dyn Storage>, "timer-1", 60);
        let b2 = TimerController::mount(storage as Arc<dyn Storage>, "timer-2", 60);
        assert_eq!(a2.state().remaining_seconds, 900);
        assert_eq!(b2.state().remaining_seconds, 30);
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut c = controller(60);
        c.toggle();
        assert_eq!(c.status(), TimerStatus::Running);
        c.toggle();
        assert_eq!(c.status(), TimerStatus::Paused);
    }

    #[test]
    fn test_toggle_from_overtime_pauses() {
        let mut c = controller(0);
        c.start();
        c.tick();
        assert_eq!(c.status(), TimerStatus::Overtime);
        c.toggle();
        assert_eq!(c.status(), TimerStatus::Paused);
    }

    #[test]
    fn test_set_time_clamps() {
        let mut c = controller(60);
        c.set_time(MAX_TIME_SECONDS + 500);
        assert_eq!(c.state().remaining_seconds, MAX_TIME_SECONDS);
        c.set_time(-MAX_TIME_SECONDS - 500);
        assert_eq!(c.state().remaining_seconds, -MAX_TIME_SECONDS);
    }

    #[test]
    fn test_countup_mode_ticks_upward() {
        let mut c = controller(0);
        c.toggle_mode();
        assert_eq!(c.mode(), TimerMode::Countup);
        c.start();
        c.tick();
        c.tick();
        assert_eq!(c.state().remaining_seconds, 2);
        assert_eq!(c.status(), TimerStatus::Running);
    }

    #[test]
    fn test_mode_survives_remount() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let mut c = TimerController::mount(Arc::clone(&storage) as Arc<dyn Storage>, "timer-1", 60);
            c.toggle_mode();
        }
        let c = TimerController::mount(storage as Arc<dyn Storage>, "timer-1", 60);
        assert_eq!(c.mode(), TimerMode::Countup);
    }

    #[test]
    fn test_commit_applies_only_typed_input() {
        let mut c = controller(60);
        c.start_editing(TimeSegmentKey::Minutes);
        c.type_entry("15");
        c.stop_editing(true);
        assert_eq!(c.state().remaining_seconds, 900);
        assert_eq!(c.editing_segment(), None);
    }

    #[test]
    fn test_commit_without_typing_applies_nothing() {
        let mut c = controller(90);
        c.start_editing(TimeSegmentKey::Minutes);
        // Arrow keys only: the adjustment is applied live, commit must not
        // re-apply anything on top of it.
        c.adjust_segment(TimeSegmentKey::Minutes, 1);
        assert_eq!(c.state().remaining_seconds, 150);
        c.stop_editing(true);
        assert_eq!(c.state().remaining_seconds, 150);
    }

    #[test]
    fn test_escape_discards_typed_input() {
        let mut c = controller(60);
        c.start_editing(TimeSegmentKey::Seconds);
        c.type_entry("45");
        c.stop_editing(false);
        assert_eq!(c.state().remaining_seconds, 60);
    }

    #[test]
    fn test_typed_negative_entry_flips_sign() {
        let mut c = controller(3600);
        c.start_editing(TimeSegmentKey::Minutes);
        c.type_entry("-30");
        c.stop_editing(true);
        assert_eq!(c.state().remaining_seconds, -5400);
    }

    #[test]
    fn test_editing_running_timer_resumes_after_commit() {
        let mut c = controller(60);
        c.start();
        c.start_editing(TimeSegmentKey::Seconds);
        assert_eq!(c.status(), TimerStatus::Paused);
        c.type_entry("30");
        c.stop_editing(true);
        assert_eq!(c.status(), TimerStatus::Running);
        assert_eq!(c.state().remaining_seconds, 30);
    }

    #[test]
    fn test_navigate_commits_and_moves() {
        let mut c = controller(0);
        c.start_editing(TimeSegmentKey::Hours);
        c.type_entry("1");
        c.navigate(NavDirection::Right);
        assert_eq!(c.editing_segment(), Some(TimeSegmentKey::Minutes));
        assert_eq!(c.state().remaining_seconds, 3600);
        // Clamped at the right end
        c.navigate(NavDirection::Right);
        c.navigate(NavDirection::Right);
        assert_eq!(c.editing_segment(), Some(TimeSegmentKey::Seconds));
    }

    #[test]
    fn test_navigate_ignored_outside_edit_mode() {
        let mut c = controller(60);
        c.navigate(NavDirection::Left);
        assert_eq!(c.editing_segment(), None);
    }

    #[test]
    fn test_type_entry_sanitizes() {
        assert_eq!(sanitize_entry("-30"), "-30");
        assert_eq!(sanitize_entry("1a2b3"), "12");
        assert_eq!(sanitize_entry("12345"), "12");
        assert_eq!(sanitize_entry("3-4"), "34");
        assert_eq!(sanitize_entry(""), "");
        assert_eq!(sanitize_entry("-"), "-");
    }

    #[test]
    fn test_garbage_entry_commits_as_zero() {
        let mut c = controller(90);
        c.start_editing(TimeSegmentKey::Seconds);
        c.type_entry("-");
        c.stop_editing(true);
        // "-" parses as 0, segment zeroed
        assert_eq!(c.state().remaining_seconds, 60);
    }

    #[test]
    fn test_display_views() {
        let mut c = controller(3661);
        let display = c.display_time();
        assert_eq!(
            (display.hours.as_str(), display.minutes.as_str(), display.seconds.as_str()),
            ("01", "01", "01")
        );
        assert!(!display.is_negative);
        assert_eq!(c.segments(), seconds_to_segments(3661));

        let theme = theme_by_id("green-red");
        assert_eq!(c.display_color(theme), PAUSED_COLOR);
        c.start();
        assert_eq!(c.display_color(theme), theme.running);
        c.set_time(0);
        c.start();
        c.tick();
        assert_eq!(c.display_color(theme), theme.overtime);
    }
}
