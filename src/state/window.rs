//! A single timer window
//!
//! Bundles one controller with the window-scoped preferences (title, theme)
//! and a status watch channel that drives the window's tick task. All
//! controller access goes through [`TimerWindow::with_controller`], which
//! republishes the status after every mutation so the tick task can arm or
//! disarm itself.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::watch;

use crate::storage::{self, keys, window_storage_key, Storage};
use crate::theme::{theme_by_id, DEFAULT_THEME_ID};
use crate::timer::{
    DisplayTime, TimeSegmentKey, TimeSegments, TimerController, TimerMode, TimerStatus,
};

/// Default title for windows the user has not renamed.
pub const DEFAULT_TITLE: &str = "Overtimer";

/// Point-in-time view of a window, used by the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct WindowSnapshot {
    pub id: String,
    pub title: String,
    pub theme_id: String,
    pub mode: TimerMode,
    pub status: TimerStatus,
    pub remaining_seconds: i64,
    pub initial_seconds: i64,
    pub editing_segment: Option<TimeSegmentKey>,
    pub display: DisplayTime,
    pub segments: TimeSegments,
    pub color: &'static str,
}

pub struct TimerWindow {
    pub id: String,
    storage: Arc<dyn Storage>,
    controller: Mutex<TimerController>,
    status_tx: watch::Sender<TimerStatus>,
    title: Mutex<String>,
    theme_id: Mutex<String>,
}

impl TimerWindow {
    /// Mount a window from persisted state. Returns the window and the
    /// status receiver its tick task parks on.
    pub fn mount(
        storage: Arc<dyn Storage>,
        id: &str,
        default_seconds: i64,
    ) -> (Self, watch::Receiver<TimerStatus>) {
        let controller = TimerController::mount(Arc::clone(&storage), id, default_seconds);

        let title: String =
            storage::load_json(storage.as_ref(), &window_storage_key(keys::TITLE, id))
                .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let theme_id: String =
            storage::load_json(storage.as_ref(), &window_storage_key(keys::COLOR_THEME, id))
                .unwrap_or_else(|| DEFAULT_THEME_ID.to_string());

        let (status_tx, status_rx) = watch::channel(controller.status());

        (
            Self {
                id: id.to_string(),
                storage,
                controller: Mutex::new(controller),
                status_tx,
                title: Mutex::new(title),
                theme_id: Mutex::new(theme_id),
            },
            status_rx,
        )
    }

    /// Run an operation against the controller, then republish the status
    /// so the tick task sees transitions into and out of the ticking set.
    pub fn with_controller<R>(
        &self,
        f: impl FnOnce(&mut TimerController) -> R,
    ) -> Result<R, String> {
        let mut controller = self
            .controller
            .lock()
            .map_err(|e| format!("Failed to lock timer controller: {}", e))?;

        let result = f(&mut controller);
        let status = controller.status();
        drop(controller);

        self.status_tx.send_if_modified(|current| {
            if *current != status {
                *current = status;
                true
            } else {
                false
            }
        });

        Ok(result)
    }

    /// Advance the timer by one tick.
    pub fn tick(&self) -> Result<(), String> {
        self.with_controller(|c| c.tick())
    }

    pub fn title(&self) -> Result<String, String> {
        self.title
            .lock()
            .map(|t| t.clone())
            .map_err(|e| format!("Failed to lock window title: {}", e))
    }

    pub fn set_title(&self, title: &str) -> Result<(), String> {
        let mut current = self
            .title
            .lock()
            .map_err(|e| format!("Failed to lock window title: {}", e))?;
        *current = title.to_string();
        storage::save_json(
            self.storage.as_ref(),
            &window_storage_key(keys::TITLE, &self.id),
            &title,
        );
        Ok(())
    }

    pub fn theme_id(&self) -> Result<String, String> {
        self.theme_id
            .lock()
            .map(|t| t.clone())
            .map_err(|e| format!("Failed to lock window theme: {}", e))
    }

    /// Set the theme pairing; unknown ids fall back to the default theme.
    pub fn set_theme(&self, theme_id: &str) -> Result<String, String> {
        let resolved = theme_by_id(theme_id).id.to_string();
        let mut current = self
            .theme_id
            .lock()
            .map_err(|e| format!("Failed to lock window theme: {}", e))?;
        *current = resolved.clone();
        storage::save_json(
            self.storage.as_ref(),
            &window_storage_key(keys::COLOR_THEME, &self.id),
            &resolved,
        );
        Ok(resolved)
    }

    pub fn snapshot(&self) -> Result<WindowSnapshot, String> {
        let title = self.title()?;
        let theme_id = self.theme_id()?;
        let theme = theme_by_id(&theme_id);

        self.with_controller(|c| WindowSnapshot {
            id: self.id.clone(),
            title: title.clone(),
            theme_id: theme_id.clone(),
            mode: c.mode(),
            status: c.status(),
            remaining_seconds: c.state().remaining_seconds,
            initial_seconds: c.state().initial_seconds,
            editing_segment: c.editing_segment(),
            display: c.display_time(),
            segments: c.segments(),
            color: c.display_color(theme),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::theme::PAUSED_COLOR;

    fn window() -> (TimerWindow, watch::Receiver<TimerStatus>) {
        TimerWindow::mount(Arc::new(MemoryStorage::new()), "timer-1", 60)
    }

    #[test]
    fn test_mount_defaults() {
        let (w, rx) = window();
        assert_eq!(*rx.borrow(), TimerStatus::Idle);
        assert_eq!(w.title().unwrap(), DEFAULT_TITLE);
        assert_eq!(w.theme_id().unwrap(), DEFAULT_THEME_ID);
    }

    #[test]
    fn test_status_watch_follows_controller() {
        let (w, rx) = window();
        w.with_controller(|c| c.start()).unwrap();
        assert_eq!(*rx.borrow(), TimerStatus::Running);
        w.with_controller(|c| c.pause()).unwrap();
        assert_eq!(*rx.borrow(), TimerStatus::Paused);
    }

    #[test]
    fn test_title_and_theme_survive_remount() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        {
            let (w, _rx) = TimerWindow::mount(Arc::clone(&storage), "timer-1", 60);
            w.set_title("Tea").unwrap();
            w.set_theme("teal-coral").unwrap();
        }
        let (w, _rx) = TimerWindow::mount(storage, "timer-1", 60);
        assert_eq!(w.title().unwrap(), "Tea");
        assert_eq!(w.theme_id().unwrap(), "teal-coral");
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let (w, _rx) = window();
        assert_eq!(w.set_theme("nope").unwrap(), DEFAULT_THEME_ID);
    }

    #[test]
    fn test_snapshot() {
        let (w, _rx) = window();
        let snapshot = w.snapshot().unwrap();
        assert_eq!(snapshot.id, "timer-1");
        assert_eq!(snapshot.status, TimerStatus::Idle);
        assert_eq!(snapshot.remaining_seconds, 60);
        assert_eq!(snapshot.display.minutes, "01");
        assert_eq!(snapshot.color, PAUSED_COLOR);
        assert_eq!(snapshot.editing_segment, None);
    }
}
