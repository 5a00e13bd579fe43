//! Main application state management
//!
//! Owns every live timer window. Windows are independent: each has its own
//! controller, storage namespace, and tick task; the only shared structures
//! are the storage handle and the persisted window registry.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

use tracing::{info, warn};

use crate::registry::{self, RegistryEntry};
use crate::state::window::TimerWindow;
use crate::storage::Storage;
use crate::tasks::window_tick_task;

/// Id of the window created on first launch.
pub const MAIN_WINDOW_ID: &str = "main";

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    /// Live windows by id.
    windows: Mutex<HashMap<String, Arc<TimerWindow>>>,
    /// Counter for generating unique window ids.
    window_counter: AtomicU32,
    /// Starting duration for windows with no persisted time.
    pub default_seconds: i64,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, default_seconds: i64) -> Self {
        Self {
            storage,
            windows: Mutex::new(HashMap::new()),
            window_counter: AtomicU32::new(1),
            default_seconds,
            start_time: Instant::now(),
        }
    }

    /// Bring back every registered window, or create the main window on a
    /// fresh start. Restored timers never resume on their own; persisted
    /// running statuses were already downgraded to paused at mount.
    pub fn restore_windows(self: &Arc<Self>) -> Result<(), String> {
        let entries = registry::load_registry(self.storage.as_ref());

        if entries.is_empty() {
            info!("No registered windows, creating {}", MAIN_WINDOW_ID);
            self.open_window(Some(MAIN_WINDOW_ID))?;
            return Ok(());
        }

        // Keep generated ids clear of the restored ones
        for entry in &entries {
            if let Some(n) = entry
                .id
                .strip_prefix("timer-")
                .and_then(|n| n.parse::<u32>().ok())
            {
                self.window_counter.fetch_max(n + 1, Ordering::SeqCst);
            }
        }

        info!("Restoring {} windows from registry", entries.len());
        for entry in entries {
            self.open_window(Some(&entry.id))?;
        }
        Ok(())
    }

    /// Open a window and start its tick task. With no id, a fresh
    /// `timer-{n}` id is generated. Reopening a live id is an error.
    pub fn open_window(self: &Arc<Self>, id: Option<&str>) -> Result<Arc<TimerWindow>, String> {
        let id = match id {
            Some(id) => id.to_string(),
            None => format!("timer-{}", self.window_counter.fetch_add(1, Ordering::SeqCst)),
        };

        let mut windows = self
            .windows
            .lock()
            .map_err(|e| format!("Failed to lock window table: {}", e))?;
        if windows.contains_key(&id) {
            return Err(format!("Window {} is already open", id));
        }

        let (window, status_rx) =
            TimerWindow::mount(Arc::clone(&self.storage), &id, self.default_seconds);
        let window = Arc::new(window);
        windows.insert(id.clone(), Arc::clone(&window));
        drop(windows);

        // The task holds a weak handle so closing the window tears it down
        tokio::spawn(window_tick_task(Arc::downgrade(&window), status_rx));

        self.sync_registry(&window);
        info!("Opened window {}", id);
        Ok(window)
    }

    /// Close a window, dropping its registry entry and scoped storage.
    pub fn close_window(&self, id: &str) -> Result<bool, String> {
        let removed = self
            .windows
            .lock()
            .map_err(|e| format!("Failed to lock window table: {}", e))?
            .remove(id)
            .is_some();

        if removed {
            registry::unregister_window(self.storage.as_ref(), id);
            info!("Closed window {}", id);
        }
        Ok(removed)
    }

    pub fn window(&self, id: &str) -> Result<Option<Arc<TimerWindow>>, String> {
        self.windows
            .lock()
            .map(|windows| windows.get(id).cloned())
            .map_err(|e| format!("Failed to lock window table: {}", e))
    }

    pub fn window_ids(&self) -> Result<Vec<String>, String> {
        self.windows
            .lock()
            .map(|windows| {
                let mut ids: Vec<String> = windows.keys().cloned().collect();
                ids.sort();
                ids
            })
            .map_err(|e| format!("Failed to lock window table: {}", e))
    }

    /// Refresh a window's registry entry from its current state,
    /// preserving any recorded geometry.
    pub fn sync_registry(&self, window: &TimerWindow) {
        let snapshot = match window.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Skipping registry sync for {}: {}", window.id, e);
                return;
            }
        };

        let existing = registry::load_registry(self.storage.as_ref())
            .into_iter()
            .find(|e| e.id == window.id);

        let mut entry = RegistryEntry::new(&window.id, &snapshot.title, snapshot.remaining_seconds);
        if let Some(existing) = existing {
            entry.x = existing.x;
            entry.y = existing.y;
            entry.width = existing.width;
            entry.height = existing.height;
        }
        entry.theme_id = snapshot.theme_id;
        entry.mode = snapshot.mode;

        registry::register_window(self.storage.as_ref(), entry);
    }

    /// Server uptime as a human string.
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
