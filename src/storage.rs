//! Persisted key-value storage
//!
//! The core depends on a best-effort string store: loads that fail return
//! `None`, saves and removes swallow their errors. Timer state stays correct
//! in memory even when nothing can be written to disk; the user experience
//! degrades to "this session may not persist", never to a visible error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Storage key bases. Keys holding per-window values are scoped with
/// [`window_storage_key`].
pub mod keys {
    /// Recent user-entered time presets (per window).
    pub const USER_PRESETS: &str = "overtimer:user-presets";
    /// Last remaining time in seconds (per window).
    pub const LAST_TIME: &str = "overtimer:last-time";
    /// Initial time the timer resets to (per window).
    pub const INITIAL_TIME: &str = "overtimer:initial-time";
    /// Timer status at last save (per window).
    pub const STATUS: &str = "overtimer:status";
    /// User-defined window title (per window).
    pub const TITLE: &str = "overtimer:title";
    /// Timer mode, countdown or countup (per window).
    pub const TIMER_MODE: &str = "overtimer:mode";
    /// Color theme id (per window).
    pub const COLOR_THEME: &str = "overtimer:color-theme";
    /// Registry of all known windows.
    pub const WINDOW_REGISTRY: &str = "overtimer:window-registry";

    /// Every per-window base key, used for cleanup when a window closes.
    pub const WINDOW_SCOPED: [&str; 7] = [
        USER_PRESETS,
        LAST_TIME,
        INITIAL_TIME,
        STATUS,
        TITLE,
        TIMER_MODE,
        COLOR_THEME,
    ];
}

/// Scope a base key to one window.
pub fn window_storage_key(base: &str, window_id: &str) -> String {
    format!("{}:{}", base, window_id)
}

/// Best-effort string store. Never surfaces failures to the caller.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Load a JSON-encoded value, falling back to `None` on missing or
/// malformed data.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.load(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding malformed value for key {}: {}", key, e);
            None
        }
    }
}

/// Save a value JSON-encoded. Serialization failures are logged and dropped.
pub fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.save(key, &raw),
        Err(e) => warn!("Failed to encode value for key {}: {}", key, e),
    }
}

/// File-backed storage: one JSON object per data directory, held in memory
/// and rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    const FILE_NAME: &'static str = "storage.json";

    /// Open (or initialize) storage under the given data directory.
    /// A corrupt or missing file yields an empty store.
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(Self::FILE_NAME);
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Corrupt storage file {}, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) => {
                debug!("No storage file at {} ({}), starting empty", path.display(), e);
                HashMap::new()
            }
        };

        if let Err(e) = fs::create_dir_all(data_dir) {
            warn!("Failed to create data dir {}: {}", data_dir.display(), e);
        }

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode storage file: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, raw) {
            warn!("Failed to write storage file {}: {}", self.path.display(), e);
        }
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                warn!("Failed to lock storage for load: {}", e);
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
                self.flush(&entries);
            }
            Err(e) => warn!("Failed to lock storage for save: {}", e),
        }
    }

    fn remove(&self, key: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                if entries.remove(key).is_some() {
                    self.flush(&entries);
                }
            }
            Err(e) => warn!("Failed to lock storage for remove: {}", e),
        }
    }
}

/// In-memory storage for tests.
#[cfg(test)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
