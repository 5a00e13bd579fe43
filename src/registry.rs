//! Window registry
//!
//! A persisted list of every known timer window (geometry plus the
//! preferences needed to recreate it), used to restore all windows on
//! relaunch. Updates are merge-by-id: each window only ever writes its own
//! entry, so concurrent windows never clobber each other.

use serde::{Deserialize, Serialize};

use crate::storage::{self, keys, window_storage_key, Storage};
use crate::theme::DEFAULT_THEME_ID;
use crate::timer::TimerMode;

/// Default window dimensions (2.5:1, compact HH:MM:SS format).
pub const DEFAULT_WIDTH: u32 = 312;
pub const DEFAULT_HEIGHT: u32 = 125;

/// Everything needed to bring a window back after a relaunch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    pub theme_id: String,
    pub title: String,
    pub mode: TimerMode,
    pub last_time: i64,
}

impl RegistryEntry {
    pub fn new(id: &str, title: &str, last_time: i64) -> Self {
        Self {
            id: id.to_string(),
            x: None,
            y: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme_id: DEFAULT_THEME_ID.to_string(),
            title: title.to_string(),
            mode: TimerMode::Countdown,
            last_time,
        }
    }
}

/// Load the registry; corrupt or missing data yields an empty list.
pub fn load_registry(storage: &dyn Storage) -> Vec<RegistryEntry> {
    storage::load_json(storage, keys::WINDOW_REGISTRY).unwrap_or_default()
}

fn save_registry(storage: &dyn Storage, entries: &[RegistryEntry]) {
    storage::save_json(storage, keys::WINDOW_REGISTRY, &entries);
}

/// Insert or replace one window's entry, preserving everyone else's.
pub fn register_window(storage: &dyn Storage, entry: RegistryEntry) {
    let mut entries = load_registry(storage);
    entries.retain(|e| e.id != entry.id);
    entries.push(entry);
    save_registry(storage, &entries);
}

/// Drop a window's entry and all of its scoped storage keys.
pub fn unregister_window(storage: &dyn Storage, window_id: &str) {
    let mut entries = load_registry(storage);
    entries.retain(|e| e.id != window_id);
    save_registry(storage, &entries);

    for base in keys::WINDOW_SCOPED {
        storage.remove(&window_storage_key(base, window_id));
    }
}

/// Update the stored geometry for one window, if it is registered.
pub fn update_geometry(
    storage: &dyn Storage,
    window_id: &str,
    x: Option<i32>,
    y: Option<i32>,
    width: u32,
    height: u32,
) {
    let mut entries = load_registry(storage);
    for entry in entries.iter_mut().filter(|e| e.id == window_id) {
        entry.x = x;
        entry.y = y;
        entry.width = width;
        entry.height = height;
    }
    save_registry(storage, &entries);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_register_merges_by_id() {
        let storage = MemoryStorage::new();
        register_window(&storage, RegistryEntry::new("main", "Timer", 60));
        register_window(&storage, RegistryEntry::new("timer-1", "Tea", 300));

        let mut updated = RegistryEntry::new("main", "Renamed", 900);
        updated.theme_id = "teal-coral".to_string();
        register_window(&storage, updated.clone());

        let entries = load_registry(&storage);
        assert_eq!(entries.len(), 2);
        let main = entries.iter().find(|e| e.id == "main").unwrap();
        assert_eq!(*main, updated);
        assert!(entries.iter().any(|e| e.id == "timer-1"));
    }

    #[test]
    fn test_unregister_removes_entry_and_scoped_keys() {
        let storage = MemoryStorage::new();
        register_window(&storage, RegistryEntry::new("timer-1", "Tea", 300));
        storage.save(&window_storage_key(keys::LAST_TIME, "timer-1"), "300");
        storage.save(&window_storage_key(keys::TITLE, "timer-1"), "\"Tea\"");

        unregister_window(&storage, "timer-1");

        assert!(load_registry(&storage).is_empty());
        assert!(storage.load(&window_storage_key(keys::LAST_TIME, "timer-1")).is_none());
        assert!(storage.load(&window_storage_key(keys::TITLE, "timer-1")).is_none());
    }

    #[test]
    fn test_update_geometry() {
        let storage = MemoryStorage::new();
        register_window(&storage, RegistryEntry::new("main", "Timer", 60));
        update_geometry(&storage, "main", Some(40), Some(80), 500, 200);

        let entries = load_registry(&storage);
        assert_eq!(entries[0].x, Some(40));
        assert_eq!(entries[0].y, Some(80));
        assert_eq!(entries[0].width, 500);
        assert_eq!(entries[0].height, 200);
    }

    #[test]
    fn test_corrupt_registry_loads_empty() {
        let storage = MemoryStorage::new();
        storage.save(keys::WINDOW_REGISTRY, "[{broken");
        assert!(load_registry(&storage).is_empty());
    }
}
