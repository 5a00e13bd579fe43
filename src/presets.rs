//! Time presets
//!
//! A fixed set of default durations plus a short per-window list of recent
//! user-entered times, most recently used first. Defaults never enter the
//! user list and duplicates only refresh their timestamp.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::storage::{self, keys, window_storage_key, Storage};
use crate::timer::{format_preset_label, MAX_TIME_SECONDS};

/// Maximum number of recent user times to keep per window.
pub const MAX_USER_PRESETS: usize = 2;

/// A selectable duration with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetTime {
    pub label: String,
    pub seconds: i64,
}

/// A user-entered preset with its last-used timestamp (Utc millis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreset {
    pub label: String,
    pub seconds: i64,
    pub used_at: i64,
}

/// Default presets offered in every window.
pub fn default_presets() -> Vec<PresetTime> {
    [(60, "1m"), (900, "15m"), (1800, "30m"), (3600, "1h")]
        .into_iter()
        .map(|(seconds, label)| PresetTime {
            label: label.to_string(),
            seconds,
        })
        .collect()
}

/// Per-window user preset list backed by the storage collaborator.
pub struct PresetStore<'a> {
    storage: &'a dyn Storage,
    key: String,
}

impl<'a> PresetStore<'a> {
    pub fn new(storage: &'a dyn Storage, window_id: &str) -> Self {
        Self {
            storage,
            key: window_storage_key(keys::USER_PRESETS, window_id),
        }
    }

    pub fn user_presets(&self) -> Vec<UserPreset> {
        storage::load_json(self.storage, &self.key).unwrap_or_default()
    }

    /// Defaults followed by the window's recent user times.
    pub fn all_presets(&self) -> Vec<PresetTime> {
        let mut presets = default_presets();
        presets.extend(self.user_presets().into_iter().map(|p| PresetTime {
            label: p.label,
            seconds: p.seconds,
        }));
        presets
    }

    /// Record a user-chosen duration. Times matching a default preset are
    /// not recorded; an existing entry just moves to the front. The value
    /// is clamped to the representable range so stored presets always
    /// match the time the timer actually ends up set to.
    pub fn record(&self, seconds: i64) {
        let seconds = seconds.clamp(-MAX_TIME_SECONDS, MAX_TIME_SECONDS);
        if default_presets().iter().any(|p| p.seconds == seconds) {
            return;
        }

        let now = Utc::now().timestamp_millis();
        let mut presets = self.user_presets();

        if let Some(existing) = presets.iter_mut().find(|p| p.seconds == seconds) {
            existing.used_at = now;
        } else {
            presets.insert(
                0,
                UserPreset {
                    label: format_preset_label(seconds),
                    seconds,
                    used_at: now,
                },
            );
        }

        presets.sort_by(|a, b| b.used_at.cmp(&a.used_at));
        presets.truncate(MAX_USER_PRESETS);

        storage::save_json(self.storage, &self.key, &presets);
    }

    pub fn clear(&self) {
        self.storage.remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_default_presets() {
        let defaults = default_presets();
        assert_eq!(defaults.len(), 4);
        assert_eq!(defaults[0], PresetTime { label: "1m".into(), seconds: 60 });
        assert_eq!(defaults[3], PresetTime { label: "1h".into(), seconds: 3600 });
    }

    #[test]
    fn test_record_labels_and_orders_mru() {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(&storage, "timer-1");

        store.record(300);
        store.record(5400);

        let user = store.user_presets();
        assert_eq!(user.len(), 2);
        assert_eq!(user[0].seconds, 5400);
        assert_eq!(user[0].label, "1h 30m");
        assert_eq!(user[1].seconds, 300);
        assert_eq!(user[1].label, "5m");
    }

    #[test]
    fn test_record_caps_list() {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(&storage, "timer-1");

        store.record(120);
        store.record(300);
        store.record(600);

        let user = store.user_presets();
        assert_eq!(user.len(), MAX_USER_PRESETS);
        // Oldest entry fell off
        assert!(user.iter().all(|p| p.seconds != 120));
    }

    #[test]
    fn test_record_clamps_out_of_range_times() {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(&storage, "timer-1");

        store.record(1_000_000_000_000);
        let user = store.user_presets();
        assert_eq!(user.len(), 1);
        // The stored time is the one set_time would actually apply
        assert_eq!(user[0].seconds, MAX_TIME_SECONDS);
        assert_eq!(user[0].label, "99h 59m");

        // A second out-of-range time is the same preset, not a duplicate
        store.record(i64::MAX);
        assert_eq!(store.user_presets().len(), 1);
    }

    #[test]
    fn test_defaults_are_never_recorded() {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(&storage, "timer-1");

        store.record(900);
        store.record(3600);
        assert!(store.user_presets().is_empty());
    }

    #[test]
    fn test_duplicate_refreshes_not_duplicates() {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(&storage, "timer-1");

        store.record(300);
        store.record(600);
        store.record(300);

        let user = store.user_presets();
        assert_eq!(user.len(), 2);
        assert_eq!(user.iter().filter(|p| p.seconds == 300).count(), 1);
    }

    #[test]
    fn test_all_presets_appends_user_entries() {
        let storage = MemoryStorage::new();
        let store = PresetStore::new(&storage, "timer-1");
        store.record(300);

        let all = store.all_presets();
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].seconds, 300);
    }

    #[test]
    fn test_stores_are_scoped_per_window() {
        let storage = MemoryStorage::new();
        PresetStore::new(&storage, "timer-1").record(300);
        assert!(PresetStore::new(&storage, "timer-2").user_presets().is_empty());
    }
}
