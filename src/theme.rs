//! Color theme configuration
//!
//! The display color is a pure function of timer status: running and overtime
//! take their colors from the active theme pair, paused and idle use a static
//! neutral. The core only exposes status; the mapping lives here so callers
//! can recolor without touching the state machine.

use serde::Serialize;

/// A running/overtime color pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub running: &'static str,
    pub overtime: &'static str,
}

/// Available color themes (8 pairs).
pub const COLOR_THEMES: [ColorTheme; 8] = [
    ColorTheme { id: "green-red", name: "Green / Red", running: "#22c55e", overtime: "#ef4444" },
    ColorTheme { id: "blue-orange", name: "Blue / Orange", running: "#3b82f6", overtime: "#f97316" },
    ColorTheme { id: "cyan-magenta", name: "Cyan / Magenta", running: "#06b6d4", overtime: "#ec4899" },
    ColorTheme { id: "purple-yellow", name: "Purple / Yellow", running: "#8b5cf6", overtime: "#eab308" },
    ColorTheme { id: "teal-coral", name: "Teal / Coral", running: "#14b8a6", overtime: "#f87171" },
    ColorTheme { id: "lime-pink", name: "Lime / Pink", running: "#84cc16", overtime: "#f472b6" },
    ColorTheme { id: "sky-amber", name: "Sky / Amber", running: "#0ea5e9", overtime: "#f59e0b" },
    ColorTheme { id: "emerald-rose", name: "Emerald / Rose", running: "#10b981", overtime: "#fb7185" },
];

pub const DEFAULT_THEME_ID: &str = "green-red";

/// Color shown while paused or idle, independent of theme.
pub const PAUSED_COLOR: &str = "#6b7280";

/// Look up a theme by id, falling back to the first theme.
pub fn theme_by_id(id: &str) -> &'static ColorTheme {
    COLOR_THEMES
        .iter()
        .find(|t| t.id == id)
        .unwrap_or(&COLOR_THEMES[0])
}

/// The theme after `id` in the table, wrapping around. Used by the
/// theme-cycling gesture.
pub fn next_theme(id: &str) -> &'static ColorTheme {
    let index = COLOR_THEMES.iter().position(|t| t.id == id).unwrap_or(0);
    &COLOR_THEMES[(index + 1) % COLOR_THEMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        assert_eq!(theme_by_id("teal-coral").running, "#14b8a6");
        assert_eq!(theme_by_id("nonsense").id, "green-red");
        assert_eq!(theme_by_id(DEFAULT_THEME_ID).id, "green-red");
    }

    #[test]
    fn test_next_theme_wraps() {
        assert_eq!(next_theme("green-red").id, "blue-orange");
        assert_eq!(next_theme("emerald-rose").id, "green-red");
        assert_eq!(next_theme("unknown").id, "blue-orange");
    }

    #[test]
    fn test_theme_serializes_for_listing() {
        let json = serde_json::to_value(theme_by_id("green-red")).unwrap();
        assert_eq!(json["id"], "green-red");
        assert_eq!(json["name"], "Green / Red");
        assert_eq!(json["running"], "#22c55e");
        assert_eq!(json["overtime"], "#ef4444");
    }

    #[test]
    fn test_theme_ids_are_unique() {
        for (i, a) in COLOR_THEMES.iter().enumerate() {
            for b in &COLOR_THEMES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
