//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presets::{PresetTime, UserPreset};
use crate::registry::RegistryEntry;
use crate::state::WindowSnapshot;
use crate::theme::ColorTheme;
use crate::timer::NavDirection;

/// Response envelope for window gesture endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub window: WindowSnapshot,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>, window: WindowSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            window,
        }
    }
}

/// Server-level status.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatusResponse {
    pub open_windows: Vec<String>,
    pub uptime: String,
    pub version: String,
}

/// All live windows plus the persisted registry (geometry included).
#[derive(Debug, Clone, Serialize)]
pub struct WindowListResponse {
    pub windows: Vec<WindowSnapshot>,
    pub registry: Vec<RegistryEntry>,
}

/// The color pairing table, for theme pickers.
#[derive(Debug, Clone, Serialize)]
pub struct ThemesResponse {
    pub themes: Vec<ColorTheme>,
    pub default_theme_id: &'static str,
}

/// Presets available in one window.
#[derive(Debug, Clone, Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<PresetTime>,
    pub user_presets: Vec<UserPreset>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWindowRequest {
    /// Explicit window id; omitted ids are generated.
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetTimeRequest {
    pub seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjustSegmentRequest {
    pub delta: i64,
    /// Modifier-key multiplier (10 while shift is held); defaults to 1.
    pub multiplier: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetSegmentRequest {
    pub value: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    pub direction: NavDirection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeRequest {
    pub theme_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeometryRequest {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
}
