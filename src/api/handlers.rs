//! HTTP endpoint handlers
//!
//! The UI layer forwards discrete gestures here; every gesture resolves to a
//! controller operation followed by a registry sync and a fresh snapshot.
//! The core operations are total, so the only error taxonomy at this
//! boundary is "no such window" and "bad segment name".

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::presets::PresetStore;
use crate::registry;
use crate::state::{AppState, TimerWindow};
use crate::theme::{next_theme, COLOR_THEMES, DEFAULT_THEME_ID};
use crate::timer::TimeSegmentKey;

use super::responses::{
    AdjustSegmentRequest, ApiResponse, CreateWindowRequest, EntryRequest, GeometryRequest,
    HealthResponse, NavigateRequest, PresetsResponse, ServerStatusResponse, SetSegmentRequest,
    SetTimeRequest, ThemeRequest, ThemesResponse, TitleRequest, WindowListResponse,
};

fn lookup_window(state: &AppState, id: &str) -> Result<Arc<TimerWindow>, StatusCode> {
    match state.window(id) {
        Ok(Some(window)) => Ok(window),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to look up window {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn parse_segment(segment: &str) -> Result<TimeSegmentKey, StatusCode> {
    segment.parse().map_err(|e: String| {
        error!("{}", e);
        StatusCode::BAD_REQUEST
    })
}

/// Sync the registry and answer with a fresh snapshot of the window.
fn gesture_response(
    state: &AppState,
    window: &TimerWindow,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    state.sync_registry(window);
    match window.snapshot() {
        Ok(snapshot) => Ok(Json(ApiResponse::ok(message, snapshot))),
        Err(e) => {
            error!("Failed to snapshot window {}: {}", window.id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn run_gesture<R>(
    state: &AppState,
    window: &TimerWindow,
    message: &str,
    op: impl FnOnce(&mut crate::timer::TimerController) -> R,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = window.with_controller(op) {
        error!("Gesture failed on window {}: {}", window.id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    gesture_response(state, window, message)
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Handle GET /status - Server-level status
pub async fn server_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServerStatusResponse>, StatusCode> {
    let open_windows = state.window_ids().map_err(|e| {
        error!("Failed to list windows: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ServerStatusResponse {
        open_windows,
        uptime: state.get_uptime(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Handle GET /windows - All live windows plus the persisted registry
pub async fn list_windows_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WindowListResponse>, StatusCode> {
    let ids = state.window_ids().map_err(|e| {
        error!("Failed to list windows: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let mut windows = Vec::with_capacity(ids.len());
    for id in ids {
        let window = lookup_window(&state, &id)?;
        match window.snapshot() {
            Ok(snapshot) => windows.push(snapshot),
            Err(e) => {
                error!("Failed to snapshot window {}: {}", id, e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    }

    Ok(Json(WindowListResponse {
        windows,
        registry: registry::load_registry(state.storage.as_ref()),
    }))
}

/// Handle POST /windows - Open a new timer window
pub async fn create_window_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateWindowRequest>>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let id = body.and_then(|Json(req)| req.id);

    let window = match state.open_window(id.as_deref()) {
        Ok(window) => window,
        Err(e) if e.contains("already open") => {
            info!("Rejected window creation: {}", e);
            return Err(StatusCode::CONFLICT);
        }
        Err(e) => {
            error!("Failed to open window: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let response = gesture_response(&state, &window, "Window opened")?;
    Ok((StatusCode::CREATED, response))
}

/// Handle DELETE /windows/:id - Close a window
pub async fn close_window_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    match state.close_window(&id) {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to close window {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /windows/:id/status - Snapshot one window
pub async fn window_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    match window.snapshot() {
        Ok(snapshot) => Ok(Json(ApiResponse::ok("Window status", snapshot))),
        Err(e) => {
            error!("Failed to snapshot window {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /windows/:id/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Timer started", |c| c.start())
}

/// Handle POST /windows/:id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Timer paused", |c| c.pause())
}

/// Handle POST /windows/:id/toggle - The spacebar gesture
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Timer toggled", |c| c.toggle())
}

/// Handle POST /windows/:id/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Timer reset", |c| c.reset())
}

/// Handle PUT /windows/:id/time - Set a new duration (preset or direct)
pub async fn set_time_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SetTimeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    info!("Setting window {} to {} seconds", id, req.seconds);

    // User-chosen times feed the recent-presets list
    PresetStore::new(state.storage.as_ref(), &id).record(req.seconds);
    run_gesture(&state, &window, "Time set", |c| c.set_time(req.seconds))
}

/// Handle POST /windows/:id/segments/:segment/adjust - Arrow up/down
pub async fn adjust_segment_handler(
    State(state): State<Arc<AppState>>,
    Path((id, segment)): Path<(String, String)>,
    Json(req): Json<AdjustSegmentRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    let segment = parse_segment(&segment)?;
    let delta = req.delta * req.multiplier.unwrap_or(1);
    run_gesture(&state, &window, "Segment adjusted", |c| {
        c.adjust_segment(segment, delta)
    })
}

/// Handle PUT /windows/:id/segments/:segment - Absolute segment set
pub async fn set_segment_handler(
    State(state): State<Arc<AppState>>,
    Path((id, segment)): Path<(String, String)>,
    Json(req): Json<SetSegmentRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    let segment = parse_segment(&segment)?;
    run_gesture(&state, &window, "Segment set", |c| {
        c.set_segment(segment, req.value)
    })
}

/// Handle POST /windows/:id/edit/:segment - Click-to-edit a segment
pub async fn start_edit_handler(
    State(state): State<Arc<AppState>>,
    Path((id, segment)): Path<(String, String)>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    let segment = parse_segment(&segment)?;
    run_gesture(&state, &window, "Editing started", |c| {
        c.start_editing(segment)
    })
}

/// Handle POST /windows/:id/edit/entry - Typed digits for the edited segment
pub async fn edit_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Entry buffered", |c| c.type_entry(&req.text))
}

/// Handle POST /windows/:id/edit/navigate - Arrow left/right between segments
pub async fn edit_navigate_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<NavigateRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Editing moved", |c| c.navigate(req.direction))
}

/// Handle POST /windows/:id/edit/commit - Blur/Enter/Tab
pub async fn edit_commit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Edit committed", |c| c.stop_editing(true))
}

/// Handle POST /windows/:id/edit/cancel - Escape, discards typed input
pub async fn edit_cancel_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Edit cancelled", |c| c.stop_editing(false))
}

/// Handle PUT /windows/:id/title
pub async fn set_title_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<TitleRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    if let Err(e) = window.set_title(&req.title) {
        error!("Failed to set title on window {}: {}", id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    gesture_response(&state, &window, "Title updated")
}

/// Handle PUT /windows/:id/theme
pub async fn set_theme_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ThemeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    if let Err(e) = window.set_theme(&req.theme_id) {
        error!("Failed to set theme on window {}: {}", id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    gesture_response(&state, &window, "Theme updated")
}

/// Handle POST /windows/:id/theme/next - Cycle through the theme table
pub async fn next_theme_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    let result = window
        .theme_id()
        .and_then(|current| window.set_theme(next_theme(&current).id));
    if let Err(e) = result {
        error!("Failed to cycle theme on window {}: {}", id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    gesture_response(&state, &window, "Theme cycled")
}

/// Handle POST /windows/:id/mode/toggle - Countdown <-> count-up
pub async fn toggle_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    run_gesture(&state, &window, "Mode toggled", |c| {
        c.toggle_mode();
    })
}

/// Handle GET /themes - The color pairing table
pub async fn themes_handler() -> Json<ThemesResponse> {
    Json(ThemesResponse {
        themes: COLOR_THEMES.to_vec(),
        default_theme_id: DEFAULT_THEME_ID,
    })
}

/// Handle GET /windows/:id/presets
pub async fn presets_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PresetsResponse>, StatusCode> {
    lookup_window(&state, &id)?;
    let store = PresetStore::new(state.storage.as_ref(), &id);
    Ok(Json(PresetsResponse {
        presets: store.all_presets(),
        user_presets: store.user_presets(),
    }))
}

/// Handle PUT /windows/:id/geometry - Position/size report from the shell
pub async fn set_geometry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<GeometryRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let window = lookup_window(&state, &id)?;
    registry::update_geometry(
        state.storage.as_ref(),
        &id,
        req.x,
        req.y,
        req.width,
        req.height,
    );
    match window.snapshot() {
        Ok(snapshot) => Ok(Json(ApiResponse::ok("Geometry updated", snapshot))),
        Err(e) => {
            error!("Failed to snapshot window {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
