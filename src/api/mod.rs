//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(server_status_handler))
        .route("/themes", get(themes_handler))
        .route("/windows", get(list_windows_handler).post(create_window_handler))
        .route("/windows/:id", delete(close_window_handler))
        .route("/windows/:id/status", get(window_status_handler))
        .route("/windows/:id/start", post(start_handler))
        .route("/windows/:id/pause", post(pause_handler))
        .route("/windows/:id/toggle", post(toggle_handler))
        .route("/windows/:id/reset", post(reset_handler))
        .route("/windows/:id/time", put(set_time_handler))
        .route("/windows/:id/segments/:segment/adjust", post(adjust_segment_handler))
        .route("/windows/:id/segments/:segment", put(set_segment_handler))
        // Static edit routes take precedence over the segment parameter
        .route("/windows/:id/edit/entry", post(edit_entry_handler))
        .route("/windows/:id/edit/navigate", post(edit_navigate_handler))
        .route("/windows/:id/edit/commit", post(edit_commit_handler))
        .route("/windows/:id/edit/cancel", post(edit_cancel_handler))
        .route("/windows/:id/edit/:segment", post(start_edit_handler))
        .route("/windows/:id/title", put(set_title_handler))
        .route("/windows/:id/theme", put(set_theme_handler))
        .route("/windows/:id/theme/next", post(next_theme_handler))
        .route("/windows/:id/mode/toggle", post(toggle_mode_handler))
        .route("/windows/:id/presets", get(presets_handler))
        .route("/windows/:id/geometry", put(set_geometry_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
