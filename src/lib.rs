//! Overtimer - a state-managed timer service for always-on-top countdown
//! widgets
//!
//! Each "window" is an independent countdown/count-up timer with its own
//! persisted state, title, theme, and recent presets. The timer core is a
//! pure reducer; a per-window controller drives it, a per-window task ticks
//! it, and an HTTP surface carries the UI gestures.

pub mod api;
pub mod config;
pub mod presets;
pub mod registry;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod theme;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use timer::{TimerController, TimerMode, TimerState, TimerStatus};
pub use utils::signals::shutdown_signal;
