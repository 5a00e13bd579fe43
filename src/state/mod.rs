//! State management module
//!
//! The application state (all live windows) and the per-window state bundle.

pub mod app_state;
pub mod window;

pub use app_state::{AppState, MAIN_WINDOW_ID};
pub use window::{TimerWindow, WindowSnapshot, DEFAULT_TITLE};
