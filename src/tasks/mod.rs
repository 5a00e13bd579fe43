//! Background tasks module
//!
//! One tick task per window runs alongside the HTTP server.

pub mod tick;

pub use tick::window_tick_task;
