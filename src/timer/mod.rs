//! Timer core: conversion utilities, the state-machine reducer, and the
//! per-window controller that drives them.

pub mod controller;
pub mod reducer;
pub mod time;

pub use controller::{NavDirection, TimerController};
pub use reducer::{reduce, TimerAction, TimerMode, TimerState, TimerStatus};
pub use time::{
    format_preset_label, format_segment, format_time_for_display, seconds_to_segments,
    segments_to_seconds, set_segment_value, update_segment_value, DisplayTime, TimeSegmentKey,
    TimeSegments, MAX_TIME_SECONDS, TICK_INTERVAL_MS,
};
