//! Per-window tick task
//!
//! One task per window drives the clock. It parks on the window's status
//! watch until the timer enters the ticking set (running or overtime), then
//! fires a 1-second interval; any status change out of that set tears the
//! interval down immediately, so at most one tick source is ever active for
//! a window. Dropping the window ends the task.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error};

use crate::state::window::TimerWindow;
use crate::timer::{TimerStatus, TICK_INTERVAL_MS};

pub async fn window_tick_task(window: Weak<TimerWindow>, mut status_rx: watch::Receiver<TimerStatus>) {
    debug!("Starting tick task");

    loop {
        // Park until the timer is actually ticking
        while !status_rx.borrow_and_update().is_ticking() {
            if status_rx.changed().await.is_err() {
                debug!("Status channel closed, stopping tick task");
                return;
            }
        }

        let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
        // The first interval tick completes immediately; the timer should
        // advance one full interval after starting, not on the start itself.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(window) = window.upgrade() else {
                        debug!("Window dropped, stopping tick task");
                        return;
                    };
                    if let Err(e) = window.tick() {
                        error!("Failed to tick window {}: {}", window.id, e);
                    }
                }

                changed = status_rx.changed() => {
                    if changed.is_err() {
                        debug!("Status channel closed, stopping tick task");
                        return;
                    }
                    if !status_rx.borrow().is_ticking() {
                        // Paused, reset, or editing: drop the interval
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_tick_task_advances_running_timer() {
        let (window, status_rx) = TimerWindow::mount(Arc::new(MemoryStorage::new()), "timer-1", 10);
        let window = Arc::new(window);
        let handle = tokio::spawn(window_tick_task(Arc::downgrade(&window), status_rx));

        window.with_controller(|c| c.start()).unwrap();
        tokio::time::sleep(Duration::from_millis(3 * TICK_INTERVAL_MS + 50)).await;
        let remaining = window.with_controller(|c| c.state().remaining_seconds).unwrap();
        assert_eq!(remaining, 7);

        drop(window);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_disarms_tick_source() {
        let (window, status_rx) = TimerWindow::mount(Arc::new(MemoryStorage::new()), "timer-1", 10);
        let window = Arc::new(window);
        tokio::spawn(window_tick_task(Arc::downgrade(&window), status_rx));

        window.with_controller(|c| c.start()).unwrap();
        tokio::time::sleep(Duration::from_millis(TICK_INTERVAL_MS + 50)).await;
        window.with_controller(|c| c.pause()).unwrap();
        let paused_at = window.with_controller(|c| c.state().remaining_seconds).unwrap();

        tokio::time::sleep(Duration::from_millis(5 * TICK_INTERVAL_MS)).await;
        let remaining = window.with_controller(|c| c.state().remaining_seconds).unwrap();
        assert_eq!(remaining, paused_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_runs_into_overtime() {
        let (window, status_rx) = TimerWindow::mount(Arc::new(MemoryStorage::new()), "timer-1", 1);
        let window = Arc::new(window);
        tokio::spawn(window_tick_task(Arc::downgrade(&window), status_rx));

        window.with_controller(|c| c.start()).unwrap();
        tokio::time::sleep(Duration::from_millis(3 * TICK_INTERVAL_MS + 50)).await;

        let (remaining, status) = window
            .with_controller(|c| (c.state().remaining_seconds, c.status()))
            .unwrap();
        assert_eq!(remaining, -2);
        assert_eq!(status, TimerStatus::Overtime);
    }
}
