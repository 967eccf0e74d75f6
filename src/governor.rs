// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window request governor.
//!
//! A window opens on the first acquisition after the previous one closed.
//! Opening a window schedules a single reset task on the Tokio runtime; when
//! it fires, the budget is refilled to capacity, the window is closed and any
//! blocked callers are woken.
//!
//! Only the caller that wins the compare-and-swap on the active flag may open
//! a window, so concurrent callers never schedule more than one reset. If the
//! reset task is lost with its runtime, the next acquisition after the deadline
//! closes the window itself.

use crate::config::RateLimitConfig;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Outcome of a permit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    /// A permit was taken
    Granted {
        /// Permits left in the current window
        remaining: u32,
    },
    /// The window budget is exhausted
    Denied {
        /// Time until the current window resets
        retry_after: Duration,
    },
}

impl Permit {
    pub fn is_granted(&self) -> bool {
        matches!(self, Permit::Granted { .. })
    }
}

/// Lifetime counters, mostly useful for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GovernorStats {
    /// Windows opened (one reset task scheduled per window)
    pub windows_started: u64,
    /// Windows closed and refilled
    pub resets_fired: u64,
}

/// State shared with the reset task.
#[derive(Debug)]
struct WindowState {
    capacity: u32,
    window: Duration,
    remaining: AtomicU32,
    active: AtomicBool,
    epoch: Instant,
    /// Window start, as nanoseconds since `epoch`
    started_at: AtomicU64,
    windows_started: AtomicU64,
    resets_fired: AtomicU64,
    replenished: Notify,
}

impl WindowState {
    /// Take one permit without ever going below zero.
    fn take(&self) -> Option<u32> {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .ok()
            .map(|prev| prev - 1)
    }

    fn reset(&self) {
        // Refill before closing so a caller that observes the closed window
        // also observes the full budget.
        self.remaining.store(self.capacity, Ordering::Release);
        self.active.store(false, Ordering::Release);
        self.resets_fired.fetch_add(1, Ordering::Relaxed);
        debug!(capacity = self.capacity, "Rate window reset");
        self.replenished.notify_waiters();
    }

    fn time_until_reset(&self) -> Duration {
        if !self.active.load(Ordering::Acquire) {
            return Duration::ZERO;
        }
        let started = Duration::from_nanos(self.started_at.load(Ordering::Acquire));
        let elapsed = self.epoch.elapsed().saturating_sub(started);
        self.window.saturating_sub(elapsed)
    }
}

/// Thread-safe fixed-window rate governor.
///
/// Cloning is not supported; share it behind an `Arc` or inside the client
/// that owns it. Dropping the governor aborts a pending reset task.
#[derive(Debug)]
pub struct RateGovernor {
    state: Arc<WindowState>,
    /// Reset task of the current window
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl RateGovernor {
    /// Create a governor granting at most `capacity` permits per `window`.
    pub fn new(capacity: u32, window: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("rate limit capacity must be positive"));
        }
        if window.is_zero() {
            return Err(Error::config("rate limit window must be positive"));
        }

        Ok(Self {
            state: Arc::new(WindowState {
                capacity,
                window,
                remaining: AtomicU32::new(capacity),
                active: AtomicBool::new(false),
                epoch: Instant::now(),
                started_at: AtomicU64::new(0),
                windows_started: AtomicU64::new(0),
                resets_fired: AtomicU64::new(0),
                replenished: Notify::new(),
            }),
            timer: Mutex::new(None),
        })
    }

    /// Create a governor from rate limit configuration.
    pub fn from_config(config: &RateLimitConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.window_duration())
    }

    /// Try to take a permit without waiting.
    ///
    /// # Panics
    ///
    /// Opening a window spawns the reset task, so this must be called from
    /// within a Tokio runtime.
    pub fn try_acquire(&self) -> Permit {
        self.expire_stranded_window();
        self.open_window_if_idle();

        match self.state.take() {
            Some(remaining) => {
                trace!(remaining, "Permit granted");
                Permit::Granted { remaining }
            }
            None => {
                let retry_after = self.state.time_until_reset();
                trace!(?retry_after, "Permit denied");
                Permit::Denied { retry_after }
            }
        }
    }

    /// Take a permit, waiting for the next window if the budget is exhausted.
    ///
    /// Returns the number of permits left in the window. The future can be
    /// dropped at any point without consuming a permit.
    pub async fn acquire(&self) -> u32 {
        loop {
            let replenished = self.state.replenished.notified();
            tokio::pin!(replenished);
            // Register before checking so a reset between the check and the
            // await still wakes us.
            replenished.as_mut().enable();

            if let Permit::Granted { remaining } = self.try_acquire() {
                return remaining;
            }

            trace!(
                retry_after = ?self.state.time_until_reset(),
                "Waiting for rate window reset"
            );
            replenished.await;
        }
    }

    /// Like [`acquire`](Self::acquire), but gives up after `timeout`.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Permit {
        match tokio::time::timeout(timeout, self.acquire()).await {
            Ok(remaining) => Permit::Granted { remaining },
            Err(_) => Permit::Denied {
                retry_after: self.state.time_until_reset(),
            },
        }
    }

    pub fn capacity(&self) -> u32 {
        self.state.capacity
    }

    pub fn window(&self) -> Duration {
        self.state.window
    }

    /// Permits left before the budget is exhausted.
    pub fn remaining(&self) -> u32 {
        self.state.remaining.load(Ordering::Acquire)
    }

    /// Whether a window is open and its reset is pending.
    pub fn is_window_active(&self) -> bool {
        self.state.active.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> GovernorStats {
        GovernorStats {
            windows_started: self.state.windows_started.load(Ordering::Relaxed),
            resets_fired: self.state.resets_fired.load(Ordering::Relaxed),
        }
    }

    fn open_window_if_idle(&self) {
        if self.state.active.load(Ordering::Acquire) {
            return;
        }

        // Claimed under the timer lock: a later window cannot overwrite the
        // handle before this one is stored, and the stranded window check
        // never sees a claimed window without its start time.
        let mut timer = self.timer.lock();
        if self
            .state
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let now = Instant::now();
        let deadline = now + self.state.window;
        let started = now.saturating_duration_since(self.state.epoch).as_nanos() as u64;
        self.state.started_at.store(started, Ordering::Release);
        self.state.windows_started.fetch_add(1, Ordering::Relaxed);
        debug!(
            capacity = self.state.capacity,
            window = ?self.state.window,
            "Rate window opened"
        );

        let state: Weak<WindowState> = Arc::downgrade(&self.state);
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(state) = state.upgrade() {
                state.reset();
            }
        }));
    }

    /// Close an expired window whose reset task is gone.
    ///
    /// The task is lost when the runtime that spawned it shuts down before the
    /// deadline. A task that ran normally has already closed its window, so a
    /// finished handle next to an active window means the reset never happened.
    fn expire_stranded_window(&self) {
        if !self.state.active.load(Ordering::Acquire) || !self.state.time_until_reset().is_zero() {
            return;
        }

        let timer = self.timer.lock();
        let stranded = timer.as_ref().map_or(true, JoinHandle::is_finished);
        if stranded
            && self.state.active.load(Ordering::Acquire)
            && self.state.time_until_reset().is_zero()
        {
            debug!("Reset task is gone, closing expired window inline");
            self.state.reset();
        }
    }

    /// Abort the pending reset task. Returns true if one was still running.
    fn cancel_timer(&self) -> bool {
        match self.timer.lock().take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for RateGovernor {
    fn drop(&mut self) {
        if self.cancel_timer() {
            debug!("Cancelled pending rate window reset");
        }
    }
}
