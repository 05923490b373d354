//! Deferred actions on a simulated clock.
//!
//! The controller schedules gate reopening, wall-run gravity re-enable and
//! queue re-checks here. The service is owned by the controller and only
//! advances inside [`ParkourController::update`](crate::controller::ParkourController::update),
//! so every callback runs on the same logical thread as the frame update and
//! nothing can fire after the controller is dropped.

use std::time::Duration;

use bevy::prelude::*;

use crate::gates::Gate;

/// Work to run when a timer fires.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Reopen a gate after its debounce delay.
    OpenGate(Gate),
    /// Re-evaluate whether wall-run gravity applies.
    EnableWallRunGravity,
    /// Start a queued slide or sprint, if any.
    CheckQueues,
}

/// Identifies a scheduled timer.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTimer {
    handle: TimerHandle,
    timer: Timer,
    action: DeferredAction,
}

/// Single-threaded timer service driven by explicit time steps.
///
/// There is no cancellation: a scheduled action always fires once its delay
/// has elapsed. Every action the controller schedules is idempotent.
#[derive(Debug, Clone, Default)]
pub struct TimerService {
    elapsed: Duration,
    next_handle: u64,
    pending: Vec<ScheduledTimer>,
}

impl TimerService {
    /// Create an empty service at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run after `delay_secs`.
    ///
    /// A zero delay fires on the next call to [`advance`](Self::advance),
    /// never synchronously. Repeating timers with a zero delay are scheduled
    /// as one-shots.
    pub fn schedule(&mut self, delay_secs: f32, action: DeferredAction, repeating: bool) -> TimerHandle {
        let delay = Duration::try_from_secs_f32(delay_secs.max(0.0)).unwrap_or(Duration::ZERO);
        let mode = if repeating && !delay.is_zero() {
            TimerMode::Repeating
        } else {
            TimerMode::Once
        };

        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        trace!("scheduled {action:?} in {delay_secs}s ({handle:?})");

        self.pending.push(ScheduledTimer {
            handle,
            timer: Timer::new(delay, mode),
            action,
        });
        handle
    }

    /// Advance the clock and return every action that became due, ordered by
    /// due time and then by scheduling order.
    pub fn advance(&mut self, delta: Duration) -> Vec<DeferredAction> {
        let start = self.elapsed;
        self.elapsed += delta;

        let mut fired: Vec<(Duration, TimerHandle, DeferredAction)> = Vec::new();
        self.pending.retain_mut(|entry| {
            let first_due = start + entry.timer.remaining();
            entry.timer.tick(delta);
            if !entry.timer.just_finished() {
                return true;
            }

            let period = entry.timer.duration();
            for n in 0..entry.timer.times_finished_this_tick() {
                fired.push((first_due + period * n, entry.handle, entry.action));
            }
            entry.timer.mode() == TimerMode::Repeating
        });

        fired.sort_by_key(|(due, handle, _)| (*due, *handle));
        fired.into_iter().map(|(_, _, action)| action).collect()
    }

    /// Whether a timer is still waiting to fire (one-shots) or still active
    /// (repeating).
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|entry| entry.handle == handle)
    }

    /// Number of timers still waiting.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total simulated time advanced so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
