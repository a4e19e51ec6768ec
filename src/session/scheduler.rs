use std::future;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Repeating tick source owned by a session.
///
/// A scheduler holds at most one timer. `start` replaces any running timer,
/// so two stepping loops can never exist for the same session.
pub trait Scheduler {
    /// Cancel any active timer, then fire every `period` until cancelled
    fn start(&mut self, period: Duration);

    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Tokio interval backed scheduler used by the terminal app
#[derive(Debug, Default)]
pub struct TickTimer {
    interval: Option<Interval>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next tick. Never resolves while no timer is active.
    ///
    /// Cancel safe, so it can be raced in `tokio::select!`.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}

impl Scheduler for TickTimer {
    fn start(&mut self, period: Duration) {
        self.cancel();

        // First tick one full period from now, late ticks are not replayed
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn cancel(&mut self) {
        self.interval = None;
    }

    fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}

/// Scheduler without a clock; tests fire ticks by calling the session directly
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ManualScheduler {
    period: Option<Duration>,
    /// Number of timers ever started
    pub starts: usize,
    /// Number of times an active timer was cancelled
    pub cancels: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, period: Duration) {
        self.cancel();
        self.period = Some(period);
        self.starts += 1;
    }

    fn cancel(&mut self) {
        if self.period.take().is_some() {
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.period.is_some()
    }
}
