//! One-second tick source.
//!
//! The driver only knows whether it is running. Ticks are pulled with
//! [`ClockDriver::next_tick`], so a caller awaiting it in a loop can never
//! have two ticks in flight.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct ClockDriver {
    period: Duration,
    interval: Option<Interval>,
}

impl ClockDriver {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Begin emitting ticks, the first one a full period from now.
    ///
    /// Restarting a running clock realigns it to now.
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        // No catch-up bursts after a stall.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Stop emitting ticks. Takes effect immediately.
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Returns `None` at once when stopped.
    pub async fn next_tick(&mut self) -> Option<Instant> {
        match self.interval.as_mut() {
            Some(interval) => Some(interval.tick().await),
            None => None,
        }
    }
}

impl Default for ClockDriver {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}
