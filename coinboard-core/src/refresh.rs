//! Refresh driver — decides when the next fetch may start.
//!
//! The driver is a plain state machine fed with timestamps; it never reads a
//! clock itself. Ticks that come due while a fetch is still outstanding are
//! skipped rather than queued, so at most one fetch is ever in flight.

use std::ops::ControlFlow;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::data::clock::{elapsed_between, Clock};

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Outcome of polling the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// Start a refresh now.
    Due,
    /// A refresh would be due, but one is still in flight.
    SkipInFlight,
    /// Nothing to do for this long.
    Wait(Duration),
}

#[derive(Debug, Clone)]
pub struct RefreshDriver {
    interval: Duration,
    last_started: Option<DateTime<Utc>>,
    in_flight: bool,
    forced: bool,
}

impl RefreshDriver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_started: None,
            in_flight: false,
            forced: false,
        }
    }

    pub fn poll(&self, now: DateTime<Utc>) -> TickDecision {
        let remaining = match self.last_started {
            _ if self.forced => Duration::ZERO,
            None => Duration::ZERO,
            Some(started) => self
                .interval
                .saturating_sub(elapsed_between(started, now)),
        };

        if !remaining.is_zero() {
            TickDecision::Wait(remaining)
        } else if self.in_flight {
            TickDecision::SkipInFlight
        } else {
            TickDecision::Due
        }
    }

    /// Mark a refresh as started at `now`.
    pub fn begin(&mut self, now: DateTime<Utc>) {
        self.last_started = Some(now);
        self.in_flight = true;
        self.forced = false;
    }

    /// Mark the in-flight refresh as finished, successful or not.
    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    /// Make the next poll due regardless of the interval.
    pub fn force(&mut self) {
        self.forced = true;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_started(&self) -> Option<DateTime<Utc>> {
        self.last_started
    }
}

impl Default for RefreshDriver {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

/// Blocking poll loop: sleep on `clock` until due, then call `on_tick` with
/// the 1-based tick number.
///
/// Stops after `max_ticks` ticks when given, or as soon as `on_tick` breaks.
/// Returns the number of ticks run.
pub fn run_blocking<C, F>(
    driver: &mut RefreshDriver,
    clock: &C,
    max_ticks: Option<u64>,
    mut on_tick: F,
) -> u64
where
    C: Clock + ?Sized,
    F: FnMut(u64) -> ControlFlow<()>,
{
    let mut ticks = 0u64;
    while max_ticks.map_or(true, |max| ticks < max) {
        let now = clock.now();
        match driver.poll(now) {
            TickDecision::Due => {
                driver.begin(now);
                ticks += 1;
                let flow = on_tick(ticks);
                driver.complete();
                if flow.is_break() {
                    break;
                }
            }
            TickDecision::Wait(remaining) => {
                debug!(remaining_ms = remaining.as_millis() as u64, "waiting for next tick");
                clock.sleep(remaining);
            }
            // Unreachable here: each tick completes before the next poll.
            TickDecision::SkipInFlight => driver.complete(),
        }
    }
    ticks
}
