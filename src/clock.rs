use std::fmt::{Display, Formatter};
use std::time::Duration;

use instant::Instant;
use serde::Serialize;

pub const TICK_PERIOD: Duration = Duration::from_millis(100);
const TICK_STEP: f64 = 0.1;

/// Animation time in ticks; its scalar value grows by 0.1 per tick, which
/// makes it read as seconds while the clock keeps pace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AnimationTime(u64);

impl Display for AnimationTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}s", self.seconds())
    }
}

impl AnimationTime {
    /// Time as it stands after the given number of ticks.
    pub fn from_ticks(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Nearest tick count for a value in seconds, used for snapshots.
    pub fn from_seconds(seconds: f32) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::default();
        }
        Self((seconds as f64 / TICK_STEP).round() as u64)
    }

    pub fn ticks(&self) -> u64 {
        self.0
    }

    pub fn seconds(&self) -> f64 {
        self.0 as f64 * TICK_STEP
    }

    fn tick(&mut self) {
        self.0 += 1;
    }
}

/// Fixed-period repeating timer owned by whoever mounts the view.
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    time: AnimationTime,
    next_tick: Option<Instant>,
}

impl AnimationClock {
    pub fn time(&self) -> AnimationTime {
        self.time
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Schedule the first tick one period from `now`. A running clock keeps
    /// its existing schedule.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.next_tick = Some(now + TICK_PERIOD);
        true
    }

    /// Cancel the schedule and forget the accumulated time.
    pub fn stop(&mut self) {
        self.next_tick = None;
        self.time = AnimationTime::default();
    }

    /// Fire at most one tick if the deadline has passed. Periods missed
    /// while the host was busy are dropped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.next_tick else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.time.tick();
        let next = deadline + TICK_PERIOD;
        self.next_tick = Some(if next > now { next } else { now + TICK_PERIOD });
        true
    }
}
