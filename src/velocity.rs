//! Monotonic time source and exponentially smoothed velocity.

#[cfg(test)]
#[path = "velocity_test.rs"]
mod velocity_test;

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::consts::{MS_PER_SEC, VELOCITY_DECAY};
use crate::geometry::Point;

/// A monotonic time source. `now` is measured from an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock monotonic time backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test (or the replay tool) can
/// keep a handle and advance the clock the recognizer reads from.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + Duration::from_millis(ms));
    }

    /// Jump to an absolute time in milliseconds.
    pub fn set_ms(&self, ms: u64) {
        self.now.set(Duration::from_millis(ms));
    }

    /// Current time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        duration_ms(self.now.get())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Measures time since it was last (re)started. Invalid until first started.
#[derive(Debug, Clone)]
pub struct ElapsedTimer<C: Clock> {
    clock: C,
    started: Option<Duration>,
}

impl<C: Clock> ElapsedTimer<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, started: None }
    }

    pub fn start(&mut self) {
        self.started = Some(self.clock.now());
    }

    /// Restart the timer, returning the milliseconds elapsed since the
    /// previous start. Returns `None` (and starts the timer) if it was invalid.
    pub fn restart(&mut self) -> Option<u64> {
        let now = self.clock.now();
        let elapsed = self.started.map(|start| duration_ms(now.saturating_sub(start)));
        self.started = Some(now);
        elapsed
    }

    /// Milliseconds since the last (re)start, or `None` while invalid.
    #[must_use]
    pub fn elapsed(&self) -> Option<u64> {
        self.started
            .map(|start| duration_ms(self.clock.now().saturating_sub(start)))
    }

    pub fn invalidate(&mut self) {
        self.started = None;
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.started.is_some()
    }
}

/// Per-second velocity smoothed over successive positional deltas.
///
/// Each sample halves the running velocity and adds the new instantaneous
/// velocity, so older motion fades geometrically.
#[derive(Debug, Clone)]
pub struct VelocityEstimator<C: Clock> {
    velocity: Point,
    timer: ElapsedTimer<C>,
}

impl<C: Clock> VelocityEstimator<C> {
    pub fn new(clock: C) -> Self {
        Self { velocity: Point::ZERO, timer: ElapsedTimer::new(clock) }
    }

    /// The current smoothed velocity, in units per second.
    #[must_use]
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    /// Zero the velocity and (re)start the clock. Called on gesture start.
    pub fn reset(&mut self) {
        self.velocity = Point::ZERO;
        self.timer.start();
    }

    /// Stop the clock. Called on gesture finish; the last velocity is kept
    /// so consumers can read it when handling the finish.
    pub fn stop(&mut self) {
        self.timer.invalidate();
    }

    /// Fold a delta observed over `elapsed_ms` into the velocity.
    ///
    /// Non-positive elapsed times leave the velocity untouched.
    pub fn sample(&mut self, delta: Point, elapsed_ms: i64) -> Point {
        if elapsed_ms > 0 {
            #[allow(clippy::cast_precision_loss)]
            let elapsed = elapsed_ms as f64;
            self.velocity = self.velocity * VELOCITY_DECAY + delta * MS_PER_SEC / elapsed;
        }
        self.velocity
    }

    /// Sample using the time since the previous sample (or since
    /// [`reset`](Self::reset)), restarting the clock.
    pub fn sample_since_last(&mut self, delta: Point) -> Point {
        match self.timer.restart() {
            Some(ms) => self.sample(delta, i64::try_from(ms).unwrap_or(i64::MAX)),
            None => self.velocity,
        }
    }

    /// Milliseconds since the last sample or reset, without restarting the
    /// clock. `None` when no gesture is running.
    #[must_use]
    pub fn msecs_since_update(&self) -> Option<u64> {
        self.timer.elapsed()
    }
}
