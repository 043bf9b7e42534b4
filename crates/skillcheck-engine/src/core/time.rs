/// Monotonic millisecond time source driving session ticks.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Clock advanced by hand. Used by hosts that push their own timestamps, and by tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    /// Move time forward. Negative steps are ignored to keep the clock monotonic.
    pub fn advance(&mut self, ms: f64) {
        if ms > 0.0 {
            self.now += ms;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of simulation ticks, so
/// per-tick decay and speeds do not depend on the display refresh rate.
#[derive(Debug, Clone)]
pub struct FramePacer {
    /// Length of one tick in milliseconds.
    tick_ms: f64,
    /// Accumulated time from variable frame deltas.
    accumulator: f64,
}

impl FramePacer {
    /// Most ticks a single frame may run; the rest of a long stall is dropped.
    pub const MAX_TICKS_PER_FRAME: u32 = 10;

    pub fn new(tick_ms: f64) -> Self {
        Self {
            tick_ms: tick_ms.max(f64::EPSILON),
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of ticks to run.
    pub fn accumulate(&mut self, frame_ms: f64) -> u32 {
        self.accumulator += frame_ms.max(0.0);
        self.accumulator = self
            .accumulator
            .min(self.tick_ms * Self::MAX_TICKS_PER_FRAME as f64);
        let steps = (self.accumulator / self.tick_ms) as u32;
        self.accumulator -= steps as f64 * self.tick_ms;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.tick_ms
    }

    pub fn tick_ms(&self) -> f64 {
        self.tick_ms
    }

    /// Drop any partial tick, e.g. when a new session starts.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f64 = 1000.0 / 60.0;

    #[test]
    fn one_tick_exact() {
        let mut pacer = FramePacer::new(TICK);
        assert_eq!(pacer.accumulate(TICK), 1);
    }

    #[test]
    fn high_refresh_frames_share_ticks() {
        let mut pacer = FramePacer::new(TICK);
        // 120 Hz: every other frame runs a tick
        let ticks: u32 = (0..120).map(|_| pacer.accumulate(1000.0 / 120.0)).sum();
        assert!((59..=60).contains(&ticks), "ran {} ticks", ticks);
    }

    #[test]
    fn caps_long_stalls() {
        let mut pacer = FramePacer::new(TICK);
        assert_eq!(pacer.accumulate(5000.0), FramePacer::MAX_TICKS_PER_FRAME);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut pacer = FramePacer::new(TICK);
        pacer.accumulate(8.0);
        let a = pacer.alpha();
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
        pacer.reset();
        assert_eq!(pacer.alpha(), 0.0);
    }

    #[test]
    fn manual_clock_never_goes_backwards() {
        let mut clock = ManualClock::new(100.0);
        clock.advance(16.0);
        clock.advance(-50.0);
        assert_eq!(clock.now(), 116.0);
    }
}
