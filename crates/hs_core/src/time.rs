//! Fixed-timestep frame timing.
//!
//! Rendering runs at whatever rate the surface presents; simulation consumes
//! fixed 1/60 s slices from a wall-clock accumulator. A frame may therefore
//! run zero, one, or several simulation steps.

use std::time::Instant;

const FIXED_DT: f64 = 1.0 / 60.0;

// Accumulator cap: a stall (debugger, window drag) must not queue up seconds
// of catch-up simulation.
const MAX_ACCUMULATOR: f64 = 0.25;

const FPS_SMOOTHING: f64 = 0.92;

pub struct FrameTimer {
    pub fixed_dt: f64,
    pub fixed_dt_us: u64,
    accumulator: f64,
    pub real_dt: f64,
    pub steps_this_frame: u32,
    pub frame_count: u64,
    last_instant: Instant,
    smoothed_fps: f64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            fixed_dt_us: (FIXED_DT * 1_000_000.0) as u64,
            accumulator: 0.0,
            real_dt: 0.0,
            steps_this_frame: 0,
            frame_count: 0,
            last_instant: Instant::now(),
            smoothed_fps: 60.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > MAX_ACCUMULATOR {
            log::warn!(
                "Frame took {:.0}ms, capping accumulator at {:.0}ms",
                self.real_dt * 1000.0,
                MAX_ACCUMULATOR * 1000.0
            );
            self.real_dt = MAX_ACCUMULATOR;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        if self.real_dt > 0.0 {
            self.smoothed_fps =
                self.smoothed_fps * FPS_SMOOTHING + (1.0 / self.real_dt) * (1.0 - FPS_SMOOTHING);
        }
    }

    /// Consume one fixed slice if enough time has accumulated.
    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> f64 {
        self.smoothed_fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dt_microseconds_match_seconds() {
        let timer = FrameTimer::new();
        let us = (timer.fixed_dt * 1_000_000.0) as u64;
        assert_eq!(timer.fixed_dt_us, us);
    }

    #[test]
    fn steps_drain_accumulator() {
        let mut timer = FrameTimer::new();
        timer.accumulator = timer.fixed_dt * 3.5;

        let mut steps = 0;
        while timer.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert!(timer.accumulator < timer.fixed_dt);
        assert!(timer.accumulator > 0.0);
    }

    #[test]
    fn no_step_without_accumulated_time() {
        let mut timer = FrameTimer::new();
        timer.accumulator = timer.fixed_dt * 0.5;
        assert!(!timer.should_step());
    }
}
