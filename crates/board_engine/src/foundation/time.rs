//! Time management utilities

use std::time::{Duration, Instant};

/// Fixed simulation step fed by variable frame times
///
/// Frame time is accumulated and converted into a whole number of fixed
/// ticks, so the board simulation always advances by the same `delta`.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    accumulator: f32,
    tick_count: u64,
}

impl FixedTimestep {
    /// Create a timestep running at `ticks_per_second`
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            step: 1.0 / ticks_per_second.max(1) as f32,
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    /// Length of one tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total ticks handed out so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Add elapsed frame time and return how many ticks are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed.as_secs_f32();
        let mut due = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            due += 1;
        }
        self.tick_count += u64::from(due);
        due
    }
}

/// Simple stopwatch for measuring elapsed wall time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub const fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timestep_carries_remainder() {
        let mut timestep = FixedTimestep::new(10);
        assert_eq!(timestep.advance(Duration::from_millis(250)), 2);
        // 50ms left over, 60ms more completes one tick
        assert_eq!(timestep.advance(Duration::from_millis(60)), 1);
        assert_eq!(timestep.tick_count(), 3);
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let timestep = FixedTimestep::new(0);
        assert!((timestep.step() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_stopwatch_accumulates() {
        let mut stopwatch = Stopwatch::start_new();
        stopwatch.stop();
        let first = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), first);
    }
}
