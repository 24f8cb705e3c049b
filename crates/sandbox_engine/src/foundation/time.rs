//! Time management utilities

use std::time::Instant;

/// Frame clock owned by the render loop
///
/// Advanced exactly once per loop iteration. `time_since_start` is the sum of
/// every delta handed out, so it never goes backwards.
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    time_since_start: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            time_since_start: 0.0,
            frame_count: 0,
        }
    }

    /// Measure wall time since the previous tick and advance by it
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by an explicit delta in seconds
    ///
    /// Negative deltas are treated as zero.
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.delta_time = delta_time.max(0.0);
        self.time_since_start += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since the clock was created
    pub fn time_since_start(&self) -> f32 {
        self.time_since_start
    }

    /// Get the number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Frame-rate statistics accumulated over a reporting interval
///
/// Frames and elapsed time are summed until the interval is reached, then a
/// whole-number FPS figure is produced and the accumulators restart.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: f32,
    accumulated_time: f32,
    frame_count: u32,
}

impl FpsCounter {
    /// Default reporting interval in seconds
    pub const DEFAULT_INTERVAL: f32 = 0.5;

    /// Create a counter reporting every `interval` seconds
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated_time: 0.0,
            frame_count: 0,
        }
    }

    /// Record one frame; returns the FPS once the interval has elapsed
    pub fn record_frame(&mut self, delta_time: f32) -> Option<u32> {
        self.frame_count += 1;
        self.accumulated_time += delta_time;

        if self.accumulated_time < self.interval {
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let fps = (self.frame_count as f32 / self.accumulated_time) as u32;
        self.accumulated_time = 0.0;
        self.frame_count = 0;
        Some(fps)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_accumulates_deltas() {
        let mut clock = FrameClock::new();
        clock.advance(0.25);
        clock.advance(0.5);

        assert_relative_eq!(clock.delta_time(), 0.5);
        assert_relative_eq!(clock.time_since_start(), 0.75);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        clock.advance(-3.0);

        assert_relative_eq!(clock.time_since_start(), 1.0);
        assert!(clock.tick() >= 0.0);
    }

    #[test]
    fn test_fps_reported_every_half_second() {
        let mut counter = FpsCounter::default();

        // 0.1s frames: nothing until the fifth frame pushes us to 0.5s
        for _ in 0..4 {
            assert_eq!(counter.record_frame(0.1), None);
        }
        assert_eq!(counter.record_frame(0.1001), Some(9));

        // Accumulators restarted
        assert_eq!(counter.record_frame(0.1), None);
    }
}
