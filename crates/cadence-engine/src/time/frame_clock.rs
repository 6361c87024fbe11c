use std::time::{Duration, Instant};

/// Host timing snapshot handed to a timing callback.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Milliseconds since the clock origin. Never decreases.
    pub timestamp_ms: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Host clock producing `FrameTime` snapshots.
///
/// `FrameClock` is the timestamp source of a host loop (one per window or per paced
/// loop). It does not clamp anything: elapsed-time policy belongs to the
/// [`FrameDriver`](super::FrameDriver), which only needs non-decreasing timestamps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    origin: Instant,
    last: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last: now,
            frame_index: 0,
        }
    }

    /// Restarts the timeline at zero.
    ///
    /// Only call this while no driver is fed from the clock, or restart the driver
    /// afterwards: timestamps jump backwards across a reset.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.origin = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        // `Instant` is monotonic on supported platforms; keep the guarantee regardless.
        let now = Instant::now().max(self.last);
        self.last = now;

        let ft = FrameTime {
            timestamp_ms: to_ms(now.saturating_duration_since(self.origin)),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn to_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_never_decrease() {
        let mut clock = FrameClock::new();
        let mut prev = clock.tick();
        assert!(prev.timestamp_ms >= 0.0);

        for _ in 0..1_000 {
            let ft = clock.tick();
            assert!(ft.timestamp_ms >= prev.timestamp_ms);
            assert_eq!(ft.frame_index, prev.frame_index + 1);
            prev = ft;
        }
    }

    #[test]
    fn tick_tracks_sleep() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        std::thread::sleep(Duration::from_millis(5));
        let b = clock.tick();
        assert!(b.timestamp_ms - a.timestamp_ms >= 5.0);
    }

    #[test]
    fn reset_restarts_frame_index() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.tick().frame_index, 0);
    }
}
