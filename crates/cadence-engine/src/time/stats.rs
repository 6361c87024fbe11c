/// Cumulative counters maintained by the frame driver.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameStats {
    /// Frames that ran (callbacks delivered while the driver was running).
    pub frames: u64,

    /// Simulation steps that completed successfully.
    pub steps: u64,

    /// Frames in which the step cap stopped the update loop.
    pub capped_frames: u64,

    /// Spiral-of-death resets of the accumulator.
    pub overload_resets: u64,

    /// Callbacks whose timestamp went backwards or was not finite.
    pub clock_anomalies: u64,

    /// Simulation time advanced so far, in milliseconds.
    pub simulated_ms: f64,

    /// Accumulator time discarded by overload resets, in milliseconds.
    pub dropped_ms: f64,
}

/// Periodic frames-per-second reporter driven by host timestamps.
///
/// Feed it every frame; it logs one `info` line per elapsed period.
#[derive(Debug, Clone)]
pub struct FpsReporter {
    period_ms: f64,
    window_start_ms: Option<f64>,
    frames: u32,
    steps: u32,
    last_fps: f64,
}

impl FpsReporter {
    /// Creates a reporter with the given period, floored at 250 ms.
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(250.0),
            window_start_ms: None,
            frames: 0,
            steps: 0,
            last_fps: 0.0,
        }
    }

    /// Most recently measured frame rate.
    pub fn fps(&self) -> f64 {
        self.last_fps
    }

    /// Records one frame. Returns the new frame rate when a period elapsed.
    pub fn record(&mut self, timestamp_ms: f64, steps: u32) -> Option<f64> {
        let start = *self.window_start_ms.get_or_insert(timestamp_ms);

        self.frames += 1;
        self.steps += steps;

        let elapsed = timestamp_ms - start;
        if elapsed < self.period_ms {
            return None;
        }

        let secs = (elapsed / 1000.0).max(0.0001);
        self.last_fps = self.frames as f64 / secs;

        log::info!(
            "fps={:.1} ups={:.1} frames={} steps={}",
            self.last_fps,
            self.steps as f64 / secs,
            self.frames,
            self.steps
        );

        self.window_start_ms = Some(timestamp_ms);
        self.frames = 0;
        self.steps = 0;

        Some(self.last_fps)
    }
}

impl Default for FpsReporter {
    fn default() -> Self {
        Self::new(1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_period() {
        let mut fps = FpsReporter::new(1000.0);
        let mut reports = 0;

        // 61 callbacks at 60 Hz span exactly one second.
        for i in 0..=60 {
            if fps.record(i as f64 * 1000.0 / 60.0, 1).is_some() {
                reports += 1;
            }
        }

        assert_eq!(reports, 1);
        assert!((fps.fps() - 61.0).abs() < 1e-6);
    }

    #[test]
    fn period_is_floored() {
        let mut fps = FpsReporter::new(0.0);
        assert!(fps.record(0.0, 0).is_none());
        assert!(fps.record(100.0, 0).is_none());
        assert!(fps.record(250.0, 0).is_some());
    }
}
