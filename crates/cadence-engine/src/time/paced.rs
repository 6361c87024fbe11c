use std::time::{Duration, Instant};

use anyhow::{ensure, Result};

use super::driver::{FrameDriver, Simulation};
use super::frame_clock::FrameClock;
use super::host::{FrameRequest, TimingSource};
use super::stats::FpsReporter;

/// Headless host that delivers timing callbacks at a fixed refresh rate.
///
/// The calling thread sleeps until each refresh deadline. Missed deadlines are not
/// replayed: the next deadline is scheduled from the later of the planned time and
/// the actual delivery time, like a display that drops frames.
pub struct PacedTimingSource {
    interval: Duration,
    clock: FrameClock,
    next_deadline: Option<Instant>,

    next_id: u64,
    pending: Option<FrameRequest>,

    fps: Option<FpsReporter>,
}

impl PacedTimingSource {
    /// Creates a host refreshing `hz` times per second.
    pub fn from_hz(hz: f64) -> Result<Self> {
        ensure!(
            hz.is_finite() && hz > 0.0,
            "refresh rate must be finite and positive (got {hz})"
        );

        Ok(Self {
            interval: Duration::from_secs_f64(1.0 / hz),
            clock: FrameClock::new(),
            next_deadline: None,
            next_id: 0,
            pending: None,
            fps: None,
        })
    }

    /// Enables periodic frame-rate logging.
    pub fn with_fps_logging(mut self, period_ms: f64) -> Self {
        self.fps = Some(FpsReporter::new(period_ms));
        self
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Blocks until the next refresh and delivers callbacks to `driver`.
    ///
    /// Returns the number of delivered callbacks once the driver stops registering or
    /// `max_frames` callbacks were delivered. The driver must have been started against
    /// this host. Callback errors end the loop and are returned.
    pub fn run<S>(&mut self, driver: &mut FrameDriver<S>, max_frames: Option<u64>) -> Result<u64>
    where
        S: Simulation,
    {
        let mut delivered = 0u64;

        while self.pending.is_some() && max_frames.is_none_or(|max| delivered < max) {
            self.wait_for_refresh();

            self.pending = None;
            let ft = self.clock.tick();
            let report = driver.tick(self, ft.timestamp_ms)?;
            delivered += 1;

            if let (Some(fps), Some(report)) = (self.fps.as_mut(), report) {
                fps.record(ft.timestamp_ms, report.steps);
            }
        }

        log::debug!("paced host delivered {delivered} frames");
        Ok(delivered)
    }

    fn wait_for_refresh(&mut self) {
        let now = Instant::now();
        let deadline = *self.next_deadline.get_or_insert(now);

        if deadline > now {
            std::thread::sleep(deadline - now);
        }

        self.next_deadline = Some(deadline.max(now) + self.interval);
    }
}

impl TimingSource for PacedTimingSource {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id = self.next_id.wrapping_add(1);
        let req = FrameRequest::from_raw(self.next_id);
        self.pending = Some(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::time::{FixedStepConfig, FnSimulation};

    #[test]
    fn rejects_bad_refresh_rate() {
        assert!(PacedTimingSource::from_hz(0.0).is_err());
        assert!(PacedTimingSource::from_hz(f64::NAN).is_err());
    }

    #[test]
    fn delivers_requested_frame_count() {
        let mut renders = 0u32;
        let sim = FnSimulation::new(|_| Ok(()), || {
            renders += 1;
            Ok(())
        });

        let mut host = PacedTimingSource::from_hz(1_000.0).unwrap();
        let mut driver = FrameDriver::new(FixedStepConfig::from_hz(500.0), sim).unwrap();
        driver.start(&mut host);

        let delivered = host.run(&mut driver, Some(10)).unwrap();
        assert_eq!(delivered, 10);
        assert!(driver.is_running());
        assert!(host.is_pending());

        drop(driver);
        assert_eq!(renders, 10);
    }

    #[test]
    fn not_started_driver_runs_nothing() {
        let sim = FnSimulation::new(|_| Ok(()), || Ok(()));
        let mut host = PacedTimingSource::from_hz(1_000.0).unwrap();
        let mut driver = FrameDriver::new(FixedStepConfig::default(), sim).unwrap();

        assert_eq!(host.run(&mut driver, None).unwrap(), 0);
    }

    #[test]
    fn callback_error_ends_the_loop() {
        let mut frames = 0u32;
        let sim = FnSimulation::new(|_| Ok(()), || {
            frames += 1;
            if frames == 3 {
                bail!("surface lost");
            }
            Ok(())
        });

        let mut host = PacedTimingSource::from_hz(1_000.0).unwrap();
        let mut driver = FrameDriver::new(FixedStepConfig::default(), sim).unwrap();
        driver.start(&mut host);

        assert!(host.run(&mut driver, Some(100)).is_err());
        assert!(!driver.is_running());
        assert!(!host.is_pending());
    }
}
