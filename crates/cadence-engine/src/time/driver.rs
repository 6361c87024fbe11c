use anyhow::{Context, Result};

use super::fixed_step::FixedStepConfig;
use super::host::{FrameRequest, TimingSource};
use super::stats::FrameStats;

/// Simulation callbacks driven by a [`FrameDriver`].
///
/// `update` advances the simulation by exactly `step_secs`, which is the same value on
/// every call. `render` draws whatever state the completed steps left behind and must
/// not advance the simulation.
pub trait Simulation {
    fn update(&mut self, step_secs: f64) -> Result<()>;

    fn render(&mut self) -> Result<()>;
}

/// Adapts a pair of closures into a [`Simulation`].
pub struct FnSimulation<U, R> {
    update: U,
    render: R,
}

impl<U, R> FnSimulation<U, R>
where
    U: FnMut(f64) -> Result<()>,
    R: FnMut() -> Result<()>,
{
    pub fn new(update: U, render: R) -> Self {
        Self { update, render }
    }
}

impl<U, R> Simulation for FnSimulation<U, R>
where
    U: FnMut(f64) -> Result<()>,
    R: FnMut() -> Result<()>,
{
    #[inline]
    fn update(&mut self, step_secs: f64) -> Result<()> {
        (self.update)(step_secs)
    }

    #[inline]
    fn render(&mut self) -> Result<()> {
        (self.render)()
    }
}

/// Outcome of one delivered timing callback.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Timestamp handed in by the host.
    pub timestamp_ms: f64,

    /// Elapsed host time before clamping (zero on seed frames and clock anomalies).
    pub raw_delta_ms: f64,

    /// Elapsed host time after clamping; this is what entered the accumulator.
    pub frame_delta_ms: f64,

    /// Simulation steps run this frame.
    pub steps: u32,

    /// Accumulator left over after the frame settled.
    pub accumulator_ms: f64,

    /// Interpolation factor between the last two simulation states, in `[0, 1]`.
    pub alpha: f64,

    /// This callback only established the time baseline.
    pub seeded: bool,

    /// The step cap stopped the update loop with whole steps still pending.
    pub capped: bool,

    /// The spiral-of-death guard discarded surplus accumulator time.
    pub overload_reset: bool,

    /// The timestamp went backwards or was not finite.
    pub clock_anomaly: bool,
}

/// Fixed-timestep scheduler.
///
/// Converts variable host frame intervals into a deterministic sequence of fixed-size
/// simulation steps, then renders once per frame.
///
/// Lifecycle:
/// - [`start`](Self::start) registers with a [`TimingSource`]
/// - the host calls [`tick`](Self::tick) once per refresh; every tick re-registers
/// - [`stop`](Self::stop) cancels the pending registration
///
/// Invariant after every settled frame: `0 <= accumulator <= step_budget_ms`.
pub struct FrameDriver<S> {
    config: FixedStepConfig,
    simulation: S,

    last_timestamp_ms: Option<f64>,
    accumulator_ms: f64,
    pending: Option<FrameRequest>,

    stats: FrameStats,
}

impl<S> FrameDriver<S>
where
    S: Simulation,
{
    /// Creates a stopped driver. Fails if `config` is invalid.
    pub fn new(config: FixedStepConfig, simulation: S) -> Result<Self> {
        config.validate().context("invalid fixed-step configuration")?;

        if !config.step_cap_reachable() {
            log::warn!(
                "max_steps_per_frame={} is never reached: max_frame_delta_ms={} <= step budget {:.3} ms",
                config.max_steps_per_frame,
                config.max_frame_delta_ms,
                config.step_budget_ms()
            );
        }

        log::debug!(
            "frame driver: step={:.3} ms, max_steps={}, max_frame_delta={} ms",
            config.step_ms,
            config.max_steps_per_frame,
            config.max_frame_delta_ms
        );

        Ok(Self {
            config,
            simulation,
            last_timestamp_ms: None,
            accumulator_ms: 0.0,
            pending: None,
            stats: FrameStats::default(),
        })
    }

    pub fn config(&self) -> &FixedStepConfig {
        &self.config
    }

    /// Returns `true` while a timing callback is registered.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Unconsumed simulation time in milliseconds.
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    /// Fraction of a step carried in the accumulator, clamped to `[0, 1]`.
    ///
    /// Renderers may use it to interpolate between the previous and current state.
    pub fn alpha(&self) -> f64 {
        (self.accumulator_ms / self.config.step_ms).clamp(0.0, 1.0)
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn into_simulation(self) -> S {
        self.simulation
    }

    /// Registers for the first timing callback. No-op if already running.
    ///
    /// The next delivered callback re-seeds the time baseline, so time spent stopped
    /// never turns into a catch-up burst. The accumulator is kept.
    pub fn start(&mut self, host: &mut dyn TimingSource) {
        if self.pending.is_some() {
            return;
        }

        self.last_timestamp_ms = None;
        self.pending = Some(host.request_frame());
        log::debug!("frame driver started");
    }

    /// Cancels the pending timing callback. Safe to call repeatedly.
    ///
    /// Takes effect at the next callback boundary; the accumulator and baseline are kept.
    pub fn stop(&mut self, host: &mut dyn TimingSource) {
        let Some(req) = self.pending.take() else {
            return;
        };

        host.cancel_frame(req);
        log::debug!("frame driver stopped");
    }

    /// Host timing callback.
    ///
    /// Runs up to `max_steps_per_frame` fixed steps for the elapsed time, renders once
    /// and re-registers with `host`. Returns `Ok(None)` without touching the simulation
    /// when the driver is stopped.
    ///
    /// Callback errors are returned with context. The failed step is not consumed, the
    /// accumulator is settled, and the driver stays stopped until [`start`](Self::start).
    pub fn tick(
        &mut self,
        host: &mut dyn TimingSource,
        timestamp_ms: f64,
    ) -> Result<Option<FrameReport>> {
        // The delivered callback consumes the registration.
        if self.pending.take().is_none() {
            return Ok(None);
        }

        let mut report = FrameReport {
            timestamp_ms,
            ..FrameReport::default()
        };

        self.stats.frames += 1;
        let frame_index = self.stats.frames;

        match self.last_timestamp_ms {
            None if timestamp_ms.is_finite() => {
                self.last_timestamp_ms = Some(timestamp_ms);
                report.seeded = true;
            }
            None => {
                report.seeded = true;
                report.clock_anomaly = true;
            }
            Some(last) => {
                if timestamp_ms.is_finite() && timestamp_ms >= last {
                    report.raw_delta_ms = timestamp_ms - last;
                    self.last_timestamp_ms = Some(timestamp_ms);
                } else {
                    report.clock_anomaly = true;
                }
            }
        }

        if report.clock_anomaly {
            self.stats.clock_anomalies += 1;
            log::debug!(
                "clock anomaly at frame {frame_index}: timestamp={timestamp_ms} last={:?}",
                self.last_timestamp_ms
            );
        }

        report.frame_delta_ms = report.raw_delta_ms.min(self.config.max_frame_delta_ms);
        self.accumulator_ms += report.frame_delta_ms;

        // A seeding callback has no elapsed time to account for.
        let stepped = if report.seeded {
            Ok(())
        } else {
            self.run_steps(&mut report)
        };
        self.settle(&mut report);

        stepped.with_context(|| format!("simulation update failed on frame {frame_index}"))?;

        if !report.seeded || self.config.render_first_frame {
            self.simulation
                .render()
                .with_context(|| format!("render failed on frame {frame_index}"))?;
        }

        self.pending = Some(host.request_frame());

        Ok(Some(report))
    }

    fn run_steps(&mut self, report: &mut FrameReport) -> Result<()> {
        let step_ms = self.config.step_ms;
        let step_secs = self.config.step_secs();

        while self.accumulator_ms >= step_ms && report.steps < self.config.max_steps_per_frame {
            self.simulation.update(step_secs)?;

            self.accumulator_ms -= step_ms;
            report.steps += 1;
            self.stats.steps += 1;
            self.stats.simulated_ms += step_ms;
        }

        report.capped = self.accumulator_ms >= step_ms;
        Ok(())
    }

    fn settle(&mut self, report: &mut FrameReport) {
        if report.capped {
            self.stats.capped_frames += 1;
        }

        // Spiral-of-death guard: surplus beyond one frame's budget is dropped instead
        // of forcing extra catch-up steps next frame.
        let budget = self.config.step_budget_ms();
        if self.accumulator_ms > budget {
            log::warn!(
                "fixed-step overload: dropping {:.1} ms of simulation time ({} steps this frame)",
                self.accumulator_ms,
                report.steps
            );
            self.stats.dropped_ms += self.accumulator_ms;
            self.stats.overload_resets += 1;
            self.accumulator_ms = 0.0;
            report.overload_reset = true;
        }

        // Float subtraction must never leave a negative balance.
        self.accumulator_ms = self.accumulator_ms.max(0.0);

        report.accumulator_ms = self.accumulator_ms;
        report.alpha = self.alpha();
    }
}
