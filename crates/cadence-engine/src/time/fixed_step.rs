use anyhow::{ensure, Result};

/// Fixed-timestep parameters.
///
/// All durations are milliseconds of host time. The values are fixed for the
/// lifetime of a [`FrameDriver`](super::FrameDriver); build a new driver to change them.
///
/// Two independent limits bound the work done per frame:
/// - `max_frame_delta_ms` clamps the real elapsed time fed into the accumulator
/// - `max_steps_per_frame` caps how many simulation steps a single frame may run
///
/// Starting from a settled accumulator (less than one step), the step cap can only
/// trigger when `max_frame_delta_ms > step_ms * max_steps_per_frame`. See
/// [`step_cap_reachable`](Self::step_cap_reachable).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedStepConfig {
    /// Simulation step length.
    pub step_ms: f64,

    /// Upper bound on simulation steps executed per real frame.
    pub max_steps_per_frame: u32,

    /// Clamp ceiling for the real elapsed time between two callbacks.
    pub max_frame_delta_ms: f64,

    /// Render on the seeding callback, which never runs any steps.
    pub render_first_frame: bool,
}

impl Default for FixedStepConfig {
    fn default() -> Self {
        Self {
            step_ms: 1000.0 / 60.0,
            max_steps_per_frame: 5,
            max_frame_delta_ms: 100.0,
            render_first_frame: true,
        }
    }
}

impl FixedStepConfig {
    /// Creates a config stepping at `hz` simulation updates per second.
    ///
    /// Other fields keep their defaults. The result is validated when the driver is built.
    pub fn from_hz(hz: f64) -> Self {
        Self {
            step_ms: 1000.0 / hz,
            ..Self::default()
        }
    }

    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps;
        self
    }

    pub fn with_max_frame_delta_ms(mut self, ms: f64) -> Self {
        self.max_frame_delta_ms = ms;
        self
    }

    pub fn with_render_first_frame(mut self, render: bool) -> Self {
        self.render_first_frame = render;
        self
    }

    /// Step length in seconds, the constant passed to every update.
    #[inline]
    pub fn step_secs(&self) -> f64 {
        self.step_ms / 1000.0
    }

    /// Most simulation time a single frame may consume.
    #[inline]
    pub fn step_budget_ms(&self) -> f64 {
        self.step_ms * self.max_steps_per_frame as f64
    }

    /// Returns `true` when a single clamped frame can demand more steps than the cap.
    ///
    /// When this is `false`, `max_frame_delta_ms` alone governs catch-up work and the
    /// step cap is redundant.
    pub fn step_cap_reachable(&self) -> bool {
        self.max_frame_delta_ms > self.step_budget_ms()
    }

    /// Checks the invariants the driver relies on.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.step_ms.is_finite() && self.step_ms > 0.0,
            "step_ms must be finite and positive (got {})",
            self.step_ms
        );
        ensure!(
            self.max_steps_per_frame > 0,
            "max_steps_per_frame must be at least 1"
        );
        ensure!(
            self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms >= 0.0,
            "max_frame_delta_ms must be finite and non-negative (got {})",
            self.max_frame_delta_ms
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn default_is_sixty_hz_five_steps_hundred_ms() {
        let c = FixedStepConfig::default();
        assert!((c.step_ms - 16.666_666).abs() < 1e-3);
        assert_eq!(c.max_steps_per_frame, 5);
        assert_eq!(c.max_frame_delta_ms, 100.0);
        assert!(c.render_first_frame);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn step_secs_is_step_ms_over_thousand() {
        let c = FixedStepConfig::from_hz(50.0);
        assert_eq!(c.step_ms, 20.0);
        assert_eq!(c.step_secs(), 0.02);
    }

    // ── validate ──────────────────────────────────────────────────────────

    #[test]
    fn rejects_non_positive_step() {
        let mut c = FixedStepConfig::default();
        c.step_ms = 0.0;
        assert!(c.validate().is_err());
        c.step_ms = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_step() {
        assert!(FixedStepConfig::from_hz(0.0).validate().is_err());
        let mut c = FixedStepConfig::default();
        c.step_ms = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_zero_step_cap() {
        let c = FixedStepConfig::default().with_max_steps_per_frame(0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_negative_frame_delta_clamp() {
        let c = FixedStepConfig::default().with_max_frame_delta_ms(-5.0);
        assert!(c.validate().is_err());
        let c = FixedStepConfig::default().with_max_frame_delta_ms(f64::INFINITY);
        assert!(c.validate().is_err());
    }

    // ── step cap relationship ─────────────────────────────────────────────

    #[test]
    fn cap_reachable_only_when_clamp_exceeds_budget() {
        let c = FixedStepConfig::default()
            .with_max_steps_per_frame(4)
            .with_max_frame_delta_ms(50.0);
        // 4 * 16.67 = 66.7 > 50: the clamp governs alone.
        assert!(!c.step_cap_reachable());

        let c = c.with_max_frame_delta_ms(250.0);
        assert!(c.step_cap_reachable());
    }

    #[test]
    fn default_cap_is_reachable() {
        // 100 ms > 5 * 16.67 ms.
        assert!(FixedStepConfig::default().step_cap_reachable());
    }
}
