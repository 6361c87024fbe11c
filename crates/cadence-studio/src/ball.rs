use anyhow::{ensure, Result};

use cadence_engine::time::Simulation;

const WIDTH: usize = 32;

/// Bouncing ball in a vertical shaft, stepped at a fixed rate.
///
/// Units are meters and seconds. The ball is relaunched once it has (almost) come to
/// rest so the demo never settles.
#[derive(Debug, Clone)]
pub struct BallSim {
    pub height: f64,
    pub velocity: f64,
    pub bounces: u32,
    pub steps: u64,

    gravity: f64,
    restitution: f64,
    shaft: f64,
    launch_speed: f64,

    frame: String,
}

impl BallSim {
    pub fn new() -> Self {
        Self {
            height: 4.0,
            velocity: 0.0,
            bounces: 0,
            steps: 0,
            gravity: 9.81,
            restitution: 0.8,
            shaft: 5.0,
            launch_speed: 9.0,
            frame: String::new(),
        }
    }

    /// Last rendered scanline.
    pub fn frame(&self) -> &str {
        &self.frame
    }
}

impl Default for BallSim {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for BallSim {
    fn update(&mut self, step_secs: f64) -> Result<()> {
        // Semi-implicit Euler.
        self.velocity -= self.gravity * step_secs;
        self.height += self.velocity * step_secs;

        if self.height <= 0.0 {
            self.height = -self.height;
            self.velocity = -self.velocity * self.restitution;
            self.bounces += 1;

            if self.velocity < 0.5 {
                self.velocity = self.launch_speed;
            }
        }

        self.height = self.height.min(self.shaft);
        self.steps += 1;

        ensure!(self.height.is_finite(), "ball left the shaft at step {}", self.steps);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let cell = ((self.height / self.shaft) * (WIDTH - 1) as f64).round() as usize;
        let cell = cell.min(WIDTH - 1);

        let mut lane = [' '; WIDTH];
        lane[cell] = 'o';

        self.frame.clear();
        self.frame.push('[');
        self.frame.extend(lane);
        self.frame.push(']');
        self.frame.push_str(&format!(
            " h={:.2}m v={:+.2}m/s bounces={}",
            self.height, self.velocity, self.bounces
        ));

        log::trace!("{}", self.frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cadence_engine::time::{FixedStepConfig, FrameDriver, ManualTimingSource};

    use super::*;

    fn drive(frame_ms: f64, until_ms: f64) -> BallSim {
        let config = FixedStepConfig {
            step_ms: 10.0,
            ..FixedStepConfig::default()
        };
        let mut host = ManualTimingSource::new();
        let mut driver = FrameDriver::new(config, BallSim::new()).unwrap();
        driver.start(&mut host);

        let mut ts = 0.0;
        driver.tick(&mut host, ts).unwrap();
        while ts < until_ms {
            ts += frame_ms;
            driver.tick(&mut host, ts).unwrap();
        }

        driver.into_simulation()
    }

    #[test]
    fn same_steps_same_state_regardless_of_frame_rate() {
        let slow = drive(10.0, 1_000.0);
        let fast = drive(5.0, 1_000.0);

        assert_eq!(slow.steps, 100);
        assert_eq!(fast.steps, 100);
        assert_eq!(slow.height.to_bits(), fast.height.to_bits());
        assert_eq!(slow.velocity.to_bits(), fast.velocity.to_bits());
    }

    #[test]
    fn ball_bounces_and_stays_in_shaft() {
        let mut sim = BallSim::new();
        for _ in 0..6_000 {
            sim.update(1.0 / 60.0).unwrap();
            assert!((0.0..=5.0).contains(&sim.height));
        }
        assert!(sim.bounces > 3);
    }

    #[test]
    fn render_draws_scanline_without_stepping() {
        let mut sim = BallSim::new();
        sim.render().unwrap();

        assert_eq!(sim.steps, 0);
        assert!(sim.frame().starts_with('['));
        let lane = &sim.frame()[..WIDTH + 2];
        assert_eq!(lane.matches('o').count(), 1);
        assert!(sim.frame().contains("bounces=0"));
    }
}
