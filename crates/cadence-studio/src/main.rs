mod app;
mod ball;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use cadence_engine::logging::{init_logging, LoggingConfig};
use cadence_engine::time::{FixedStepConfig, FrameDriver, PacedTimingSource};
use cadence_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;
use crate::ball::BallSim;

#[derive(Parser, Debug)]
#[command(name = "cadence-studio")]
#[command(about = "Fixed-timestep demo: a bouncing ball stepped independently of the refresh rate")]
struct Cli {
    /// Simulation rate in steps per second
    #[arg(long, default_value_t = 60.0)]
    sim_hz: f64,

    /// Upper bound on simulation steps per rendered frame
    #[arg(long, default_value_t = 5)]
    max_steps: u32,

    /// Clamp for real elapsed time between frames, in milliseconds
    #[arg(long, default_value_t = 100.0)]
    max_frame_delta_ms: f64,

    /// Run without a window, pacing frames on this thread
    #[arg(long)]
    headless: bool,

    /// Headless refresh rate in frames per second
    #[arg(long, default_value_t = 144.0)]
    refresh_hz: f64,

    /// Headless frame count
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Log filter (env_logger syntax); falls back to RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    logging.env_filter = cli.log.clone();
    init_logging(logging);

    let config = FixedStepConfig::from_hz(cli.sim_hz)
        .with_max_steps_per_frame(cli.max_steps)
        .with_max_frame_delta_ms(cli.max_frame_delta_ms);
    let driver = FrameDriver::new(config, BallSim::new())?;

    if cli.headless {
        run_headless(driver, cli.refresh_hz, cli.frames)
    } else {
        let runtime = RuntimeConfig {
            title: "cadence studio".to_string(),
            initial_size: LogicalSize::new(720.0, 240.0),
        };
        Runtime::run(runtime, StudioApp::new(driver))
    }
}

fn run_headless(mut driver: FrameDriver<BallSim>, refresh_hz: f64, frames: u64) -> Result<()> {
    let mut host = PacedTimingSource::from_hz(refresh_hz)
        .context("invalid --refresh-hz")?
        .with_fps_logging(1000.0);

    log::info!(
        "headless: {frames} frames at {refresh_hz} Hz, step {:.3} ms",
        driver.config().step_ms
    );

    driver.start(&mut host);
    let delivered = host.run(&mut driver, Some(frames))?;
    driver.stop(&mut host);

    let stats = *driver.stats();
    let sim = driver.simulation();
    log::info!("{}", sim.frame());
    log::info!(
        "delivered={delivered} steps={} simulated={:.2}s capped={} resets={} anomalies={}",
        stats.steps,
        stats.simulated_ms / 1000.0,
        stats.capped_frames,
        stats.overload_resets,
        stats.clock_anomalies
    );

    Ok(())
}
