//! Time subsystem.
//!
//! Provides the fixed-timestep frame driver and the timing sources that feed it,
//! without coupling either to a windowing runtime.
//! Intended usage:
//! - one `FrameDriver` per active scene, built from a `FixedStepConfig`
//! - a host (window runtime, `PacedTimingSource`, or your own loop through
//!   `ManualTimingSource`) calls `FrameDriver::tick` once per refresh
//! - `FrameClock` turns `Instant` into the millisecond timestamps the driver expects

mod driver;
mod fixed_step;
mod frame_clock;
mod host;
mod paced;
mod stats;

pub use driver::{FnSimulation, FrameDriver, FrameReport, Simulation};
pub use fixed_step::FixedStepConfig;
pub use frame_clock::{FrameClock, FrameTime};
pub use host::{FrameRequest, ManualTimingSource, TimingSource};
pub use paced::PacedTimingSource;
pub use stats::{FpsReporter, FrameStats};
