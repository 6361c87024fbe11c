//! Cadence engine crate.
//!
//! Fixed-timestep frame driving: the `time` subsystem turns host refresh callbacks
//! into deterministic simulation steps, and the `window` runtime hosts it on `winit`.

pub mod core;
pub mod time;
pub mod window;

pub mod logging;
