//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the window runtime (the timing
//! host) and applications. It avoids leaking runtime internals into user code and
//! provides a consistent per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, HostCtx, WindowCtx};
