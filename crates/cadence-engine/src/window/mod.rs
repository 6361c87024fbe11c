//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and acts as the timing host: frames are
//! registered through redraw requests and delivered on `RedrawRequested`.

mod runtime;
mod timing;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use timing::WindowTimingSource;
