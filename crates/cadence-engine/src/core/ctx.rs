use winit::window::{Window, WindowId};

use crate::time::FrameTime;
use crate::window::{RuntimeCtx, WindowTimingSource};

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

/// Context passed to `core::App` outside of frame delivery.
pub struct HostCtx<'a> {
    pub window:  WindowCtx<'a>,
    pub timing:  &'a mut WindowTimingSource,
    pub runtime: &'a mut RuntimeCtx,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// `time.timestamp_ms` is the value to hand to `FrameDriver::tick`, together with
/// `timing` so the driver can re-register for the next refresh.
pub struct FrameCtx<'a> {
    pub window:  WindowCtx<'a>,
    pub timing:  &'a mut WindowTimingSource,
    pub runtime: &'a mut RuntimeCtx,
    pub time:    FrameTime,
}
