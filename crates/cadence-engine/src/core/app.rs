use winit::event::WindowEvent;

use super::ctx::{FrameCtx, HostCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by window-hosted programs.
///
/// The runtime is the timing host: `on_frame` is delivered only while a frame is
/// registered on [`HostCtx::timing`], typically by a
/// [`FrameDriver`](crate::time::FrameDriver) started in `on_start`.
pub trait App {
    /// Called once after the window exists.
    fn on_start(&mut self, ctx: &mut HostCtx<'_>) {
        let _ = ctx;
    }

    /// Called for window events.
    fn on_window_event(&mut self, ctx: &mut HostCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called once per delivered timing callback.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
