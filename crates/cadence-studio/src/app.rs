use winit::event::WindowEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use cadence_engine::core::{App, AppControl, FrameCtx, HostCtx};
use cadence_engine::time::{FpsReporter, FrameDriver};

use crate::ball::BallSim;

/// Window-hosted studio: Space pauses/resumes the driver, Escape quits.
pub struct StudioApp {
    driver: FrameDriver<BallSim>,
    fps: FpsReporter,
}

impl StudioApp {
    pub fn new(driver: FrameDriver<BallSim>) -> Self {
        Self {
            driver,
            fps: FpsReporter::default(),
        }
    }

    fn toggle_pause(&mut self, ctx: &mut HostCtx<'_>) {
        if self.driver.is_running() {
            self.driver.stop(ctx.timing);
            ctx.runtime.set_title("cadence studio | paused");
            log::info!("paused after {} steps", self.driver.stats().steps);
        } else {
            self.driver.start(ctx.timing);
            log::info!("resumed");
        }
    }
}

impl App for StudioApp {
    fn on_start(&mut self, ctx: &mut HostCtx<'_>) {
        self.driver.start(ctx.timing);
    }

    fn on_window_event(&mut self, ctx: &mut HostCtx<'_>, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return AppControl::Continue;
        };

        if !event.state.is_pressed() || event.repeat {
            return AppControl::Continue;
        }

        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => AppControl::Exit,
            PhysicalKey::Code(KeyCode::Space) => {
                self.toggle_pause(ctx);
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        match self.driver.tick(ctx.timing, ctx.time.timestamp_ms) {
            Ok(Some(report)) => {
                self.fps.record(ctx.time.timestamp_ms, report.steps);
                ctx.runtime
                    .set_title(format!("cadence studio | {}", self.driver.simulation().frame()));
                AppControl::Continue
            }
            Ok(None) => AppControl::Continue,
            Err(e) => {
                log::error!("frame driver failed: {e:#}");
                AppControl::Exit
            }
        }
    }
}
