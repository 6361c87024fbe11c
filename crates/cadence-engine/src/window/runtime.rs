use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, HostCtx, WindowCtx};
use crate::time::{FrameClock, FrameTime};

use super::timing::WindowTimingSource;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cadence".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetTitle(String),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(initial, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct WindowEntry {
    window: Window,
    clock: FrameClock,
    timing: WindowTimingSource,
}

impl WindowEntry {
    /// Re-registration: a pending frame becomes a redraw request.
    fn request_redraw_if_pending(&self) {
        if self.timing.is_pending() {
            self.window.request_redraw();
        }
    }
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    initial: RuntimeConfig,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(initial: RuntimeConfig, app: A) -> Self {
        Self {
            initial,
            app,
            entry: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.initial.title.clone())
            .with_inner_size(self.initial.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        log::info!("window created: {:?}", window.id());

        self.entry = Some(WindowEntry {
            window,
            clock: FrameClock::default(),
            timing: WindowTimingSource::default(),
        });
        Ok(())
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetTitle(title) => {
                    if let Some(entry) = self.entry.as_ref() {
                        entry.window.set_title(&title);
                    }
                }
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn deliver_frame(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let mut runtime_ctx = RuntimeCtx::default();

        // Split borrows so the app and the window entry can be used together.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        // Redraws the host did not schedule (expose, resize) are not timing callbacks.
        if entry.timing.take_pending().is_none() {
            return;
        }

        let ft: FrameTime = entry.clock.tick();

        let app_control = {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: &entry.window,
                },
                timing: &mut entry.timing,
                runtime: &mut runtime_ctx,
                time: ft,
            };

            app.on_frame(&mut ctx)
        };

        entry.request_redraw_if_pending();

        if app_control == AppControl::Exit {
            runtime_ctx.exit();
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create initial window: {e:#}");
            self.request_exit();
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();
        let (app, entry) = (&mut self.app, &mut self.entry);
        if let Some(entry) = entry.as_mut() {
            {
                let mut ctx = HostCtx {
                    window: WindowCtx {
                        id: entry.window.id(),
                        window: &entry.window,
                    },
                    timing: &mut entry.timing,
                    runtime: &mut runtime_ctx,
                };
                app.on_start(&mut ctx);
            }
            entry.request_redraw_if_pending();
        }

        self.apply_commands(event_loop, runtime_ctx);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Frames are driven by redraw requests; sleep until one arrives.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();
        let mut exit_from_app_event = false;

        {
            let (app, entry) = (&mut self.app, &mut self.entry);
            let Some(entry) = entry.as_mut().filter(|e| e.window.id() == window_id) else {
                return;
            };

            let was_pending = entry.timing.is_pending();
            {
                let mut ctx = HostCtx {
                    window: WindowCtx {
                        id: window_id,
                        window: &entry.window,
                    },
                    timing: &mut entry.timing,
                    runtime: &mut runtime_ctx,
                };

                if app.on_window_event(&mut ctx, &event) == AppControl::Exit {
                    exit_from_app_event = true;
                }
            }

            // The app may have (re)started its driver from an input event.
            if !was_pending {
                entry.request_redraw_if_pending();
            }
        }

        if exit_from_app_event {
            runtime_ctx.exit();
        }
        self.apply_commands(event_loop, runtime_ctx);

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.entry = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => self.deliver_frame(event_loop, window_id),

            _ => {}
        }
    }
}
