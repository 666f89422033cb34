use anyhow::{Context, Result};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Backend, SurfaceTarget};
use crate::input::InputState;
use crate::input::platform::winit::translate_window_event;
use crate::render::{RendererConfig, RendererState};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Outer window position in physical pixels; `None` lets the platform choose.
    pub position: Option<PhysicalPosition<i32>>,
    pub initial_size: PhysicalSize<u32>,
    pub renderer: RendererConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Giterme".to_string(),
            position: Some(PhysicalPosition::new(320, 180)),
            initial_size: PhysicalSize::new(1280, 720),
            renderer: RendererConfig::default(),
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
    failure: Option<anyhow::Error>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    /// Exits and makes `Runtime::run` return `error`. The first failure wins.
    pub fn fail(&mut self, error: anyhow::Error) {
        self.exit = true;
        self.failure.get_or_insert(error);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }

    pub fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, initializes the renderer with `backend` and drives
    /// `app` until the window closes or the app exits.
    pub fn run<B, A>(config: RuntimeConfig, backend: B, app: A) -> Result<()>
    where
        B: Backend + Clone + 'static,
        A: App<B> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, backend, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// The window and everything drawn into it.
///
/// Field order matters: the renderer is dropped (released) before the window
/// its swap chain presents into.
struct WindowEntry<B: Backend> {
    renderer: RendererState<B>,
    input: InputState,
    window: Window,
}

struct AppState<B, A>
where
    B: Backend + Clone + 'static,
    A: App<B> + 'static,
{
    config: RuntimeConfig,
    backend: B,
    app: A,

    entry: Option<WindowEntry<B>>,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<B, A> AppState<B, A>
where
    B: Backend + Clone + 'static,
    A: App<B> + 'static,
{
    fn new(config: RuntimeConfig, backend: B, app: A) -> Self {
        Self {
            config,
            backend,
            app,
            entry: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry<B>> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        if let Some(position) = self.config.position {
            attrs = attrs.with_position(position);
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let handle = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();
        let size = window.inner_size();
        let target = SurfaceTarget {
            handle,
            width: size.width,
            height: size.height,
        };

        let renderer = RendererState::init(self.backend.clone(), &target, self.config.renderer)
            .context("failed to initialize renderer")?;

        Ok(WindowEntry {
            renderer,
            input: InputState::default(),
            window,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if let Err(e) = entry.renderer.resize(size.width, size.height) {
            log::error!("failed to resize: {e}");
        }
        entry.window.request_redraw();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let mut runtime = RuntimeCtx::default();
        let control = {
            let mut ctx = FrameCtx {
                window: &entry.window,
                renderer: &mut entry.renderer,
                input: &entry.input,
                runtime: &mut runtime,
            };
            self.app.on_frame(&mut ctx)
        };

        if let Some(e) = runtime.take_failure() {
            self.failure.get_or_insert(e);
        }
        if control == AppControl::Exit || runtime.exit_requested() {
            self.request_exit(event_loop);
        }
    }
}

impl<B, A> ApplicationHandler for AppState<B, A>
where
    B: Backend + Clone + 'static,
    A: App<B> + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.window.request_redraw();
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create initial window: {e:#}");
                self.failure = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation blocks on vsync.
        if let Some(entry) = &self.entry {
            entry.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(entry) = self.entry.as_mut() {
            if let Some(ev) = translate_window_event(&event) {
                entry.input.apply_event(&ev);
            }
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                // Renderer goes first, then the window.
                self.entry = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.entry.as_ref().map(|e| e.window.inner_size()) {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_giterme_layout() {
        let config = RuntimeConfig::default();
        assert_eq!(config.title, "Giterme");
        assert_eq!(config.position, Some(PhysicalPosition::new(320, 180)));
        assert_eq!(config.initial_size, PhysicalSize::new(1280, 720));
        assert_eq!(config.renderer.sync_interval, 1);
    }

    #[test]
    fn exit_request_is_sticky() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.exit_requested());
        ctx.exit();
        ctx.exit();
        assert!(ctx.exit_requested());
        assert!(ctx.take_failure().is_none());
    }

    #[test]
    fn first_failure_is_kept_and_requests_exit() {
        let mut ctx = RuntimeCtx::default();
        ctx.fail(anyhow::anyhow!("present failed"));
        ctx.fail(anyhow::anyhow!("second"));

        assert!(ctx.exit_requested());
        let failure = ctx.take_failure().unwrap();
        assert_eq!(failure.to_string(), "present failed");
        assert!(ctx.take_failure().is_none());
    }
}
