use winit::window::Window;

use crate::device::Backend;
use crate::input::InputState;
use crate::render::{DrawData, RendererState};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a, B: Backend> {
    pub window: &'a Window,
    pub renderer: &'a mut RendererState<B>,
    pub input: &'a InputState,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, B: Backend> FrameCtx<'a, B> {
    /// Draws and presents one frame.
    ///
    /// There is no recovery path: a failed frame is logged and handed to the
    /// runtime, which exits and returns it from `Runtime::run`.
    pub fn draw(&mut self, draw_data: Option<&DrawData<'_>>) -> AppControl {
        self.window.pre_present_notify();

        match self.renderer.draw(draw_data) {
            Ok(()) => AppControl::Continue,
            Err(e) => {
                log::error!("frame failed: {e}");
                self.runtime.fail(anyhow::Error::new(e).context("frame failed"));
                AppControl::Exit
            }
        }
    }
}
