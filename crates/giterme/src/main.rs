mod quad;

use anyhow::Result;
use giterme_engine::core::{App, AppControl, FrameCtx};
use giterme_engine::device::Backend;
use giterme_engine::logging::{LoggingConfig, init_logging};
use giterme_engine::render::DrawData;

use quad::QUAD;

/// Draws the quad every frame and follows the mouse.
#[derive(Debug, Default)]
struct QuadApp {
    mouse: Option<(f32, f32)>,
}

impl<B: Backend> App<B> for QuadApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, B>) -> AppControl {
        if ctx.input.pointer_pos != self.mouse {
            self.mouse = ctx.input.pointer_pos;
            if let Some((x, y)) = self.mouse {
                log::trace!("mouse at {x},{y}");
            }
        }

        ctx.draw(Some(&DrawData::new(&QUAD)))
    }
}

#[cfg(windows)]
fn run() -> Result<()> {
    use giterme_engine::device::Direct3D11;
    use giterme_engine::window::{Runtime, RuntimeConfig};

    Runtime::run(RuntimeConfig::default(), Direct3D11, QuadApp::default())
}

#[cfg(not(windows))]
fn run() -> Result<()> {
    anyhow::bail!("giterme renders with Direct3D 11, which is only available on Windows")
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    run()
}
