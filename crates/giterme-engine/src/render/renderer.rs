use std::fmt::Debug;

use crate::device::{
    Backend, BackendResult, InitStep, PipelineBindings, RendererError, SurfaceTarget,
    SwapChainDesc, Viewport,
};

use super::pipeline;
use super::vertex::{DrawData, Vertex};

/// Renderer configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RendererConfig {
    /// Create the device with the debug layer and break on errors.
    pub debug_layer: bool,

    /// Present sync interval. `1` locks presentation to the display refresh.
    pub sync_interval: u32,

    pub buffer_count: u32,

    /// Swap chain refresh rate as `(numerator, denominator)`.
    pub refresh_rate: (u32, u32),
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            debug_layer: cfg!(debug_assertions),
            sync_interval: 1,
            buffer_count: 2,
            refresh_rate: (60, 1),
        }
    }
}

/// Which graphics handles a [`RendererState`] currently owns.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct HandleSet {
    pub device: bool,
    pub context: bool,
    pub swap_chain: bool,
    pub input_layout: bool,
    pub vertex_shader: bool,
    pub pixel_shader: bool,
    pub render_target_view: bool,
    pub vertex_buffer: bool,
}

impl HandleSet {
    /// Everything needed to draw, ignoring the lazily created vertex buffer.
    pub fn pipeline_ready(&self) -> bool {
        self.device
            && self.context
            && self.swap_chain
            && self.input_layout
            && self.vertex_shader
            && self.pixel_shader
            && self.render_target_view
    }

    pub fn all_released(&self) -> bool {
        *self == HandleSet::default()
    }
}

/// Exclusive owner of every graphics handle used to draw a frame.
///
/// Created once by [`RendererState::init`]. [`RendererState::draw`] creates
/// the vertex buffer on first use. [`RendererState::cleanup`] (or dropping
/// the state) releases everything.
pub struct RendererState<B: Backend> {
    backend: B,
    config: RendererConfig,

    device: Option<B::Device>,
    context: Option<B::Context>,
    swap_chain: Option<B::SwapChain>,
    input_layout: Option<B::InputLayout>,
    vertex_shader: Option<B::VertexShader>,
    pixel_shader: Option<B::PixelShader>,
    render_target_view: Option<B::RenderTargetView>,
    vertex_buffer: Option<B::Buffer>,

    /// Vertices uploaded by the last draw that carried draw data.
    vertex_count: u32,
}

impl<B: Backend> RendererState<B> {
    /// Creates the device, swap chain and fixed pipeline for `target`.
    ///
    /// Steps run in a fixed order. The first failing step is logged and
    /// returned; handles created before it are released on the way out.
    /// Failing to configure the debug layer only logs a warning.
    pub fn init(
        backend: B,
        target: &SurfaceTarget,
        config: RendererConfig,
    ) -> Result<Self, RendererError> {
        let desc = SwapChainDesc {
            width: target.width,
            height: target.height,
            buffer_count: config.buffer_count,
            refresh_rate: config.refresh_rate,
        };

        let (device, context, swap_chain) = step(
            InitStep::CreateDeviceAndSwapChain,
            backend.create_device_and_swap_chain(target, &desc, config.debug_layer),
        )?;
        log::info!(
            "created device, context and swap chain\n  + DEVICE:    {device:?}\n  + CONTEXT:   {context:?}\n  + SWAPCHAIN: {swap_chain:?}"
        );

        if config.debug_layer {
            match backend.configure_debug_layer(&device) {
                Ok(()) => log::info!("debug layer breaks on corruption and error messages"),
                Err(e) => log::warn!("{} failed, continuing without it: {e}", InitStep::ConfigureDebugLayer),
            }
        }

        let render_target_view = created(
            InitStep::CreateRenderTargetView,
            backend.create_render_target_view(&device, &swap_chain),
        )?;

        let vs_bytecode = step(
            InitStep::CompileVertexShader,
            backend.compile_shader(&pipeline::VERTEX_SHADER),
        )?;
        log::info!("compiled vertex shader `{}`", pipeline::VERTEX_SHADER.entry_point);

        let vertex_shader = created(
            InitStep::CreateVertexShader,
            backend.create_vertex_shader(&device, &vs_bytecode),
        )?;
        let input_layout = created(
            InitStep::CreateInputLayout,
            backend.create_input_layout(&device, &pipeline::INPUT_LAYOUT, &vs_bytecode),
        )?;
        drop(vs_bytecode);

        let ps_bytecode = step(
            InitStep::CompilePixelShader,
            backend.compile_shader(&pipeline::PIXEL_SHADER),
        )?;
        log::info!("compiled pixel shader `{}`", pipeline::PIXEL_SHADER.entry_point);

        let pixel_shader = created(
            InitStep::CreatePixelShader,
            backend.create_pixel_shader(&device, &ps_bytecode),
        )?;
        drop(ps_bytecode);

        let state = Self {
            backend,
            config,
            device: Some(device),
            context: Some(context),
            swap_chain: Some(swap_chain),
            input_layout: Some(input_layout),
            vertex_shader: Some(vertex_shader),
            pixel_shader: Some(pixel_shader),
            render_target_view: Some(render_target_view),
            vertex_buffer: None,
            vertex_count: 0,
        };
        state.log_handles();

        Ok(state)
    }

    /// Uploads `draw_data` (if any), draws and presents one frame.
    ///
    /// - The vertex buffer is created on the first upload, sized for exactly
    ///   that many vertices, and re-created when a later upload needs more room.
    /// - `None` draws the vertices of the last upload again.
    /// - Empty draw data draws nothing but still presents.
    pub fn draw(&mut self, draw_data: Option<&DrawData<'_>>) -> Result<(), RendererError> {
        let Self {
            backend,
            config,
            device,
            context,
            swap_chain,
            input_layout,
            vertex_shader,
            pixel_shader,
            render_target_view,
            vertex_buffer,
            vertex_count,
        } = self;

        let (
            Some(device),
            Some(context),
            Some(swap_chain),
            Some(input_layout),
            Some(vertex_shader),
            Some(pixel_shader),
        ) = (
            device.as_ref(),
            context.as_ref(),
            swap_chain.as_ref(),
            input_layout.as_ref(),
            vertex_shader.as_ref(),
            pixel_shader.as_ref(),
        )
        else {
            return Err(RendererError::Released);
        };
        let Some(render_target_view) = render_target_view.as_ref() else {
            return Err(RendererError::MissingRenderTarget);
        };

        if let Some(data) = draw_data {
            *vertex_count = 0;

            let count = u32::try_from(data.vertex_count())
                .map_err(|_| RendererError::TooManyVertices(data.vertex_count()))?;
            let byte_width = count
                .checked_mul(Vertex::STRIDE)
                .ok_or(RendererError::TooManyVertices(data.vertex_count()))?;

            if count > 0 {
                let buffer = match vertex_buffer.take() {
                    Some(buffer) if backend.vertex_buffer_byte_width(&buffer) >= byte_width => buffer,
                    stale => {
                        if let Some(stale) = stale {
                            log::debug!(
                                "vertex buffer too small ({} bytes), growing to {byte_width} bytes",
                                backend.vertex_buffer_byte_width(&stale)
                            );
                        }
                        let buffer = backend
                            .create_vertex_buffer(device, byte_width)
                            .map_err(|source| RendererError::VertexBuffer { byte_width, source })?;
                        log::info!("created vertex buffer\n  + VERTEX_BUFFER: {buffer:?} ({byte_width} bytes)");
                        buffer
                    }
                };

                let buffer = vertex_buffer.insert(buffer);
                backend
                    .write_vertex_buffer(context, buffer, data.as_bytes())
                    .map_err(RendererError::Upload)?;
                *vertex_count = count;
            }
        }

        let (width, height) = backend
            .back_buffer_size(swap_chain)
            .map_err(RendererError::BackBuffer)?;

        let bindings = PipelineBindings::<B> {
            input_layout,
            vertex_buffer: vertex_buffer.as_ref(),
            stride: Vertex::STRIDE,
            offset: 0,
            topology: pipeline::TOPOLOGY,
            vertex_shader,
            pixel_shader,
            render_target_view,
            viewport: Viewport::covering(width, height),
        };
        backend.draw(context, &bindings, *vertex_count);

        backend
            .present(swap_chain, config.sync_interval)
            .map_err(RendererError::Present)
    }

    /// Resizes the swap chain buffers and rebuilds the render-target view.
    ///
    /// A zero-sized request (e.g. a minimized window) is ignored. If the swap
    /// chain refuses the new size, the view over the current buffers is
    /// restored and drawing can continue at the old size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RendererError> {
        if width == 0 || height == 0 {
            log::debug!("ignoring resize to {width}x{height}");
            return Ok(());
        }

        let (Some(device), Some(swap_chain)) = (self.device.as_ref(), self.swap_chain.as_ref())
        else {
            return Err(RendererError::Released);
        };

        let current = self
            .backend
            .back_buffer_size(swap_chain)
            .map_err(RendererError::BackBuffer)?;
        if current == (width, height) {
            return Ok(());
        }

        // The swap chain refuses to resize while a view onto its buffers is alive.
        self.render_target_view = None;

        if let Err(source) = self.backend.resize_buffers(swap_chain, width, height) {
            // The old buffers are still in place; put a view back over them.
            match self.backend.create_render_target_view(device, swap_chain) {
                Ok(view) => self.render_target_view = Some(view),
                Err(e) => log::error!("failed to restore render target view: {e}"),
            }
            return Err(RendererError::Resize { width, height, source });
        }

        let view = created(
            InitStep::CreateRenderTargetView,
            self.backend.create_render_target_view(device, swap_chain),
        )?;
        self.render_target_view = Some(view);

        log::debug!("resized swap chain to {width}x{height}");
        Ok(())
    }

    /// Releases every handle, in ownership order, leaving each slot empty.
    ///
    /// Safe to call more than once and on partially released state.
    pub fn cleanup(&mut self) {
        let released = [
            release(&mut self.device, "DEVICE"),
            release(&mut self.context, "CONTEXT"),
            release(&mut self.swap_chain, "SWAPCHAIN"),
            release(&mut self.input_layout, "INPUT_LAYOUT"),
            release(&mut self.vertex_shader, "VERTEX_SHADER"),
            release(&mut self.pixel_shader, "PIXEL_SHADER"),
            release(&mut self.render_target_view, "RENDER_TARGET_VIEW"),
            release(&mut self.vertex_buffer, "VERTEX_BUFFER"),
        ]
        .into_iter()
        .filter(|r| *r)
        .count();

        self.vertex_count = 0;

        if released > 0 {
            log::info!("renderer released {released} handles");
        }
    }

    pub fn handles(&self) -> HandleSet {
        HandleSet {
            device: self.device.is_some(),
            context: self.context.is_some(),
            swap_chain: self.swap_chain.is_some(),
            input_layout: self.input_layout.is_some(),
            vertex_shader: self.vertex_shader.is_some(),
            pixel_shader: self.pixel_shader.is_some(),
            render_target_view: self.render_target_view.is_some(),
            vertex_buffer: self.vertex_buffer.is_some(),
        }
    }

    /// Byte width of the vertex buffer, once one exists.
    pub fn vertex_buffer_size(&self) -> Option<u32> {
        self.vertex_buffer
            .as_ref()
            .map(|b| self.backend.vertex_buffer_byte_width(b))
    }

    /// Number of vertices the next draw without draw data will submit.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn log_handles(&self) {
        log::info!(
            "INIT RESULT:\n  + DEVICE:             {:?}\n  + CONTEXT:            {:?}\n  + SWAPCHAIN:          {:?}\n  + INPUT_LAYOUT:       {:?}\n  + VERTEX_SHADER:      {:?}\n  + PIXEL_SHADER:       {:?}\n  + RENDER_TARGET_VIEW: {:?}\n  + VERTEX_BUFFER:      {:?}",
            self.device,
            self.context,
            self.swap_chain,
            self.input_layout,
            self.vertex_shader,
            self.pixel_shader,
            self.render_target_view,
            self.vertex_buffer,
        );
    }
}

impl<B: Backend> Drop for RendererState<B> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn step<T>(step: InitStep, result: BackendResult<T>) -> Result<T, RendererError> {
    result.map_err(|source| {
        let err = RendererError::Init { step, source };
        log::error!("{err}");
        err
    })
}

fn created<T: Debug>(init_step: InitStep, result: BackendResult<T>) -> Result<T, RendererError> {
    let handle = step(init_step, result)?;
    log::info!("{init_step}: {handle:?}");
    Ok(handle)
}

fn release<T: Debug>(slot: &mut Option<T>, name: &str) -> bool {
    match slot.take() {
        Some(handle) => {
            log::debug!("released {name}: {handle:?}");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroIsize;

    use raw_window_handle::{RawWindowHandle, Win32WindowHandle};

    use super::*;
    use crate::device::{HeadlessBackend, HeadlessOp, ShaderStage, Topology};

    fn target(width: u32, height: u32) -> SurfaceTarget {
        let hwnd = NonZeroIsize::new(0x1000).unwrap();
        SurfaceTarget {
            handle: RawWindowHandle::Win32(Win32WindowHandle::new(hwnd)),
            width,
            height,
        }
    }

    fn renderer() -> (HeadlessBackend, RendererState<HeadlessBackend>) {
        let backend = HeadlessBackend::new();
        let state = RendererState::init(backend.clone(), &target(1280, 720), RendererConfig::default())
            .unwrap();
        (backend, state)
    }

    fn quad() -> Vec<Vertex> {
        vec![
            Vertex::new(-0.5, -0.5, 0xff0000ff),
            Vertex::new(-0.5, 0.5, 0xff00ff00),
            Vertex::new(0.5, -0.5, 0xffff0000),
            Vertex::new(0.5, -0.5, 0xffff0000),
            Vertex::new(-0.5, 0.5, 0xff00ff00),
            Vertex::new(0.5, 0.5, 0xff0000ff),
        ]
    }

    // ── init ──────────────────────────────────────────────────────────────

    #[test]
    fn init_owns_pipeline_but_no_vertex_buffer() {
        let (backend, state) = renderer();
        let handles = state.handles();

        assert!(handles.pipeline_ready());
        assert!(!handles.vertex_buffer);
        assert_eq!(state.vertex_buffer_size(), None);
        // device, context, swap chain, view, two shaders, input layout
        assert_eq!(backend.live_handles(), 7);
    }

    #[test]
    fn init_compiles_both_shaders_with_fixed_entry_points() {
        let (backend, _state) = renderer();
        let rec = backend.recording();

        assert_eq!(
            rec.compiled,
            vec![
                (ShaderStage::Vertex, "vs_main", "vs_5_0"),
                (ShaderStage::Pixel, "ps_main", "ps_5_0"),
            ]
        );
        assert_eq!(rec.input_layout, pipeline::INPUT_LAYOUT.to_vec());
    }

    #[test]
    fn debug_layer_follows_config() {
        let backend = HeadlessBackend::new();
        let config = RendererConfig {
            debug_layer: true,
            ..RendererConfig::default()
        };
        let _state = RendererState::init(backend.clone(), &target(64, 64), config).unwrap();
        assert!(backend.recording().debug_layer_configured);

        let backend = HeadlessBackend::new();
        let config = RendererConfig {
            debug_layer: false,
            ..RendererConfig::default()
        };
        let _state = RendererState::init(backend.clone(), &target(64, 64), config).unwrap();
        assert!(!backend.recording().debug_layer_configured);
    }

    #[test]
    fn failing_step_is_reported_and_nothing_leaks() {
        let fatal = InitStep::ALL
            .into_iter()
            .filter(|s| *s != InitStep::ConfigureDebugLayer);

        for failing in fatal {
            let backend = HeadlessBackend::failing_at(failing);
            let config = RendererConfig {
                debug_layer: true,
                ..RendererConfig::default()
            };
            let err = match RendererState::init(backend.clone(), &target(64, 64), config) {
                Ok(_) => panic!("init succeeded despite failing {failing}"),
                Err(err) => err,
            };

            assert_eq!(err.init_step(), Some(failing));
            assert_eq!(backend.live_handles(), 0, "handles leaked after failing {failing}");
        }
    }

    #[test]
    fn debug_layer_failure_is_not_fatal() {
        let backend = HeadlessBackend::failing_at(InitStep::ConfigureDebugLayer);
        let config = RendererConfig {
            debug_layer: true,
            ..RendererConfig::default()
        };
        let state = RendererState::init(backend.clone(), &target(64, 64), config).unwrap();

        assert!(state.handles().pipeline_ready());
        assert!(!backend.recording().debug_layer_configured);
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn first_draw_sizes_vertex_buffer_to_vertex_count() {
        let (backend, mut state) = renderer();
        let vertices = quad();

        state.draw(Some(&DrawData::new(&vertices))).unwrap();

        assert!(state.handles().vertex_buffer);
        assert_eq!(state.vertex_buffer_size(), Some(6 * Vertex::STRIDE));
        assert_eq!(backend.recording().buffer_allocations, vec![72]);
    }

    #[test]
    fn larger_draw_regrows_vertex_buffer() {
        let (backend, mut state) = renderer();
        let small = quad();
        let mut large = quad();
        large.extend(quad());

        state.draw(Some(&DrawData::new(&small))).unwrap();
        state.draw(Some(&DrawData::new(&large))).unwrap();

        assert_eq!(state.vertex_buffer_size(), Some(12 * Vertex::STRIDE));
        let rec = backend.recording();
        assert_eq!(rec.buffer_allocations, vec![6 * Vertex::STRIDE, 12 * Vertex::STRIDE]);
        assert_eq!(rec.uploads[1], bytemuck::cast_slice::<Vertex, u8>(&large));
        assert_eq!(rec.draws[1].vertex_count, 12);
        // old buffer released, new one alive
        assert_eq!(backend.live_handles(), 8);
    }

    #[test]
    fn smaller_draw_reuses_vertex_buffer() {
        let (backend, mut state) = renderer();
        let vertices = quad();

        state.draw(Some(&DrawData::new(&vertices))).unwrap();
        state.draw(Some(&DrawData::new(&vertices[..3]))).unwrap();

        let rec = backend.recording();
        assert_eq!(rec.buffer_allocations.len(), 1);
        assert_eq!(rec.draws[1].vertex_count, 3);
        assert_eq!(rec.uploads[1].len(), 3 * Vertex::STRIDE as usize);
    }

    #[test]
    fn uploaded_bytes_match_vertex_record() {
        let (backend, mut state) = renderer();
        let vertex = [Vertex::new(-0.5, -0.5, 0xff0000ff)];

        state.draw(Some(&DrawData::new(&vertex))).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&(-0.5f32).to_ne_bytes());
        expected.extend_from_slice(&(-0.5f32).to_ne_bytes());
        expected.extend_from_slice(&0xff0000ffu32.to_ne_bytes());

        assert_eq!(backend.recording().uploads, vec![expected]);
    }

    #[test]
    fn draw_binds_fixed_state_and_presents_with_vsync() {
        let (backend, mut state) = renderer();
        let vertices = quad();

        state.draw(Some(&DrawData::new(&vertices))).unwrap();

        let rec = backend.recording();
        let draw = &rec.draws[0];
        assert_eq!(draw.vertex_count, 6);
        assert_eq!(draw.stride, Vertex::STRIDE);
        assert_eq!(draw.offset, 0);
        assert_eq!(draw.topology, Topology::TriangleList);
        assert_eq!(draw.viewport, Viewport::covering(1280, 720));
        assert_eq!(draw.vertex_buffer_bytes, Some(72));
        assert_eq!(rec.presents, vec![1]);
    }

    #[test]
    fn draw_without_data_repeats_last_upload() {
        let (backend, mut state) = renderer();
        let vertices = quad();

        state.draw(Some(&DrawData::new(&vertices))).unwrap();
        state.draw(None).unwrap();

        let rec = backend.recording();
        assert_eq!(rec.uploads.len(), 1);
        assert_eq!(rec.draws[1].vertex_count, 6);
        assert_eq!(rec.presents.len(), 2);
    }

    #[test]
    fn empty_draw_data_presents_without_allocating() {
        let (backend, mut state) = renderer();

        state.draw(Some(&DrawData::new(&[]))).unwrap();

        let rec = backend.recording();
        assert!(rec.buffer_allocations.is_empty());
        assert_eq!(rec.draws[0].vertex_count, 0);
        assert_eq!(rec.draws[0].vertex_buffer_bytes, None);
        assert_eq!(rec.presents, vec![1]);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_updates_viewport() {
        let (backend, mut state) = renderer();

        state.resize(800, 600).unwrap();
        state.draw(None).unwrap();

        let rec = backend.recording();
        assert_eq!(rec.resizes, vec![(800, 600)]);
        assert_eq!(rec.draws[0].viewport, Viewport::covering(800, 600));
        assert!(state.handles().render_target_view);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let (backend, mut state) = renderer();

        state.resize(0, 600).unwrap();
        state.resize(1280, 720).unwrap();

        assert!(backend.recording().resizes.is_empty());
    }

    #[test]
    fn refused_resize_keeps_renderer_drawable() {
        let (backend, mut state) = renderer();
        backend.set_failing_op(Some(HeadlessOp::ResizeBuffers));

        let err = state.resize(128, 128).unwrap_err();
        assert!(matches!(err, RendererError::Resize { width: 128, height: 128, .. }));
        assert!(state.handles().pipeline_ready());

        backend.set_failing_op(None);
        state.draw(None).unwrap();
        assert_eq!(backend.recording().draws[0].viewport, Viewport::covering(1280, 720));
    }

    #[test]
    fn lost_render_target_is_not_reported_as_released() {
        let (_backend, mut state) = renderer();
        state.render_target_view = None;

        assert!(matches!(state.draw(None), Err(RendererError::MissingRenderTarget)));
    }

    // ── draw errors ───────────────────────────────────────────────────────

    #[test]
    fn failed_allocation_leaves_no_buffer_and_nothing_to_draw() {
        let (backend, mut state) = renderer();
        let small = quad();
        let mut large = quad();
        large.extend(quad());
        state.draw(Some(&DrawData::new(&small))).unwrap();

        backend.set_failing_op(Some(HeadlessOp::CreateVertexBuffer));
        let err = state.draw(Some(&DrawData::new(&large))).unwrap_err();

        assert!(matches!(err, RendererError::VertexBuffer { byte_width: 144, .. }));
        assert!(!state.handles().vertex_buffer);
        assert_eq!(state.vertex_count(), 0);
        assert_eq!(backend.live_handles(), 7);
        assert_eq!(backend.recording().presents.len(), 1);
    }

    #[test]
    fn failed_upload_is_returned_and_resets_vertex_count() {
        let (backend, mut state) = renderer();
        let vertices = quad();
        state.draw(Some(&DrawData::new(&vertices))).unwrap();

        backend.set_failing_op(Some(HeadlessOp::WriteVertexBuffer));
        let err = state.draw(Some(&DrawData::new(&vertices))).unwrap_err();

        assert!(matches!(err, RendererError::Upload(_)));
        assert_eq!(state.vertex_count(), 0);
        assert!(state.handles().vertex_buffer);
        assert_eq!(backend.recording().draws.len(), 1);
    }

    #[test]
    fn failed_present_is_returned() {
        let (backend, mut state) = renderer();
        let vertices = quad();
        backend.set_failing_op(Some(HeadlessOp::Present));

        let err = state.draw(Some(&DrawData::new(&vertices))).unwrap_err();

        assert!(matches!(err, RendererError::Present(_)));
        // the frame was drawn, only presentation failed
        assert_eq!(backend.recording().draws.len(), 1);
        assert!(backend.recording().presents.is_empty());
    }

    // ── cleanup ───────────────────────────────────────────────────────────

    #[test]
    fn cleanup_twice_releases_everything() {
        let (backend, mut state) = renderer();
        let vertices = quad();
        state.draw(Some(&DrawData::new(&vertices))).unwrap();

        state.cleanup();
        assert!(state.handles().all_released());
        assert_eq!(backend.live_handles(), 0);

        state.cleanup();
        assert!(state.handles().all_released());
        assert_eq!(state.vertex_count(), 0);
    }

    #[test]
    fn draw_after_cleanup_is_rejected() {
        let (_backend, mut state) = renderer();
        state.cleanup();

        assert!(matches!(state.draw(None), Err(RendererError::Released)));
        assert!(matches!(state.resize(10, 10), Err(RendererError::Released)));
    }

    #[test]
    fn dropping_state_releases_handles() {
        let (backend, state) = renderer();
        drop(state);
        assert_eq!(backend.live_handles(), 0);
    }
}
