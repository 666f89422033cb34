use std::fmt::Debug;

use super::desc::{InputElement, ShaderSource, SurfaceTarget, SwapChainDesc, Topology, Viewport};
use super::error::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;

/// Native graphics API used by the renderer.
///
/// The renderer owns every handle; a backend only creates them and issues
/// calls against them. Dropping a handle releases it. Implementations exist
/// for Direct3D 11 (Windows) and a CPU-side headless recorder, which also
/// serves as the test double.
pub trait Backend {
    type Device: Debug;
    type Context: Debug;
    type SwapChain: Debug;
    type RenderTargetView: Debug;
    type VertexShader: Debug;
    type PixelShader: Debug;
    type InputLayout: Debug;
    type Buffer: Debug;
    /// Compiled shader bytecode. Only needed during initialization.
    type Bytecode;

    fn create_device_and_swap_chain(
        &self,
        target: &SurfaceTarget,
        desc: &SwapChainDesc,
        debug_layer: bool,
    ) -> BackendResult<(Self::Device, Self::Context, Self::SwapChain)>;

    /// Makes the debug layer break on corruption- and error-severity
    /// messages. Nothing is retained after configuration.
    fn configure_debug_layer(&self, device: &Self::Device) -> BackendResult<()>;

    /// Creates a render-target view over back buffer 0.
    fn create_render_target_view(
        &self,
        device: &Self::Device,
        swap_chain: &Self::SwapChain,
    ) -> BackendResult<Self::RenderTargetView>;

    fn compile_shader(&self, source: &ShaderSource) -> BackendResult<Self::Bytecode>;

    fn create_vertex_shader(
        &self,
        device: &Self::Device,
        bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::VertexShader>;

    fn create_pixel_shader(
        &self,
        device: &Self::Device,
        bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::PixelShader>;

    /// `bytecode` is the vertex shader whose input signature the layout must match.
    fn create_input_layout(
        &self,
        device: &Self::Device,
        elements: &[InputElement],
        bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::InputLayout>;

    /// Creates a CPU-writable, GPU-readable vertex buffer.
    fn create_vertex_buffer(
        &self,
        device: &Self::Device,
        byte_width: u32,
    ) -> BackendResult<Self::Buffer>;

    fn vertex_buffer_byte_width(&self, buffer: &Self::Buffer) -> u32;

    /// Maps `buffer` with discard semantics, copies `bytes` to its start and
    /// unmaps it. `bytes` must fit the buffer.
    fn write_vertex_buffer(
        &self,
        context: &Self::Context,
        buffer: &mut Self::Buffer,
        bytes: &[u8],
    ) -> BackendResult<()>;

    /// Current back buffer size in physical pixels.
    fn back_buffer_size(&self, swap_chain: &Self::SwapChain) -> BackendResult<(u32, u32)>;

    /// Resizes the swap chain buffers. No view onto a back buffer may be alive.
    fn resize_buffers(
        &self,
        swap_chain: &Self::SwapChain,
        width: u32,
        height: u32,
    ) -> BackendResult<()>;

    /// Binds the fixed pipeline state and issues a non-indexed draw.
    fn draw(&self, context: &Self::Context, bindings: &PipelineBindings<'_, Self>, vertex_count: u32);

    fn present(&self, swap_chain: &Self::SwapChain, sync_interval: u32) -> BackendResult<()>;
}

/// Pipeline state bound before every draw.
pub struct PipelineBindings<'a, B: Backend + ?Sized> {
    pub input_layout: &'a B::InputLayout,
    pub vertex_buffer: Option<&'a B::Buffer>,
    pub stride: u32,
    pub offset: u32,
    pub topology: Topology,
    pub vertex_shader: &'a B::VertexShader,
    pub pixel_shader: &'a B::PixelShader,
    pub render_target_view: &'a B::RenderTargetView,
    pub viewport: Viewport,
}
