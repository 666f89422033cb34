//! CPU-only backend.
//!
//! Records what the renderer submits instead of talking to a GPU: buffer
//! allocations, uploaded bytes, bound pipeline state, draw calls and
//! presents. Every handle it hands out is counted while alive, so callers can
//! check that nothing leaks. A failure can be injected at any
//! initialization step.
//!
//! Cloning a `HeadlessBackend` shares its recording.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;

use super::backend::{Backend, BackendResult, PipelineBindings};
use super::desc::{
    InputElement, ShaderSource, ShaderStage, SurfaceTarget, SwapChainDesc, Topology, Viewport,
};
use super::error::{InitStep, ShaderCompileError};

#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("injected failure at `{0}`")]
    Injected(InitStep),

    #[error("injected failure in `{0:?}`")]
    InjectedOp(HeadlessOp),

    #[error("write of {len} bytes overruns a {capacity}-byte buffer")]
    Overrun { len: usize, capacity: usize },

    #[error("zero-byte buffers cannot be created")]
    EmptyBuffer,
}

/// Operations used after initialization that can be made to fail.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HeadlessOp {
    CreateVertexBuffer,
    WriteVertexBuffer,
    ResizeBuffers,
    Present,
}

/// One recorded draw call with the state bound for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub vertex_count: u32,
    pub stride: u32,
    pub offset: u32,
    pub topology: Topology,
    pub viewport: Viewport,
    /// Byte width of the bound vertex buffer, `None` when nothing was bound.
    pub vertex_buffer_bytes: Option<u32>,
}

/// Everything submitted to a headless backend so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub debug_layer_configured: bool,
    pub compiled: Vec<(ShaderStage, &'static str, &'static str)>,
    pub input_layout: Vec<InputElement>,
    /// Byte widths of every vertex buffer created, in order.
    pub buffer_allocations: Vec<u32>,
    /// Bytes written by each upload, as the mapped buffer held them before unmap.
    pub uploads: Vec<Vec<u8>>,
    pub draws: Vec<DrawRecord>,
    /// Sync interval of each present.
    pub presents: Vec<u32>,
    pub resizes: Vec<(u32, u32)>,
}

#[derive(Debug, Default)]
struct Shared {
    fail_at: Cell<Option<InitStep>>,
    fail_op: Cell<Option<HeadlessOp>>,
    live: Cell<usize>,
    recording: RefCell<Recording>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    shared: Rc<Shared>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose `step` call fails.
    pub fn failing_at(step: InitStep) -> Self {
        let backend = Self::default();
        backend.shared.fail_at.set(Some(step));
        backend
    }

    /// Makes every later call of `op` fail until cleared with `None`.
    pub fn set_failing_op(&self, op: Option<HeadlessOp>) {
        self.shared.fail_op.set(op);
    }

    /// Number of handles created by this backend that are still alive.
    pub fn live_handles(&self) -> usize {
        self.shared.live.get()
    }

    pub fn recording(&self) -> Recording {
        self.shared.recording.borrow().clone()
    }

    fn check(&self, step: InitStep) -> BackendResult<()> {
        if self.shared.fail_at.get() == Some(step) {
            return Err(HeadlessError::Injected(step).into());
        }
        Ok(())
    }

    fn check_op(&self, op: HeadlessOp) -> BackendResult<()> {
        if self.shared.fail_op.get() == Some(op) {
            return Err(HeadlessError::InjectedOp(op).into());
        }
        Ok(())
    }

    fn live(&self) -> LiveToken {
        self.shared.live.set(self.shared.live.get() + 1);
        LiveToken(self.shared.clone())
    }

    fn record(&self, f: impl FnOnce(&mut Recording)) {
        f(&mut self.shared.recording.borrow_mut());
    }
}

/// Decrements the live-handle count when dropped.
#[derive(Debug)]
struct LiveToken(Rc<Shared>);

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.live.set(self.0.live.get() - 1);
    }
}

/// Opaque headless handle.
#[derive(Debug)]
pub struct HeadlessHandle {
    pub kind: &'static str,
    _live: LiveToken,
}

#[derive(Debug)]
pub struct HeadlessSwapChain {
    size: Cell<(u32, u32)>,
    _live: LiveToken,
}

#[derive(Debug)]
pub struct HeadlessBuffer {
    bytes: Vec<u8>,
    _live: LiveToken,
}

#[derive(Debug, Clone)]
pub struct HeadlessBytecode {
    pub stage: ShaderStage,
    pub entry_point: &'static str,
}

impl Backend for HeadlessBackend {
    type Device = HeadlessHandle;
    type Context = HeadlessHandle;
    type SwapChain = HeadlessSwapChain;
    type RenderTargetView = HeadlessHandle;
    type VertexShader = HeadlessHandle;
    type PixelShader = HeadlessHandle;
    type InputLayout = HeadlessHandle;
    type Buffer = HeadlessBuffer;
    type Bytecode = HeadlessBytecode;

    fn create_device_and_swap_chain(
        &self,
        _target: &SurfaceTarget,
        desc: &SwapChainDesc,
        _debug_layer: bool,
    ) -> BackendResult<(Self::Device, Self::Context, Self::SwapChain)> {
        self.check(InitStep::CreateDeviceAndSwapChain)?;

        let device = HeadlessHandle {
            kind: "device",
            _live: self.live(),
        };
        let context = HeadlessHandle {
            kind: "context",
            _live: self.live(),
        };
        let swap_chain = HeadlessSwapChain {
            size: Cell::new((desc.width, desc.height)),
            _live: self.live(),
        };
        Ok((device, context, swap_chain))
    }

    fn configure_debug_layer(&self, _device: &Self::Device) -> BackendResult<()> {
        self.check(InitStep::ConfigureDebugLayer)?;
        self.record(|r| r.debug_layer_configured = true);
        Ok(())
    }

    fn create_render_target_view(
        &self,
        _device: &Self::Device,
        _swap_chain: &Self::SwapChain,
    ) -> BackendResult<Self::RenderTargetView> {
        self.check(InitStep::CreateRenderTargetView)?;
        Ok(HeadlessHandle {
            kind: "render target view",
            _live: self.live(),
        })
    }

    fn compile_shader(&self, source: &ShaderSource) -> BackendResult<Self::Bytecode> {
        self.check(match source.stage {
            ShaderStage::Vertex => InitStep::CompileVertexShader,
            ShaderStage::Pixel => InitStep::CompilePixelShader,
        })?;

        if !source.hlsl.contains(&format!("{}(", source.entry_point)) {
            return Err(ShaderCompileError {
                message: format!("{}: entry point `{}` not found", source.name, source.entry_point),
            }
            .into());
        }

        self.record(|r| {
            r.compiled
                .push((source.stage, source.entry_point, source.profile))
        });
        Ok(HeadlessBytecode {
            stage: source.stage,
            entry_point: source.entry_point,
        })
    }

    fn create_vertex_shader(
        &self,
        _device: &Self::Device,
        _bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::VertexShader> {
        self.check(InitStep::CreateVertexShader)?;
        Ok(HeadlessHandle {
            kind: "vertex shader",
            _live: self.live(),
        })
    }

    fn create_pixel_shader(
        &self,
        _device: &Self::Device,
        _bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::PixelShader> {
        self.check(InitStep::CreatePixelShader)?;
        Ok(HeadlessHandle {
            kind: "pixel shader",
            _live: self.live(),
        })
    }

    fn create_input_layout(
        &self,
        _device: &Self::Device,
        elements: &[InputElement],
        _bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::InputLayout> {
        self.check(InitStep::CreateInputLayout)?;
        self.record(|r| r.input_layout = elements.to_vec());
        Ok(HeadlessHandle {
            kind: "input layout",
            _live: self.live(),
        })
    }

    fn create_vertex_buffer(
        &self,
        _device: &Self::Device,
        byte_width: u32,
    ) -> BackendResult<Self::Buffer> {
        self.check_op(HeadlessOp::CreateVertexBuffer)?;
        if byte_width == 0 {
            return Err(HeadlessError::EmptyBuffer.into());
        }
        self.record(|r| r.buffer_allocations.push(byte_width));
        Ok(HeadlessBuffer {
            bytes: vec![0; byte_width as usize],
            _live: self.live(),
        })
    }

    fn vertex_buffer_byte_width(&self, buffer: &Self::Buffer) -> u32 {
        buffer.bytes.len() as u32
    }

    fn write_vertex_buffer(
        &self,
        _context: &Self::Context,
        buffer: &mut Self::Buffer,
        bytes: &[u8],
    ) -> BackendResult<()> {
        self.check_op(HeadlessOp::WriteVertexBuffer)?;
        let capacity = buffer.bytes.len();
        if bytes.len() > capacity {
            return Err(HeadlessError::Overrun {
                len: bytes.len(),
                capacity,
            }
            .into());
        }

        // Discard: previous contents are undefined after the map.
        buffer.bytes.fill(0);
        buffer.bytes[..bytes.len()].copy_from_slice(bytes);

        self.record(|r| r.uploads.push(buffer.bytes[..bytes.len()].to_vec()));
        Ok(())
    }

    fn back_buffer_size(&self, swap_chain: &Self::SwapChain) -> BackendResult<(u32, u32)> {
        Ok(swap_chain.size.get())
    }

    fn resize_buffers(
        &self,
        swap_chain: &Self::SwapChain,
        width: u32,
        height: u32,
    ) -> BackendResult<()> {
        self.check_op(HeadlessOp::ResizeBuffers)?;
        swap_chain.size.set((width, height));
        self.record(|r| r.resizes.push((width, height)));
        Ok(())
    }

    fn draw(&self, _context: &Self::Context, bindings: &PipelineBindings<'_, Self>, vertex_count: u32) {
        let record = DrawRecord {
            vertex_count,
            stride: bindings.stride,
            offset: bindings.offset,
            topology: bindings.topology,
            viewport: bindings.viewport,
            vertex_buffer_bytes: bindings.vertex_buffer.map(|b| b.bytes.len() as u32),
        };
        self.record(|r| r.draws.push(record));
    }

    fn present(&self, _swap_chain: &Self::SwapChain, sync_interval: u32) -> BackendResult<()> {
        self.check_op(HeadlessOp::Present)?;
        self.record(|r| r.presents.push(sync_interval));
        Ok(())
    }
}
