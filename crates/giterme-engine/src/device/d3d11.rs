//! Direct3D 11 backend.
//!
//! Thin wrapper over the `windows` crate. Every handle is a COM reference
//! released by `Drop`.

use std::ffi::{CString, c_void};

use raw_window_handle::RawWindowHandle;
use thiserror::Error;
use windows::Win32::Foundation::{BOOL, HWND};
use windows::Win32::Graphics::Direct3D::Fxc::D3DCompile;
use windows::Win32::Graphics::Direct3D::{
    D3D_DRIVER_TYPE_HARDWARE, D3D_FEATURE_LEVEL_11_0, D3D_PRIMITIVE_TOPOLOGY,
    D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST, ID3DBlob,
};
use windows::Win32::Graphics::Direct3D11::{
    D3D11_BIND_VERTEX_BUFFER, D3D11_BUFFER_DESC, D3D11_CPU_ACCESS_WRITE,
    D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_CREATE_DEVICE_DEBUG, D3D11_INPUT_ELEMENT_DESC,
    D3D11_INPUT_PER_VERTEX_DATA, D3D11_MAP_WRITE_DISCARD, D3D11_MAPPED_SUBRESOURCE,
    D3D11_MESSAGE_SEVERITY_CORRUPTION, D3D11_MESSAGE_SEVERITY_ERROR, D3D11_SDK_VERSION,
    D3D11_USAGE_DYNAMIC, D3D11_VIEWPORT, D3D11CreateDeviceAndSwapChain, ID3D11Buffer,
    ID3D11Debug, ID3D11Device, ID3D11DeviceContext, ID3D11InfoQueue, ID3D11InputLayout,
    ID3D11PixelShader, ID3D11RenderTargetView, ID3D11Texture2D, ID3D11VertexShader,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT, DXGI_FORMAT_B8G8R8A8_UNORM, DXGI_FORMAT_R8G8B8A8_UNORM,
    DXGI_FORMAT_R32G32_FLOAT, DXGI_FORMAT_UNKNOWN, DXGI_MODE_DESC, DXGI_RATIONAL,
    DXGI_SAMPLE_DESC,
};
use windows::Win32::Graphics::Dxgi::{
    DXGI_PRESENT, DXGI_SWAP_CHAIN_DESC, DXGI_SWAP_CHAIN_FLAG, DXGI_SWAP_EFFECT_FLIP_DISCARD,
    DXGI_USAGE_RENDER_TARGET_OUTPUT, IDXGISwapChain,
};
use windows::core::{Interface, PCSTR};

use super::backend::{Backend, BackendResult, PipelineBindings};
use super::desc::{InputElement, ShaderSource, SurfaceTarget, SwapChainDesc, Topology, VertexFormat};
use super::error::ShaderCompileError;

#[derive(Debug, Error)]
pub enum Direct3D11Error {
    #[error("Direct3D 11 needs a Win32 window handle, got {0}")]
    UnsupportedWindow(String),

    #[error("{0} call succeeded without returning an object")]
    MissingOutput(&'static str),

    #[error("write of {len} bytes overruns a {capacity}-byte buffer")]
    Overrun { len: usize, capacity: u32 },
}

/// Hardware Direct3D 11 device, feature level 11_0.
#[derive(Debug, Copy, Clone, Default)]
pub struct Direct3D11;

impl Direct3D11 {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(target: &SurfaceTarget) -> BackendResult<HWND> {
    match target.handle {
        RawWindowHandle::Win32(handle) => Ok(HWND(handle.hwnd.get() as *mut c_void)),
        other => Err(Direct3D11Error::UnsupportedWindow(format!("{other:?}")).into()),
    }
}

fn out<T>(value: Option<T>, call: &'static str) -> BackendResult<T> {
    value.ok_or_else(|| Direct3D11Error::MissingOutput(call).into())
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    // SAFETY: the blob owns `GetBufferSize()` bytes at `GetBufferPointer()`
    // for as long as it is alive.
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer().cast::<u8>(), blob.GetBufferSize()) }
}

fn dxgi_format(format: VertexFormat) -> DXGI_FORMAT {
    match format {
        VertexFormat::Float32x2 => DXGI_FORMAT_R32G32_FLOAT,
        VertexFormat::Unorm8x4 => DXGI_FORMAT_R8G8B8A8_UNORM,
    }
}

fn primitive_topology(topology: Topology) -> D3D_PRIMITIVE_TOPOLOGY {
    match topology {
        Topology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
    }
}

impl Backend for Direct3D11 {
    type Device = ID3D11Device;
    type Context = ID3D11DeviceContext;
    type SwapChain = IDXGISwapChain;
    type RenderTargetView = ID3D11RenderTargetView;
    type VertexShader = ID3D11VertexShader;
    type PixelShader = ID3D11PixelShader;
    type InputLayout = ID3D11InputLayout;
    type Buffer = ID3D11Buffer;
    type Bytecode = ID3DBlob;

    fn create_device_and_swap_chain(
        &self,
        target: &SurfaceTarget,
        desc: &SwapChainDesc,
        debug_layer: bool,
    ) -> BackendResult<(Self::Device, Self::Context, Self::SwapChain)> {
        let swap_chain_desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: desc.width,
                Height: desc.height,
                RefreshRate: DXGI_RATIONAL {
                    Numerator: desc.refresh_rate.0,
                    Denominator: desc.refresh_rate.1,
                },
                Format: DXGI_FORMAT_B8G8R8A8_UNORM,
                ..Default::default()
            },
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: desc.buffer_count,
            OutputWindow: hwnd(target)?,
            Windowed: true.into(),
            SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
            ..Default::default()
        };

        let mut flags = D3D11_CREATE_DEVICE_BGRA_SUPPORT;
        if debug_layer {
            flags |= D3D11_CREATE_DEVICE_DEBUG;
        }

        let mut swap_chain = None;
        let mut device = None;
        let mut context = None;

        unsafe {
            D3D11CreateDeviceAndSwapChain(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                None,
                flags,
                Some(&[D3D_FEATURE_LEVEL_11_0]),
                D3D11_SDK_VERSION,
                Some(&swap_chain_desc),
                Some(&mut swap_chain),
                Some(&mut device),
                None,
                Some(&mut context),
            )?;
        }

        Ok((
            out(device, "D3D11CreateDeviceAndSwapChain")?,
            out(context, "D3D11CreateDeviceAndSwapChain")?,
            out(swap_chain, "D3D11CreateDeviceAndSwapChain")?,
        ))
    }

    fn configure_debug_layer(&self, device: &Self::Device) -> BackendResult<()> {
        let debug: ID3D11Debug = device.cast()?;
        let info_queue: ID3D11InfoQueue = debug.cast()?;

        unsafe {
            info_queue.SetBreakOnSeverity(D3D11_MESSAGE_SEVERITY_CORRUPTION, BOOL::from(true))?;
            info_queue.SetBreakOnSeverity(D3D11_MESSAGE_SEVERITY_ERROR, BOOL::from(true))?;
        }

        Ok(())
    }

    fn create_render_target_view(
        &self,
        device: &Self::Device,
        swap_chain: &Self::SwapChain,
    ) -> BackendResult<Self::RenderTargetView> {
        let back_buffer: ID3D11Texture2D = unsafe { swap_chain.GetBuffer(0)? };
        log::debug!("acquired back buffer {back_buffer:?}");

        let mut view = None;
        unsafe { device.CreateRenderTargetView(&back_buffer, None, Some(&mut view))? };
        out(view, "CreateRenderTargetView")
    }

    fn compile_shader(&self, source: &ShaderSource) -> BackendResult<Self::Bytecode> {
        let name = CString::new(source.name)?;
        let entry_point = CString::new(source.entry_point)?;
        let profile = CString::new(source.profile)?;

        let mut code = None;
        let mut errors = None;

        let result = unsafe {
            D3DCompile(
                source.hlsl.as_ptr().cast(),
                source.hlsl.len(),
                PCSTR(name.as_ptr().cast()),
                None,
                None,
                PCSTR(entry_point.as_ptr().cast()),
                PCSTR(profile.as_ptr().cast()),
                0,
                0,
                &mut code,
                Some(&mut errors),
            )
        };

        if let Err(e) = result {
            let message = match errors.as_ref() {
                Some(blob) => String::from_utf8_lossy(blob_bytes(blob))
                    .trim_end_matches('\0')
                    .trim_end()
                    .to_string(),
                None => e.to_string(),
            };
            return Err(ShaderCompileError { message }.into());
        }

        out(code, "D3DCompile")
    }

    fn create_vertex_shader(
        &self,
        device: &Self::Device,
        bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::VertexShader> {
        let mut shader = None;
        unsafe { device.CreateVertexShader(blob_bytes(bytecode), None, Some(&mut shader))? };
        out(shader, "CreateVertexShader")
    }

    fn create_pixel_shader(
        &self,
        device: &Self::Device,
        bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::PixelShader> {
        let mut shader = None;
        unsafe { device.CreatePixelShader(blob_bytes(bytecode), None, Some(&mut shader))? };
        out(shader, "CreatePixelShader")
    }

    fn create_input_layout(
        &self,
        device: &Self::Device,
        elements: &[InputElement],
        bytecode: &Self::Bytecode,
    ) -> BackendResult<Self::InputLayout> {
        // Semantic names must stay alive until the layout is created.
        let semantics = elements
            .iter()
            .map(|e| CString::new(e.semantic))
            .collect::<Result<Vec<_>, _>>()?;

        let descs: Vec<D3D11_INPUT_ELEMENT_DESC> = elements
            .iter()
            .zip(&semantics)
            .map(|(element, semantic)| D3D11_INPUT_ELEMENT_DESC {
                SemanticName: PCSTR(semantic.as_ptr().cast()),
                SemanticIndex: 0,
                Format: dxgi_format(element.format),
                InputSlot: 0,
                AlignedByteOffset: element.offset,
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            })
            .collect();

        let mut layout = None;
        unsafe { device.CreateInputLayout(&descs, blob_bytes(bytecode), Some(&mut layout))? };
        out(layout, "CreateInputLayout")
    }

    fn create_vertex_buffer(
        &self,
        device: &Self::Device,
        byte_width: u32,
    ) -> BackendResult<Self::Buffer> {
        let desc = D3D11_BUFFER_DESC {
            ByteWidth: byte_width,
            Usage: D3D11_USAGE_DYNAMIC,
            BindFlags: D3D11_BIND_VERTEX_BUFFER.0 as u32,
            CPUAccessFlags: D3D11_CPU_ACCESS_WRITE.0 as u32,
            ..Default::default()
        };

        let mut buffer = None;
        unsafe { device.CreateBuffer(&desc, None, Some(&mut buffer))? };
        out(buffer, "CreateBuffer")
    }

    fn vertex_buffer_byte_width(&self, buffer: &Self::Buffer) -> u32 {
        let mut desc = D3D11_BUFFER_DESC::default();
        unsafe { buffer.GetDesc(&mut desc) };
        desc.ByteWidth
    }

    fn write_vertex_buffer(
        &self,
        context: &Self::Context,
        buffer: &mut Self::Buffer,
        bytes: &[u8],
    ) -> BackendResult<()> {
        let capacity = self.vertex_buffer_byte_width(buffer);
        if bytes.len() > capacity as usize {
            return Err(Direct3D11Error::Overrun {
                len: bytes.len(),
                capacity,
            }
            .into());
        }

        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            context.Map(&*buffer, 0, D3D11_MAP_WRITE_DISCARD, 0, Some(&mut mapped))?;
            // SAFETY: the mapping spans `capacity` bytes, checked above.
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), mapped.pData.cast::<u8>(), bytes.len());
            context.Unmap(&*buffer, 0);
        }

        Ok(())
    }

    fn back_buffer_size(&self, swap_chain: &Self::SwapChain) -> BackendResult<(u32, u32)> {
        let desc = unsafe { swap_chain.GetDesc()? };
        Ok((desc.BufferDesc.Width, desc.BufferDesc.Height))
    }

    fn resize_buffers(
        &self,
        swap_chain: &Self::SwapChain,
        width: u32,
        height: u32,
    ) -> BackendResult<()> {
        // Zero buffer count and unknown format keep the current ones.
        unsafe {
            swap_chain.ResizeBuffers(0, width, height, DXGI_FORMAT_UNKNOWN, DXGI_SWAP_CHAIN_FLAG(0))?
        };
        Ok(())
    }

    fn draw(&self, context: &Self::Context, bindings: &PipelineBindings<'_, Self>, vertex_count: u32) {
        let vertex_buffers = [bindings.vertex_buffer.cloned()];
        let strides = [bindings.stride];
        let offsets = [bindings.offset];
        let viewport = D3D11_VIEWPORT {
            TopLeftX: bindings.viewport.x,
            TopLeftY: bindings.viewport.y,
            Width: bindings.viewport.width,
            Height: bindings.viewport.height,
            MinDepth: bindings.viewport.min_depth,
            MaxDepth: bindings.viewport.max_depth,
        };

        unsafe {
            context.IASetInputLayout(bindings.input_layout);
            context.IASetVertexBuffers(
                0,
                1,
                Some(vertex_buffers.as_ptr()),
                Some(strides.as_ptr()),
                Some(offsets.as_ptr()),
            );
            context.IASetPrimitiveTopology(primitive_topology(bindings.topology));
            context.VSSetShader(bindings.vertex_shader, None);
            context.PSSetShader(bindings.pixel_shader, None);
            context.OMSetRenderTargets(Some(&[Some(bindings.render_target_view.clone())]), None);
            context.RSSetViewports(Some(&[viewport]));
            context.Draw(vertex_count, 0);
        }
    }

    fn present(&self, swap_chain: &Self::SwapChain, sync_interval: u32) -> BackendResult<()> {
        unsafe { swap_chain.Present(sync_interval, DXGI_PRESENT(0)).ok()? };
        Ok(())
    }
}
