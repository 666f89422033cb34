//! Graphics device layer.
//!
//! This module is responsible for:
//! - the [`Backend`] contract the renderer drives
//! - platform-neutral descriptors (swap chain, shaders, input layout, viewport)
//! - the Direct3D 11 backend (Windows only)
//! - a headless backend that records submitted work

mod backend;
mod desc;
mod error;
pub mod headless;

#[cfg(windows)]
mod d3d11;

pub use backend::{Backend, BackendResult, PipelineBindings};
pub use desc::{
    InputElement, ShaderSource, ShaderStage, SurfaceTarget, SwapChainDesc, Topology, VertexFormat,
    Viewport,
};
pub use error::{BackendError, InitStep, RendererError, ShaderCompileError};
pub use headless::{HeadlessBackend, HeadlessOp};

#[cfg(windows)]
pub use d3d11::{Direct3D11, Direct3D11Error};
