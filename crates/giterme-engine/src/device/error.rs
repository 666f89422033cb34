use std::fmt;

use thiserror::Error;

/// Error produced by a backend call.
///
/// Backends wrap their native error type (e.g. an `HRESULT`) so the renderer
/// stays platform-neutral.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The fallible steps of renderer initialization, in execution order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InitStep {
    CreateDeviceAndSwapChain,
    ConfigureDebugLayer,
    CreateRenderTargetView,
    CompileVertexShader,
    CreateVertexShader,
    CreateInputLayout,
    CompilePixelShader,
    CreatePixelShader,
}

impl InitStep {
    pub const ALL: [InitStep; 8] = [
        InitStep::CreateDeviceAndSwapChain,
        InitStep::ConfigureDebugLayer,
        InitStep::CreateRenderTargetView,
        InitStep::CompileVertexShader,
        InitStep::CreateVertexShader,
        InitStep::CreateInputLayout,
        InitStep::CompilePixelShader,
        InitStep::CreatePixelShader,
    ];
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InitStep::CreateDeviceAndSwapChain => "create device, context and swap chain",
            InitStep::ConfigureDebugLayer => "configure debug layer",
            InitStep::CreateRenderTargetView => "create render target view",
            InitStep::CompileVertexShader => "compile vertex shader",
            InitStep::CreateVertexShader => "create vertex shader",
            InitStep::CreateInputLayout => "create input layout",
            InitStep::CompilePixelShader => "compile pixel shader",
            InitStep::CreatePixelShader => "create pixel shader",
        };
        f.write_str(s)
    }
}

/// Shader compilation failure carrying the compiler's diagnostic text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ShaderCompileError {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("{step} failed: {source}")]
    Init {
        step: InitStep,
        #[source]
        source: BackendError,
    },

    #[error("failed to allocate a {byte_width}-byte vertex buffer: {source}")]
    VertexBuffer {
        byte_width: u32,
        #[source]
        source: BackendError,
    },

    #[error("failed to upload vertex data: {0}")]
    Upload(#[source] BackendError),

    #[error("failed to query back buffer size: {0}")]
    BackBuffer(#[source] BackendError),

    #[error("failed to resize swap chain to {width}x{height}: {source}")]
    Resize {
        width: u32,
        height: u32,
        #[source]
        source: BackendError,
    },

    #[error("present failed: {0}")]
    Present(#[source] BackendError),

    #[error("draw data holds {0} vertices, more than a single draw call can address")]
    TooManyVertices(usize),

    #[error("no render target view; the last resize could not rebuild it")]
    MissingRenderTarget,

    #[error("renderer resources have already been released")]
    Released,
}

impl RendererError {
    /// Initialization step that failed, if this is an initialization error.
    pub fn init_step(&self) -> Option<InitStep> {
        match self {
            RendererError::Init { step, .. } => Some(*step),
            _ => None,
        }
    }
}
