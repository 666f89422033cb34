use std::fmt;

use raw_window_handle::RawWindowHandle;

/// Window the swap chain presents into.
///
/// The handle is owned by the windowing layer and must outlive the device
/// created from it.
#[derive(Debug, Copy, Clone)]
pub struct SurfaceTarget {
    pub handle: RawWindowHandle,
    /// Client-area width in physical pixels.
    pub width: u32,
    /// Client-area height in physical pixels.
    pub height: u32,
}

/// Swap chain parameters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SwapChainDesc {
    pub width: u32,
    pub height: u32,
    pub buffer_count: u32,
    /// Refresh rate as `(numerator, denominator)`.
    pub refresh_rate: (u32, u32),
}

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Pixel => f.write_str("pixel"),
        }
    }
}

/// HLSL source embedded in the binary, compiled once at startup.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    /// Debug name passed to the compiler.
    pub name: &'static str,
    pub hlsl: &'static str,
    pub entry_point: &'static str,
    /// Compiler target profile, e.g. `vs_5_0`.
    pub profile: &'static str,
}

/// Attribute formats understood by the input assembler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexFormat {
    /// Two 32-bit floats.
    Float32x2,
    /// Four 8-bit channels normalized to `[0, 1]`.
    Unorm8x4,
}

impl VertexFormat {
    pub const fn size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Unorm8x4 => 4,
        }
    }
}

/// One per-vertex attribute of the input layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct InputElement {
    pub semantic: &'static str,
    pub format: VertexFormat,
    /// Byte offset inside one vertex record.
    pub offset: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    TriangleList,
}

/// Rasterizer viewport in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Full-surface viewport with the `[0, 1]` depth range.
    pub fn covering(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}
