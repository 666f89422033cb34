//! Fixed pipeline: embedded shaders and the matching input layout.

use crate::device::{InputElement, ShaderSource, ShaderStage, Topology, VertexFormat};

use super::vertex::Vertex;

pub const VERTEX_SHADER: ShaderSource = ShaderSource {
    stage: ShaderStage::Vertex,
    name: "quad_vs.hlsl",
    hlsl: include_str!("shaders/quad_vs.hlsl"),
    entry_point: "vs_main",
    profile: "vs_5_0",
};

pub const PIXEL_SHADER: ShaderSource = ShaderSource {
    stage: ShaderStage::Pixel,
    name: "quad_ps.hlsl",
    hlsl: include_str!("shaders/quad_ps.hlsl"),
    entry_point: "ps_main",
    profile: "ps_5_0",
};

/// Per-vertex attributes of [`Vertex`], matching `VS_Input`.
pub const INPUT_LAYOUT: [InputElement; 2] = [
    InputElement {
        semantic: "POS",
        format: VertexFormat::Float32x2,
        offset: Vertex::POSITION_OFFSET,
    },
    InputElement {
        semantic: "COL",
        format: VertexFormat::Unorm8x4,
        offset: Vertex::COLOR_OFFSET,
    },
];

pub const TOPOLOGY: Topology = Topology::TriangleList;
