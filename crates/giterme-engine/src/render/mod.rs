//! Quad renderer.
//!
//! [`RendererState`] owns the device, swap chain and fixed pipeline, and
//! draws caller-supplied [`Vertex`] lists once per frame.
//!
//! Convention:
//! - vertex positions are already in clip space (no transform).
//! - colors are packed `0xAABBGGRR`.

pub mod pipeline;
mod renderer;
mod vertex;

pub use renderer::{HandleSet, RendererConfig, RendererState};
pub use vertex::{DrawData, Vertex, pack_color};
