use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};

/// Packs 8-bit channels into the vertex color layout (`0xAABBGGRR`).
///
/// In memory on little-endian hosts this is `[r, g, b, a]`, which the input
/// assembler reads as `R8G8B8A8_UNORM`.
#[inline]
pub const fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (a as u32) << 24 | (b as u32) << 16 | (g as u32) << 8 | r as u32
}

/// Vertex record: clip-space position plus packed color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    /// `0xAABBGGRR`, see [`pack_color`].
    pub col: u32,
}

impl Vertex {
    pub const STRIDE: u32 = size_of::<Vertex>() as u32;
    pub const POSITION_OFFSET: u32 = offset_of!(Vertex, pos) as u32;
    pub const COLOR_OFFSET: u32 = offset_of!(Vertex, col) as u32;

    #[inline]
    pub const fn new(x: f32, y: f32, col: u32) -> Self {
        Self { pos: [x, y], col }
    }
}

/// Vertices for one frame.
///
/// Borrowed from the caller; the renderer copies what it needs and never
/// keeps the slice past the call.
#[derive(Debug, Copy, Clone)]
pub struct DrawData<'a> {
    pub vertices: &'a [Vertex],
}

impl<'a> DrawData<'a> {
    #[inline]
    pub fn new(vertices: &'a [Vertex]) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_position_then_color() {
        assert_eq!(Vertex::STRIDE, 12);
        assert_eq!(Vertex::POSITION_OFFSET, 0);
        assert_eq!(Vertex::COLOR_OFFSET, 8);
    }

    #[test]
    fn packed_color_is_abgr() {
        assert_eq!(pack_color(0xff, 0x00, 0x00, 0xff), 0xff0000ff);
        assert_eq!(pack_color(0x00, 0xff, 0x00, 0xff), 0xff00ff00);
        assert_eq!(pack_color(0x00, 0x00, 0xff, 0xff), 0xffff0000);
    }

    #[test]
    fn bytes_follow_the_record_layout() {
        let v = [Vertex::new(-0.5, -0.5, 0xff0000ff)];
        let bytes = DrawData::new(&v).as_bytes();

        assert_eq!(bytes.len(), Vertex::STRIDE as usize);
        assert_eq!(&bytes[0..4], &(-0.5f32).to_ne_bytes());
        assert_eq!(&bytes[4..8], &(-0.5f32).to_ne_bytes());
        assert_eq!(&bytes[8..12], &0xff0000ffu32.to_ne_bytes());
    }
}
