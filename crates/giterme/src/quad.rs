use giterme_engine::render::{Vertex, pack_color};

const RED: u32 = pack_color(0xff, 0x00, 0x00, 0xff);
const GREEN: u32 = pack_color(0x00, 0xff, 0x00, 0xff);
const BLUE: u32 = pack_color(0x00, 0x00, 0xff, 0xff);

/// Two triangles covering the middle of clip space.
pub const QUAD: [Vertex; 6] = [
    Vertex::new(-0.5, -0.5, RED),
    Vertex::new(-0.5, 0.5, GREEN),
    Vertex::new(0.5, -0.5, BLUE),
    Vertex::new(0.5, -0.5, BLUE),
    Vertex::new(-0.5, 0.5, GREEN),
    Vertex::new(0.5, 0.5, RED),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_colors_are_packed_abgr() {
        assert_eq!(QUAD[0].col, 0xff0000ff);
        assert_eq!(QUAD[1].col, 0xff00ff00);
        assert_eq!(QUAD[2].col, 0xffff0000);
        assert_eq!(QUAD[5].col, 0xff0000ff);
    }

    #[test]
    fn triangles_share_the_diagonal() {
        assert_eq!(QUAD[1], QUAD[4]);
        assert_eq!(QUAD[2], QUAD[3]);
    }
}
