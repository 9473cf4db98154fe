//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in canvas units with a linear RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// sRGB channel (0-1) to linear
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// `0xRRGGBB` web color with alpha, as a linear color for an sRGB target
pub fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0);
    [channel(16), channel(8), channel(0), alpha]
}

/// Web colors for game elements
pub mod colors {
    pub const BACKGROUND_CENTER: u32 = 0xE6F3FF;
    pub const BACKGROUND_EDGE: u32 = 0xB8E0D2;
    pub const BUBBLE: u32 = 0xFFFFFF;
    pub const BUBBLE_ALPHA: f32 = 0.3;

    pub const FRAME: u32 = 0x8B4513;
    /// Bulb and neck fill is the frame color at this alpha
    pub const FRAME_FILL_ALPHA: f32 = 0.1;
    pub const RING: u32 = 0xA0522D;

    pub const GOLD: u32 = 0xFFD700;
    pub const SPARKLE: u32 = 0xFFFFFF;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_matches_size() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 24);
        assert_eq!(desc.attributes.len(), 2);
    }

    #[test]
    fn test_rgba_extremes() {
        let white = rgba(0xFFFFFF, 0.3);
        assert!(white[..3].iter().all(|c| (c - 1.0).abs() < 1e-5));
        assert_eq!(white[3], 0.3);
        assert_eq!(rgba(0x000000, 1.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rgba_linearizes_channels() {
        let [r, g, b, a] = rgba(colors::FRAME, 1.0);
        // 0x8B = 139 -> ~0.258 linear; 0x45 = 69 -> ~0.060; 0x13 = 19 -> ~0.006
        assert!((r - 0.258).abs() < 0.002);
        assert!((g - 0.060).abs() < 0.002);
        assert!((b - 0.006).abs() < 0.002);
        assert_eq!(a, 1.0);
    }
}
