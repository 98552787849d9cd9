//! Vertex types for textured quads

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::Image;
use crate::geometry::normalized_point;

/// 2D vertex with clip-space position and texture coordinate
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
}

impl TexturedVertex {
    pub const fn new(position: Vec2, tex_coords: Vec2) -> Self {
        Self {
            position: [position.x, position.y],
            tex_coords: [tex_coords.x, tex_coords.y],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
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
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Texture-space corners. Texture space has (0, 0) at the top left and
/// (1, 1) at the bottom right.
pub struct TexturePoints;

impl TexturePoints {
    pub const TOP_LEFT: Vec2 = Vec2::new(0.0, 0.0);
    pub const TOP_RIGHT: Vec2 = Vec2::new(1.0, 0.0);
    pub const BOTTOM_LEFT: Vec2 = Vec2::new(0.0, 1.0);
    pub const BOTTOM_RIGHT: Vec2 = Vec2::new(1.0, 1.0);
}

/// Vertices per image quad
pub const QUAD_VERTICES: u32 = 6;

/// Two triangles covering `image.frame`, in normalized device coordinates
pub fn quad_vertices(image: &Image, drawable_size: Vec2, scale: f32) -> [TexturedVertex; 6] {
    let frame = &image.frame;
    let ndc = |p: Vec2| normalized_point(p, drawable_size, scale);

    let bottom_left = TexturedVertex::new(ndc(frame.bottom_left()), TexturePoints::BOTTOM_LEFT);
    let top_left = TexturedVertex::new(ndc(frame.top_left()), TexturePoints::TOP_LEFT);
    let top_right = TexturedVertex::new(ndc(frame.top_right()), TexturePoints::TOP_RIGHT);
    let bottom_right = TexturedVertex::new(ndc(frame.bottom_right()), TexturePoints::BOTTOM_RIGHT);

    [
        // Triangle 1
        bottom_left,
        top_left,
        top_right,
        // Triangle 2
        top_right,
        bottom_right,
        bottom_left,
    ]
}
