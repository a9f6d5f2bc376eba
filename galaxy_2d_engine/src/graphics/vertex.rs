/// Vertex format consumed by the 2D pipeline
///
/// The layout is fixed: position (2 x f32), color (4 x u8 normalized),
/// texture coordinates (2 x f32). The attribute table below must stay in
/// sync with the struct, it is what the device uses to declare the
/// vertex attributes.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use crate::graphics::color::Color;

/// A point with color and texture coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// 2D position (world units)
    pub position: Vec2,
    /// Vertex color, multiplied with the sampled texel
    pub color: Color,
    /// Texture coordinates, normalized to [0, 1]
    pub tex_coords: Vec2,
}

impl Vertex {
    pub const fn new(position: Vec2, color: Color, tex_coords: Vec2) -> Self {
        Self { position, color, tex_coords }
    }

    /// Untextured vertex
    pub const fn colored(position: Vec2, color: Color) -> Self {
        Self { position, color, tex_coords: Vec2::ZERO }
    }

    /// Byte stride of one vertex in a vertex buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Attribute declarations, in binding order (location 0, 1, 2)
    pub const LAYOUT: [VertexAttribute; 3] = [
        VertexAttribute {
            location: 0,
            components: 2,
            kind: AttributeKind::Float,
            normalized: false,
            offset: std::mem::offset_of!(Vertex, position),
        },
        VertexAttribute {
            location: 1,
            components: 4,
            kind: AttributeKind::UnsignedByte,
            normalized: true,
            offset: std::mem::offset_of!(Vertex, color),
        },
        VertexAttribute {
            location: 2,
            components: 2,
            kind: AttributeKind::Float,
            normalized: false,
            offset: std::mem::offset_of!(Vertex, tex_coords),
        },
    ];

    /// Shader attribute names matching `LAYOUT` locations
    pub const ATTRIBUTE_NAMES: [&'static str; 3] = ["a_position", "a_color", "a_tex_coords"];
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float,
    UnsignedByte,
}

/// One vertex attribute declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub kind: AttributeKind,
    pub normalized: bool,
    pub offset: usize,
}

/// How a vertex stream is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
