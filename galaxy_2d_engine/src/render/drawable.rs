/// Drawable trait and the stock vertex array drawable
///
/// Anything that can render itself into a target implements `Drawable`.
/// Implementations usually build a vertex list and hand it to
/// `RenderTarget::draw_vertices` with the states they were given,
/// combined with their own transform or texture.

use std::ops::{Index, IndexMut};
use crate::graphics::{FloatRect, PrimitiveType, Vertex};
use crate::render::{RenderStates, RenderTarget};

pub trait Drawable {
    fn draw(&self, target: &mut RenderTarget, states: &RenderStates);
}

/// Owned list of vertices drawn as one primitive stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexArray {
    vertices: Vec<Vertex>,
    primitive_type: PrimitiveType,
}

impl VertexArray {
    pub fn new(primitive_type: PrimitiveType) -> Self {
        Self { vertices: Vec::new(), primitive_type }
    }

    pub fn with_vertices(primitive_type: PrimitiveType, vertices: Vec<Vertex>) -> Self {
        Self { vertices, primitive_type }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn push(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// New vertices are default (black, at the origin)
    pub fn resize(&mut self, count: usize) {
        self.vertices.resize(count, Vertex::default());
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    pub fn set_primitive_type(&mut self, primitive_type: PrimitiveType) {
        self.primitive_type = primitive_type;
    }

    /// Smallest rectangle containing every vertex position
    pub fn bounds(&self) -> FloatRect {
        let Some(first) = self.vertices.first() else {
            return FloatRect::default();
        };
        let (min, max) = self.vertices.iter().fold((first.position, first.position), |(min, max), v| {
            (min.min(v.position), max.max(v.position))
        });
        FloatRect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

impl Index<usize> for VertexArray {
    type Output = Vertex;

    fn index(&self, index: usize) -> &Vertex {
        &self.vertices[index]
    }
}

impl IndexMut<usize> for VertexArray {
    fn index_mut(&mut self, index: usize) -> &mut Vertex {
        &mut self.vertices[index]
    }
}

impl Drawable for VertexArray {
    fn draw(&self, target: &mut RenderTarget, states: &RenderStates) {
        target.draw_vertices(&self.vertices, self.primitive_type, states);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "drawable_tests.rs"]
mod tests;
