/// RenderStates - per-draw parameters
///
/// Borrowed texture and shader must outlive the draw call they are
/// passed to; the states themselves are a cheap `Copy` value.

use crate::graphics::{BlendMode, Transform};
use crate::resource::{Shader, Texture};

#[derive(Debug, Clone, Copy)]
pub struct RenderStates<'a> {
    pub blend_mode: BlendMode,
    /// Model transform, applied before the view
    pub transform: Transform,
    pub texture: Option<&'a Texture>,
    /// Replaces the built-in program when set
    pub shader: Option<&'a Shader>,
}

impl<'a> RenderStates<'a> {
    /// Alpha blending, identity transform, no texture, no shader
    pub const DEFAULT: RenderStates<'static> = RenderStates {
        blend_mode: BlendMode::ALPHA,
        transform: Transform::IDENTITY,
        texture: None,
        shader: None,
    };

    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_texture(mut self, texture: &'a Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_shader(mut self, shader: &'a Shader) -> Self {
        self.shader = Some(shader);
        self
    }
}

impl Default for RenderStates<'_> {
    fn default() -> Self {
        RenderStates::DEFAULT
    }
}
