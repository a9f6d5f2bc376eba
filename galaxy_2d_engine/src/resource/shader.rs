/// Shader - user supplied GPU program
///
/// A shader replaces the built-in program of the pipeline for the draws
/// that reference it in their `RenderStates`. Its vertex stage receives
/// the standard vertex attributes (`a_position`, `a_color`,
/// `a_tex_coords`) and, when it declares it, the `u_view_projection`
/// matrix of the draw.
///
/// Uniform locations are looked up once per name and cached, a missing
/// uniform is reported once and then silently ignored.

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use crate::{engine_debug, engine_warn};
use crate::error::Result;
use crate::graphics::{Color, Transform, Vertex};
use crate::graphics_device::{
    GraphicsDevice, ProgramHandle, SharedContext, TextureHandle, UniformLocation, UniformValue,
};
use crate::resource::Texture;

const SOURCE: &str = "galaxy2d::Shader";

/// Name of the combined view-projection uniform fed by the pipeline
pub const VIEW_PROJECTION_UNIFORM: &str = "u_view_projection";

/// A texture uniform and the texture bound to it
#[derive(Debug, Clone, Copy)]
struct TextureBinding {
    location: UniformLocation,
    texture: TextureHandle,
}

pub struct Shader {
    context: SharedContext,
    program: ProgramHandle,
    /// Location cache, `None` = known to be missing
    uniforms: FxHashMap<String, Option<UniformLocation>>,
    /// Texture uniforms, bound to units 1..=N in this order
    textures: Vec<TextureBinding>,
    /// Sampler receiving the texture of the draw (unit 0)
    current_texture: Option<UniformLocation>,
    view_projection: Option<UniformLocation>,
}

impl Shader {
    /// Compile and link a program from GLSL sources
    ///
    /// # Errors
    ///
    /// `BackendError` when compilation or linking fails, with the driver log.
    pub fn from_memory(context: &SharedContext, vertex_source: &str, fragment_source: &str) -> Result<Self> {
        let mut ctx = context.lock()?;
        let device = ctx.device_mut();
        let program = device.create_program(vertex_source, fragment_source, &Vertex::ATTRIBUTE_NAMES)?;
        let view_projection = device.uniform_location(program, VIEW_PROJECTION_UNIFORM);

        engine_debug!(SOURCE, "Shader program {} linked", program.raw());

        Ok(Self {
            context: context.clone(),
            program,
            uniforms: FxHashMap::default(),
            textures: Vec::new(),
            current_texture: None,
            view_projection,
        })
    }

    pub fn handle(&self) -> ProgramHandle {
        self.program
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    // ===== UNIFORMS =====

    /// Write a uniform; the program in use is restored afterwards
    ///
    /// Unknown names are ignored (with a warning the first time).
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        let Ok(mut ctx) = self.context.lock() else { return };
        let device = ctx.device_mut();
        let Some(location) = Self::location(&mut self.uniforms, device, self.program, name) else {
            return;
        };

        let previous = device.current_program();
        if previous != Some(self.program) {
            device.use_program(Some(self.program));
        }
        device.set_uniform(location, &value);
        if previous != Some(self.program) {
            device.use_program(previous);
        }
    }

    /// Sample `texture` through the sampler uniform `name`
    ///
    /// The texture must outlive every draw made with this shader. Units
    /// 1 and up are used, unit 0 being reserved for the draw's texture.
    pub fn set_texture(&mut self, name: &str, texture: &Texture) {
        let Some(handle) = texture.handle() else {
            engine_warn!(SOURCE, "Texture for uniform \"{}\" was never created, ignored", name);
            return;
        };
        let (location, max_units) = {
            let Ok(mut ctx) = self.context.lock() else { return };
            let max_units = ctx.capabilities().max_texture_units;
            let location = Self::location(&mut self.uniforms, ctx.device_mut(), self.program, name);
            (location, max_units)
        };
        let Some(location) = location else { return };

        if let Some(binding) = self.textures.iter_mut().find(|b| b.location == location) {
            binding.texture = handle;
            return;
        }

        if self.textures.len() + 1 >= max_units as usize {
            engine_warn!(
                SOURCE,
                "Impossible to use texture \"{}\" for shader: all available texture units are used",
                name
            );
            return;
        }
        self.textures.push(TextureBinding { location, texture: handle });
    }

    /// Make the sampler `name` receive the texture of the draw
    pub fn set_current_texture(&mut self, name: &str) {
        let Ok(mut ctx) = self.context.lock() else { return };
        self.current_texture = Self::location(&mut self.uniforms, ctx.device_mut(), self.program, name);
    }

    /// Number of texture units taken by texture uniforms
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // ===== PIPELINE SIDE =====

    /// Use the program and bind its textures; leaves unit 0 active
    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice) {
        if device.current_program() != Some(self.program) {
            device.use_program(Some(self.program));
        }
        for (index, binding) in self.textures.iter().enumerate() {
            let unit = index as u32 + 1;
            device.set_uniform(binding.location, &UniformValue::Int(unit as i32));
            device.active_texture(unit);
            device.bind_texture(Some(binding.texture));
        }
        device.active_texture(0);
        if let Some(location) = self.current_texture {
            device.set_uniform(location, &UniformValue::Int(0));
        }
    }

    pub(crate) fn view_projection_location(&self) -> Option<UniformLocation> {
        self.view_projection
    }

    fn location(
        cache: &mut FxHashMap<String, Option<UniformLocation>>,
        device: &mut dyn GraphicsDevice,
        program: ProgramHandle,
        name: &str,
    ) -> Option<UniformLocation> {
        if let Some(location) = cache.get(name) {
            return *location;
        }
        let location = device.uniform_location(program, name);
        if location.is_none() {
            engine_warn!(SOURCE, "Uniform \"{}\" not found in shader", name);
        }
        cache.insert(name.to_string(), location);
        location
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        if let Ok(mut ctx) = self.context.lock() {
            ctx.device_mut().delete_program(self.program);
        }
    }
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("program", &self.program)
            .field("textures", &self.textures.len())
            .finish_non_exhaustive()
    }
}

// ===== UNIFORM CONVERSIONS =====

macro_rules! impl_uniform_from {
    ($($ty:ty => |$v:ident| $body:expr;)*) => {
        $(
            impl From<$ty> for UniformValue {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

impl_uniform_from! {
    f32 => |v| UniformValue::Float(v);
    Vec2 => |v| UniformValue::Vec2(v.to_array());
    Vec3 => |v| UniformValue::Vec3(v.to_array());
    Vec4 => |v| UniformValue::Vec4(v.to_array());
    i32 => |v| UniformValue::Int(v);
    IVec2 => |v| UniformValue::IVec2(v.to_array());
    IVec3 => |v| UniformValue::IVec3(v.to_array());
    IVec4 => |v| UniformValue::IVec4(v.to_array());
    bool => |v| UniformValue::Bool(v);
    Mat3 => |v| UniformValue::Mat3(v.to_cols_array());
    Mat4 => |v| UniformValue::Mat4(v.to_cols_array());
    Color => |v| UniformValue::Vec4(v.to_normalized());
    Transform => |v| UniformValue::Mat4(v.to_cols_array());
    &[f32] => |v| UniformValue::FloatArray(v.to_vec());
    &[Vec2] => |v| UniformValue::Vec2Array(v.iter().flat_map(|e| e.to_array()).collect());
    &[Vec3] => |v| UniformValue::Vec3Array(v.iter().flat_map(|e| e.to_array()).collect());
    &[Vec4] => |v| UniformValue::Vec4Array(v.iter().flat_map(|e| e.to_array()).collect());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
