/// GraphicsDevice trait - the GPU command seam
///
/// The render layer drives the GPU exclusively through this trait. The
/// command set is modelled on OpenGL (ES) 2/3: objects are named by
/// handles, most texture and buffer commands act on the currently bound
/// object, and binding queries are cheap so callers can diff before they
/// write. A backend only has to translate commands, all caching and
/// validation live above it.

use crate::error::Result;
use crate::graphics::{BlendEquation, BlendFactor, IntRect, PrimitiveType, VertexAttribute};
use crate::graphics_device::{
    BufferHandle, DeviceCapabilities, FramebufferHandle, ProgramHandle, RenderbufferHandle,
    TextureHandle, UniformLocation, VertexArrayHandle,
};

// ============================================================================
// Command parameters
// ============================================================================

/// Fixed-function switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend,
    CullFace,
    DepthTest,
}

/// Storage format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8,
    Srgb8Alpha8,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
}

/// Update frequency hint of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Rewritten every frame
    #[default]
    Stream,
    /// Updated from time to time
    Dynamic,
    /// Written once
    Static,
}

/// Framebuffer binding point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    /// Source of reads and blits
    Read,
    /// Destination of draws, clears and blits
    Draw,
    /// Read and draw at once
    Both,
}

/// Framebuffer attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color0,
    Depth,
    DepthStencil,
}

/// Storage format of a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderbufferFormat {
    Rgba8,
    Srgb8Alpha8,
    Depth24,
    Depth24Stencil8,
}

/// Value written to a uniform of the current program
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Int(i32),
    IVec2([i32; 2]),
    IVec3([i32; 3]),
    IVec4([i32; 4]),
    Bool(bool),
    /// Column-major 3x3 matrix
    Mat3([f32; 9]),
    /// Column-major 4x4 matrix
    Mat4([f32; 16]),
    FloatArray(Vec<f32>),
    /// Flattened `vec2` array
    Vec2Array(Vec<f32>),
    /// Flattened `vec3` array
    Vec3Array(Vec<f32>),
    /// Flattened `vec4` array
    Vec4Array(Vec<f32>),
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GPU command interface implemented by backends
///
/// Commands are issued on the thread that owns the underlying context.
/// Creation commands return `None` when the driver hands back a null
/// object; the caller turns that into a resource exhaustion error.
pub trait GraphicsDevice: Send {
    /// Capabilities detected when the device was created
    fn capabilities(&self) -> DeviceCapabilities;

    // ===== FIXED-FUNCTION STATE =====

    fn set_enabled(&mut self, capability: Capability, enabled: bool);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn blend_func_separate(
        &mut self,
        color_src: BlendFactor,
        color_dst: BlendFactor,
        alpha_src: BlendFactor,
        alpha_dst: BlendFactor,
    );
    fn blend_equation(&mut self, equation: BlendEquation);
    fn blend_equation_separate(&mut self, color: BlendEquation, alpha: BlendEquation);
    /// Viewport in framebuffer pixels, origin at the bottom-left corner
    fn viewport(&mut self, rect: IntRect);
    /// Clear the color buffer of the draw framebuffer (normalized RGBA)
    fn clear(&mut self, color: [f32; 4]);
    fn flush(&mut self);

    // ===== TEXTURES =====

    fn create_texture(&mut self) -> Option<TextureHandle>;
    fn delete_texture(&mut self, texture: TextureHandle);
    fn active_texture(&mut self, unit: u32);
    /// Bind on the active unit
    fn bind_texture(&mut self, texture: Option<TextureHandle>);
    fn bound_texture(&self) -> Option<TextureHandle>;
    /// (Re)allocate level 0 of the bound texture, content undefined
    fn texture_storage(&mut self, width: u32, height: u32, format: TextureFormat);
    /// Upload tightly packed RGBA8 rows into the bound texture
    fn texture_sub_image(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]);
    fn set_texture_filter(&mut self, mag: TextureFilter, min: TextureFilter);
    fn set_texture_wrap(&mut self, wrap: TextureWrap);
    fn set_texture_max_level(&mut self, level: u32);
    fn generate_mipmap(&mut self);
    /// Read level 0 of the bound texture as RGBA8 rows (GPU row order)
    fn read_texture(&mut self, width: u32, height: u32) -> Vec<u8>;
    /// Copy a rectangle of the read framebuffer into the bound texture at (x, y)
    fn copy_framebuffer_to_texture(
        &mut self,
        x: u32,
        y: u32,
        src_x: i32,
        src_y: i32,
        width: u32,
        height: u32,
    );

    // ===== BUFFERS =====

    fn create_buffer(&mut self) -> Option<BufferHandle>;
    fn delete_buffer(&mut self, buffer: BufferHandle);
    fn bind_vertex_buffer(&mut self, buffer: Option<BufferHandle>);
    fn bound_vertex_buffer(&self) -> Option<BufferHandle>;
    /// (Re)allocate the bound vertex buffer, content undefined
    fn buffer_data(&mut self, size: usize, usage: BufferUsage);
    fn buffer_sub_data(&mut self, offset: usize, data: &[u8]);
    fn copy_buffer(&mut self, source: BufferHandle, destination: BufferHandle, size: usize);
    fn create_vertex_array(&mut self) -> Option<VertexArrayHandle>;
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayHandle>);
    fn bound_vertex_array(&self) -> Option<VertexArrayHandle>;
    /// Declare and enable an attribute of the bound vertex array,
    /// sourced from the bound vertex buffer
    fn vertex_attribute(&mut self, attribute: &VertexAttribute, stride: usize);

    // ===== PROGRAMS =====

    /// Compile and link a program, binding `attributes[i]` to location `i`.
    /// Compile and link status are checked before returning.
    fn create_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
        attributes: &[&str],
    ) -> Result<ProgramHandle>;
    fn delete_program(&mut self, program: ProgramHandle);
    fn use_program(&mut self, program: Option<ProgramHandle>);
    fn current_program(&self) -> Option<ProgramHandle>;
    fn uniform_location(&mut self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    /// Write a uniform of the current program
    fn set_uniform(&mut self, location: UniformLocation, value: &UniformValue);

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> Option<FramebufferHandle>;
    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle);
    /// `None` binds the default (window) framebuffer
    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferHandle>);
    /// `Both` reports the draw binding
    fn bound_framebuffer(&self, target: FramebufferTarget) -> Option<FramebufferHandle>;
    fn framebuffer_texture(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        texture: Option<TextureHandle>,
    );
    fn create_renderbuffer(&mut self) -> Option<RenderbufferHandle>;
    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle);
    /// Allocate renderbuffer storage; `samples == 0` means single-sampled
    fn renderbuffer_storage(
        &mut self,
        renderbuffer: RenderbufferHandle,
        format: RenderbufferFormat,
        samples: u32,
        width: u32,
        height: u32,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        target: FramebufferTarget,
        attachment: Attachment,
        renderbuffer: Option<RenderbufferHandle>,
    );
    /// Completeness status of the framebuffer bound to `target`
    fn framebuffer_complete(&mut self, target: FramebufferTarget) -> bool;
    /// Nearest-filtered color blit from the read to the draw framebuffer.
    /// Rectangles are `[x0, y0, x1, y1]`; swapping y0/y1 flips vertically.
    fn blit_framebuffer(&mut self, source: [i32; 4], destination: [i32; 4]);

    // ===== DRAWING =====

    /// Draw `count` vertices starting at `first` from the bound vertex array
    fn draw_arrays(&mut self, primitive: PrimitiveType, first: usize, count: usize);
}
