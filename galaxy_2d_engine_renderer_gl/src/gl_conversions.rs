/// Engine enum to GL constant conversions
///
/// Pure functions, no context needed.

use galaxy_2d_engine::galaxy2d::device::{
    Attachment, BufferUsage, Capability, FramebufferTarget, RenderbufferFormat, TextureFilter,
    TextureFormat, TextureWrap,
};
use galaxy_2d_engine::galaxy2d::graphics::{AttributeKind, BlendEquation, BlendFactor, PrimitiveType};

/// `GL_QUADS`, only accepted by compatibility profiles
pub(crate) const QUADS: u32 = 0x0007;

pub(crate) fn primitive_to_gl(primitive: PrimitiveType) -> u32 {
    match primitive {
        PrimitiveType::Points => glow::POINTS,
        PrimitiveType::Lines => glow::LINES,
        PrimitiveType::LineStrip => glow::LINE_STRIP,
        PrimitiveType::Triangles => glow::TRIANGLES,
        PrimitiveType::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveType::TriangleFan => glow::TRIANGLE_FAN,
        PrimitiveType::Quads => QUADS,
    }
}

pub(crate) fn blend_factor_to_gl(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
    }
}

pub(crate) fn blend_equation_to_gl(equation: BlendEquation) -> u32 {
    match equation {
        BlendEquation::Add => glow::FUNC_ADD,
        BlendEquation::Subtract => glow::FUNC_SUBTRACT,
        BlendEquation::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendEquation::Min => glow::MIN,
        BlendEquation::Max => glow::MAX,
    }
}

pub(crate) fn capability_to_gl(capability: Capability) -> u32 {
    match capability {
        Capability::Blend => glow::BLEND,
        Capability::CullFace => glow::CULL_FACE,
        Capability::DepthTest => glow::DEPTH_TEST,
    }
}

/// Internal format of a texture storage format
pub(crate) fn texture_format_to_gl(format: TextureFormat) -> u32 {
    match format {
        TextureFormat::Rgba8 => glow::RGBA8,
        TextureFormat::Srgb8Alpha8 => glow::SRGB8_ALPHA8,
    }
}

pub(crate) fn texture_filter_to_gl(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
        TextureFilter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
        TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }
}

pub(crate) fn texture_wrap_to_gl(wrap: TextureWrap) -> u32 {
    match wrap {
        TextureWrap::Repeat => glow::REPEAT,
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
    }
}

pub(crate) fn buffer_usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Stream => glow::STREAM_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        BufferUsage::Static => glow::STATIC_DRAW,
    }
}

pub(crate) fn framebuffer_target_to_gl(target: FramebufferTarget) -> u32 {
    match target {
        FramebufferTarget::Read => glow::READ_FRAMEBUFFER,
        FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
        FramebufferTarget::Both => glow::FRAMEBUFFER,
    }
}

pub(crate) fn attachment_to_gl(attachment: Attachment) -> u32 {
    match attachment {
        Attachment::Color0 => glow::COLOR_ATTACHMENT0,
        Attachment::Depth => glow::DEPTH_ATTACHMENT,
        Attachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

pub(crate) fn renderbuffer_format_to_gl(format: RenderbufferFormat) -> u32 {
    match format {
        RenderbufferFormat::Rgba8 => glow::RGBA8,
        RenderbufferFormat::Srgb8Alpha8 => glow::SRGB8_ALPHA8,
        RenderbufferFormat::Depth24 => glow::DEPTH_COMPONENT24,
        RenderbufferFormat::Depth24Stencil8 => glow::DEPTH24_STENCIL8,
    }
}

pub(crate) fn attribute_kind_to_gl(kind: AttributeKind) -> u32 {
    match kind {
        AttributeKind::Float => glow::FLOAT,
        AttributeKind::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

/// Convert a `u32` size or coordinate to the `i32` GL expects, saturating
pub(crate) fn gl_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "gl_conversions_tests.rs"]
mod tests;
