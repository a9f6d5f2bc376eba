/// GL capability detection
///
/// Features are derived from the context version and its extension
/// strings. Detection is a pure function so every rule can be checked
/// without a live context.

use galaxy_2d_engine::galaxy2d::device::{DeviceCapabilities, DeviceFeatures};
use std::collections::HashSet;

/// Version of a GL context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
    /// OpenGL ES rather than desktop OpenGL
    pub embedded: bool,
}

impl GlVersion {
    pub const fn desktop(major: u32, minor: u32) -> Self {
        Self { major, minor, embedded: false }
    }

    pub const fn embedded(major: u32, minor: u32) -> Self {
        Self { major, minor, embedded: true }
    }

    pub fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.embedded {
            write!(f, "OpenGL ES {}.{}", self.major, self.minor)
        } else {
            write!(f, "OpenGL {}.{}", self.major, self.minor)
        }
    }
}

/// Raw implementation limits, as queried from the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlLimits {
    pub max_texture_size: i32,
    pub max_samples: i32,
    pub max_texture_units: i32,
}

/// Optional features available on a context
pub fn detect_features(version: GlVersion, extensions: &HashSet<String>) -> DeviceFeatures {
    let has = |name: &str| extensions.contains(name);
    let mut features = DeviceFeatures::empty();

    if version.embedded {
        // ES 2.0 core carries framebuffer objects and separate blending
        features |= DeviceFeatures::FRAMEBUFFER_OBJECT
            | DeviceFeatures::BLEND_FUNC_SEPARATE
            | DeviceFeatures::BLEND_EQUATION_SEPARATE
            | DeviceFeatures::BLEND_SUBTRACT;

        if version.at_least(3, 0) {
            features |= DeviceFeatures::NPOT_TEXTURES
                | DeviceFeatures::FRAMEBUFFER_BLIT
                | DeviceFeatures::FRAMEBUFFER_MULTISAMPLE
                | DeviceFeatures::PACKED_DEPTH_STENCIL
                | DeviceFeatures::BLEND_MINMAX
                | DeviceFeatures::TEXTURE_SRGB
                | DeviceFeatures::BUFFER_COPY;
        } else {
            // ES 2.0 NPOT textures cannot repeat or carry mipmaps
            if has("GL_OES_texture_npot") {
                features |= DeviceFeatures::NPOT_TEXTURES;
            }
            if has("GL_EXT_blend_minmax") {
                features |= DeviceFeatures::BLEND_MINMAX;
            }
            if has("GL_OES_packed_depth_stencil") {
                features |= DeviceFeatures::PACKED_DEPTH_STENCIL;
            }
            if has("GL_EXT_sRGB") {
                features |= DeviceFeatures::TEXTURE_SRGB;
            }
            if has("GL_ANGLE_framebuffer_blit") || has("GL_NV_framebuffer_blit") {
                features |= DeviceFeatures::FRAMEBUFFER_BLIT;
            }
            if has("GL_ANGLE_framebuffer_multisample") || has("GL_EXT_multisampled_render_to_texture") {
                features |= DeviceFeatures::FRAMEBUFFER_MULTISAMPLE;
            }
        }
        return features;
    }

    // Non power-of-two sizes are assumed to work unless a pre-2.0 context
    // says otherwise
    if version.at_least(2, 0) || has("GL_ARB_texture_non_power_of_two") || version.major == 0 {
        features |= DeviceFeatures::NPOT_TEXTURES;
    }

    let gl30 = version.at_least(3, 0);
    let arb_fbo = has("GL_ARB_framebuffer_object");

    if gl30 || arb_fbo || has("GL_EXT_framebuffer_object") {
        features |= DeviceFeatures::FRAMEBUFFER_OBJECT;
    }
    if gl30 || arb_fbo || has("GL_EXT_framebuffer_blit") {
        features |= DeviceFeatures::FRAMEBUFFER_BLIT;
    }
    if gl30 || arb_fbo || has("GL_EXT_framebuffer_multisample") {
        features |= DeviceFeatures::FRAMEBUFFER_MULTISAMPLE;
    }
    if gl30 || arb_fbo || has("GL_EXT_packed_depth_stencil") {
        features |= DeviceFeatures::PACKED_DEPTH_STENCIL;
    }
    if version.at_least(1, 4) || has("GL_EXT_blend_func_separate") {
        features |= DeviceFeatures::BLEND_FUNC_SEPARATE;
    }
    if version.at_least(2, 0) || has("GL_EXT_blend_equation_separate") {
        features |= DeviceFeatures::BLEND_EQUATION_SEPARATE;
    }
    if version.at_least(1, 4) || has("GL_EXT_blend_minmax") {
        features |= DeviceFeatures::BLEND_MINMAX;
    }
    if version.at_least(1, 4) || has("GL_EXT_blend_subtract") {
        features |= DeviceFeatures::BLEND_SUBTRACT;
    }
    if version.at_least(2, 1) || has("GL_EXT_texture_sRGB") {
        features |= DeviceFeatures::TEXTURE_SRGB;
    }
    if version.at_least(3, 1) || has("GL_ARB_copy_buffer") {
        features |= DeviceFeatures::BUFFER_COPY;
    }

    features
}

/// Whether vertex array objects are available, which the device requires
pub fn supports_vertex_arrays(version: GlVersion, extensions: &HashSet<String>) -> bool {
    version.at_least(3, 0)
        || extensions.contains("GL_ARB_vertex_array_object")
        || extensions.contains("GL_OES_vertex_array_object")
}

/// Assemble the capabilities of a context from its features and limits
///
/// Negative limits (failed queries) are clamped. A device without
/// multisampling reports zero samples, and at least one texture unit
/// is always reported.
pub fn build_capabilities(features: DeviceFeatures, limits: GlLimits) -> DeviceCapabilities {
    let max_samples = if features.contains(DeviceFeatures::FRAMEBUFFER_MULTISAMPLE) {
        limits.max_samples.max(0) as u32
    } else {
        0
    };

    DeviceCapabilities {
        features,
        max_texture_size: limits.max_texture_size.max(1) as u32,
        max_samples,
        max_texture_units: limits.max_texture_units.max(1) as u32,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "gl_capabilities_tests.rs"]
mod tests;
