/// Device capabilities: the configuration surface of a graphics device

use bitflags::bitflags;

bitflags! {
    /// Optional features a device may support
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceFeatures: u32 {
        /// Textures with non power-of-two sizes
        const NPOT_TEXTURES = 1 << 0;
        /// Framebuffer objects (offscreen targets, mipmap generation)
        const FRAMEBUFFER_OBJECT = 1 << 1;
        /// Framebuffer to framebuffer blits
        const FRAMEBUFFER_BLIT = 1 << 2;
        /// Multisample renderbuffers
        const FRAMEBUFFER_MULTISAMPLE = 1 << 3;
        /// Combined depth24/stencil8 renderbuffers
        const PACKED_DEPTH_STENCIL = 1 << 4;
        /// Separate color / alpha blend factors
        const BLEND_FUNC_SEPARATE = 1 << 5;
        /// Separate color / alpha blend equations
        const BLEND_EQUATION_SEPARATE = 1 << 6;
        /// Min / Max blend equations
        const BLEND_MINMAX = 1 << 7;
        /// Subtract / ReverseSubtract blend equations
        const BLEND_SUBTRACT = 1 << 8;
        /// sRGB texture storage
        const TEXTURE_SRGB = 1 << 9;
        /// GPU-side buffer to buffer copies
        const BUFFER_COPY = 1 << 10;
    }
}

/// What a device can do, queried once at device creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Supported optional features
    pub features: DeviceFeatures,
    /// Largest texture dimension, in pixels
    pub max_texture_size: u32,
    /// Highest multisampling level of renderbuffers
    pub max_samples: u32,
    /// Number of texture units usable from a fragment shader
    pub max_texture_units: u32,
}

impl DeviceCapabilities {
    pub fn supports(&self, features: DeviceFeatures) -> bool {
        self.features.contains(features)
    }

    /// Size a texture must be allocated with to hold `size` pixels:
    /// the next power of two when NPOT textures are not supported
    ///
    /// `None` when that power of two does not fit in a `u32`.
    pub fn valid_texture_size(&self, size: u32) -> Option<u32> {
        if self.supports(DeviceFeatures::NPOT_TEXTURES) {
            Some(size)
        } else {
            size.max(1).checked_next_power_of_two()
        }
    }
}

impl Default for DeviceCapabilities {
    /// A desktop GL 3.3 class device. NPOT textures are assumed supported.
    fn default() -> Self {
        Self {
            features: DeviceFeatures::all(),
            max_texture_size: 8192,
            max_samples: 8,
            max_texture_units: 16,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "capabilities_tests.rs"]
mod tests;
