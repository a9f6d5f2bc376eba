/// Settings of an offscreen render target's attachments

/// Requested depth / stencil / multisampling configuration
///
/// Zero means "not requested" for every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextSettings {
    /// Bits of the depth attachment (0 = no depth buffer)
    pub depth_bits: u32,
    /// Bits of the stencil attachment (0 = no stencil buffer)
    pub stencil_bits: u32,
    /// Multisampling level (0 = no anti-aliasing)
    pub antialiasing_level: u32,
    /// Whether the color attachment should be sRGB
    pub srgb_capable: bool,
}

impl ContextSettings {
    pub fn with_depth(mut self, bits: u32) -> Self {
        self.depth_bits = bits;
        self
    }

    pub fn with_stencil(mut self, bits: u32) -> Self {
        self.stencil_bits = bits;
        self
    }

    pub fn with_antialiasing(mut self, level: u32) -> Self {
        self.antialiasing_level = level;
        self
    }

    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb_capable = srgb;
        self
    }
}
