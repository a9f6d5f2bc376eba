/// Blending modes for drawing
///
/// A blend mode is two (source factor, destination factor, equation)
/// triples, one for the color channels and one for alpha:
/// `dst = src * src_factor (equation) dst * dst_factor`.

/// Multiplier applied to the source or destination operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Operation combining the two weighted operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendMode {
    pub color_src_factor: BlendFactor,
    pub color_dst_factor: BlendFactor,
    pub color_equation: BlendEquation,
    pub alpha_src_factor: BlendFactor,
    pub alpha_dst_factor: BlendFactor,
    pub alpha_equation: BlendEquation,
}

impl BlendMode {
    /// Blend source and destination according to source alpha
    pub const ALPHA: BlendMode = BlendMode::separate(
        BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha,
        BlendEquation::Add,
        BlendFactor::One,
        BlendFactor::OneMinusSrcAlpha,
        BlendEquation::Add,
    );

    /// Add source to destination
    pub const ADD: BlendMode = BlendMode::separate(
        BlendFactor::SrcAlpha,
        BlendFactor::One,
        BlendEquation::Add,
        BlendFactor::One,
        BlendFactor::One,
        BlendEquation::Add,
    );

    /// Multiply source and destination
    pub const MULTIPLY: BlendMode =
        BlendMode::new(BlendFactor::DstColor, BlendFactor::Zero, BlendEquation::Add);

    /// Overwrite destination with source
    pub const NONE: BlendMode =
        BlendMode::new(BlendFactor::One, BlendFactor::Zero, BlendEquation::Add);

    /// Same factors and equation for color and alpha
    pub const fn new(src: BlendFactor, dst: BlendFactor, equation: BlendEquation) -> Self {
        Self::separate(src, dst, equation, src, dst, equation)
    }

    pub const fn separate(
        color_src_factor: BlendFactor,
        color_dst_factor: BlendFactor,
        color_equation: BlendEquation,
        alpha_src_factor: BlendFactor,
        alpha_dst_factor: BlendFactor,
        alpha_equation: BlendEquation,
    ) -> Self {
        Self {
            color_src_factor,
            color_dst_factor,
            color_equation,
            alpha_src_factor,
            alpha_dst_factor,
            alpha_equation,
        }
    }

    /// Whether both equations are plain addition
    pub fn uses_add_only(&self) -> bool {
        self.color_equation == BlendEquation::Add && self.alpha_equation == BlendEquation::Add
    }
}

impl Default for BlendMode {
    fn default() -> Self {
        BlendMode::ALPHA
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "blend_mode_tests.rs"]
mod tests;
