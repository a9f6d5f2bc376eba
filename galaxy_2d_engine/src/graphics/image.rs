/// CPU-side RGBA8 pixel buffer
///
/// Rows are stored top to bottom, 4 bytes per pixel. Decoding and
/// encoding of image files is left to the caller.

use glam::UVec2;
use crate::error::Result;
use crate::graphics::color::Color;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    size: UVec2,
    pixels: Vec<u8>,
}

impl Image {
    /// Image of `width` x `height` filled with `color`
    pub fn new(width: u32, height: u32, color: Color) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&color.to_array());
        }
        Self { size: UVec2::new(width, height), pixels }
    }

    /// Wrap raw RGBA8 pixels; the buffer must hold exactly `width * height * 4` bytes
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            crate::engine_bail!(
                "galaxy2d::Image",
                InvalidArgument,
                "pixel buffer holds {} bytes, {}x{} image needs {}",
                pixels.len(), width, height, expected
            );
        }
        Ok(Self { size: UVec2::new(width, height), pixels })
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Color at (x, y), `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let index = (y as usize * self.size.x as usize + x as usize) * 4;
        let p = &self.pixels[index..index + 4];
        Some(Color::rgba(p[0], p[1], p[2], p[3]))
    }

    /// Set the color at (x, y); ignored outside the image
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.size.x || y >= self.size.y {
            return;
        }
        let index = (y as usize * self.size.x as usize + x as usize) * 4;
        self.pixels[index..index + 4].copy_from_slice(&color.to_array());
    }

    /// Bytes of row `y`
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let stride = self.size.x as usize * 4;
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    pub fn flip_vertically(&mut self) {
        let stride = self.size.x as usize * 4;
        let height = self.size.y as usize;
        for y in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - 1 - y) * stride);
            top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
