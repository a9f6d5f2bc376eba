/// View - the 2D camera
///
/// A view selects the rectangle of the world that is shown (center,
/// size, rotation) and the part of the render target it is shown in
/// (viewport, normalized to [0, 1]). It is pure data: render targets copy
/// it in and apply it on their next draw.

use std::cell::Cell;
use glam::Vec2;
use crate::graphics::{FloatRect, Transform};

#[derive(Debug, Clone)]
pub struct View {
    center: Vec2,
    size: Vec2,
    /// Degrees, in [0, 360)
    rotation: f32,
    viewport: FloatRect,
    /// World to clip space, computed on demand
    transform: Cell<Option<Transform>>,
    /// Clip to world space, computed on demand
    inverse_transform: Cell<Option<Transform>>,
}

impl View {
    /// View showing `rect`
    pub fn from_rect(rect: FloatRect) -> Self {
        let mut view = View::default();
        view.reset(rect);
        view
    }

    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            viewport: FloatRect::new(0.0, 0.0, 1.0, 1.0),
            transform: Cell::new(None),
            inverse_transform: Cell::new(None),
        }
    }

    // ===== SETTERS =====

    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
        self.invalidate();
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees.rem_euclid(360.0);
        self.invalidate();
    }

    /// Part of the target the view is displayed in, as fractions of the target size
    pub fn set_viewport(&mut self, viewport: FloatRect) {
        self.viewport = viewport;
    }

    /// Show `rect`, reset rotation
    pub fn reset(&mut self, rect: FloatRect) {
        self.center = Vec2::new(rect.left + rect.width / 2.0, rect.top + rect.height / 2.0);
        self.size = Vec2::new(rect.width, rect.height);
        self.rotation = 0.0;
        self.invalidate();
    }

    pub fn move_by(&mut self, offset: Vec2) {
        self.set_center(self.center + offset);
    }

    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Scale the shown area (factor > 1 zooms out)
    pub fn zoom(&mut self, factor: f32) {
        self.set_size(self.size * factor);
    }

    // ===== GETTERS =====

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn viewport(&self) -> FloatRect {
        self.viewport
    }

    /// World to clip space transform
    pub fn transform(&self) -> Transform {
        if let Some(transform) = self.transform.get() {
            return transform;
        }

        let angle = self.rotation.to_radians();
        let (sine, cosine) = angle.sin_cos();
        let tx = -self.center.x * cosine - self.center.y * sine + self.center.x;
        let ty = self.center.x * sine - self.center.y * cosine + self.center.y;

        // Projection components
        let a = 2.0 / self.size.x;
        let b = -2.0 / self.size.y;
        let c = -a * self.center.x;
        let d = -b * self.center.y;

        let transform = Transform::from_3x3(
            a * cosine, a * sine, a * tx + c,
            -b * sine, b * cosine, b * ty + d,
            0.0, 0.0, 1.0,
        );
        self.transform.set(Some(transform));
        transform
    }

    /// Clip to world space transform
    pub fn inverse_transform(&self) -> Transform {
        if let Some(inverse) = self.inverse_transform.get() {
            return inverse;
        }
        let inverse = self.transform().inverse();
        self.inverse_transform.set(Some(inverse));
        inverse
    }

    fn invalidate(&mut self) {
        self.transform.set(None);
        self.inverse_transform.set(None);
    }
}

impl Default for View {
    /// Shows (0, 0, 1000, 1000) on the whole target
    fn default() -> Self {
        View::new(Vec2::new(500.0, 500.0), Vec2::new(1000.0, 1000.0))
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center
            && self.size == other.size
            && self.rotation == other.rotation
            && self.viewport == other.viewport
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
