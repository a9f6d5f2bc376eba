/// Axis-aligned rectangles (left, top, width, height)

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect<T> {
    pub left: T,
    pub top: T,
    pub width: T,
    pub height: T,
}

/// Pixel rectangle
pub type IntRect = Rect<i32>;
/// World or normalized rectangle
pub type FloatRect = Rect<f32>;

impl<T> Rect<T> {
    pub const fn new(left: T, top: T, width: T, height: T) -> Self {
        Self { left, top, width, height }
    }
}

impl<T> Rect<T>
where
    T: Copy + PartialOrd + std::ops::Add<Output = T> + Default,
{
    /// Right and bottom edges, with negative extents normalized
    fn bounds(&self) -> (T, T, T, T) {
        let a = (self.left, self.left + self.width);
        let b = (self.top, self.top + self.height);
        let (min_x, max_x) = if a.0 < a.1 { a } else { (a.1, a.0) };
        let (min_y, max_y) = if b.0 < b.1 { b } else { (b.1, b.0) };
        (min_x, min_y, max_x, max_y)
    }

    /// Whether the point lies inside (right and bottom edges excluded)
    pub fn contains(&self, x: T, y: T) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bounds();
        x >= min_x && x < max_x && y >= min_y && y < max_y
    }

    /// True when the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        let zero = T::default();
        self.width == zero || self.height == zero
    }
}

impl<T> Rect<T>
where
    T: Copy + PartialOrd + std::ops::Add<Output = T> + std::ops::Sub<Output = T> + Default,
{
    /// Overlapping area of two rectangles, `None` if they don't overlap
    pub fn intersection(&self, other: &Rect<T>) -> Option<Rect<T>> {
        let (a_left, a_top, a_right, a_bottom) = self.bounds();
        let (b_left, b_top, b_right, b_bottom) = other.bounds();
        let left = if a_left > b_left { a_left } else { b_left };
        let top = if a_top > b_top { a_top } else { b_top };
        let right = if a_right < b_right { a_right } else { b_right };
        let bottom = if a_bottom < b_bottom { a_bottom } else { b_bottom };
        if left < right && top < bottom {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

impl FloatRect {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "rect_tests.rs"]
mod tests;
