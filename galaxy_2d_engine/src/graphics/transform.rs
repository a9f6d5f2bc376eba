/// 2D affine transform stored as a 4x4 matrix
///
/// The matrix is column-major (glam layout) so it can be uploaded as is
/// to a `mat4` uniform. Only the 2D affine part is ever populated: z is
/// left untouched.

use glam::{Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(Mat4);

impl Transform {
    pub const IDENTITY: Transform = Transform(Mat4::IDENTITY);

    /// Build from a 3x3 row-major matrix
    /// (`x' = a00*x + a01*y + a02`, `y' = a10*x + a11*y + a12`)
    #[allow(clippy::too_many_arguments)]
    pub fn from_3x3(
        a00: f32, a01: f32, a02: f32,
        a10: f32, a11: f32, a12: f32,
        a20: f32, a21: f32, a22: f32,
    ) -> Self {
        Transform(Mat4::from_cols(
            Vec4::new(a00, a10, 0.0, a20),
            Vec4::new(a01, a11, 0.0, a21),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(a02, a12, 0.0, a22),
        ))
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Transform(matrix)
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.0
    }

    /// Column-major array, ready for a `mat4` uniform
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.0.to_cols_array()
    }

    /// Upper-left 3x3 (x, y, w) part, column-major, for `mat3` uniforms
    pub fn to_mat3_cols_array(&self) -> [f32; 9] {
        let m = self.0.to_cols_array();
        [m[0], m[1], m[3], m[4], m[5], m[7], m[12], m[13], m[15]]
    }

    /// Inverse transform, identity if the matrix is singular
    pub fn inverse(&self) -> Transform {
        if self.0.determinant() != 0.0 {
            Transform(self.0.inverse())
        } else {
            Transform::IDENTITY
        }
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.0.transform_point3(point.extend(0.0)).truncate()
    }

    /// `self * other` (other is applied first)
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform(self.0 * other.0)
    }

    pub fn translate(&self, offset: Vec2) -> Transform {
        self.combine(&Transform(Mat4::from_translation(offset.extend(0.0))))
    }

    /// Rotate by `degrees` around `center`
    pub fn rotate(&self, degrees: f32, center: Vec2) -> Transform {
        let rotation = Mat4::from_translation(center.extend(0.0))
            * Mat4::from_rotation_z(degrees.to_radians())
            * Mat4::from_translation(-center.extend(0.0));
        self.combine(&Transform(rotation))
    }

    pub fn scale(&self, factors: Vec2) -> Transform {
        self.combine(&Transform(Mat4::from_scale(Vec3::new(factors.x, factors.y, 1.0))))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl std::ops::Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        self.combine(&rhs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
