use core::ops::Mul;

use super::Vec2;

/// Row-major 3×3 matrix for homogeneous 2D transforms.
///
/// Row convention is fixed once and used everywhere: points are column
/// vectors `(x, y, 1)` multiplied from the left, so `rows[0]` produces the
/// transformed x and `rows[1]` the transformed y. Affine transforms keep
/// `rows[2] == (0, 0, 1)`, which is why instance records ship only the first
/// two rows.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn translation(offset: Vec2) -> Self {
        Self {
            rows: [
                [1.0, 0.0, offset.x],
                [0.0, 1.0, offset.y],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    #[inline]
    pub fn scale(x: f32, y: f32) -> Self {
        Self {
            rows: [[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Counter-clockwise rotation for positive `radians`.
    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            rows: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Transforms a point, treating it as `(x, y, 1)`.
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        let r = self.rows;
        Vec2::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2],
        )
    }

    #[inline]
    pub fn row(self, i: usize) -> [f32; 3] {
        self.rows[i]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    /// Matrix concatenation; `a * b` applies `b` first, then `a`.
    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut rows = [[0.0f32; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.rows[i][0] * rhs.rows[0][j]
                    + self.rows[i][1] * rhs.rows[1][j]
                    + self.rows[i][2] * rhs.rows[2][j];
            }
        }
        Mat3 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_leaves_points_unchanged() {
        let p = Vec2::new(3.5, -2.0);
        assert_eq!(Mat3::IDENTITY.apply(p), p);
    }

    #[test]
    fn translation_offsets_points() {
        let m = Mat3::translation(Vec2::new(10.0, -4.0));
        assert_eq!(m.apply(Vec2::zero()), Vec2::new(10.0, -4.0));
        assert_eq!(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(11.0, -3.0));
    }

    #[test]
    fn scale_stretches_about_origin() {
        let m = Mat3::scale(2.0, 3.0);
        assert_eq!(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn rotation_quarter_turn_is_ccw() {
        let m = Mat3::rotation(core::f32::consts::FRAC_PI_2);
        let p = m.apply(Vec2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn concatenation_applies_rightmost_first() {
        // translate ∘ scale: the corner (0.5, 0.5) scales to (1, 1) and then
        // moves to (11, 1).
        let m = Mat3::translation(Vec2::new(10.0, 0.0)) * Mat3::scale(2.0, 2.0);
        assert_eq!(m.apply(Vec2::new(0.5, 0.5)), Vec2::new(11.0, 1.0));
    }

    #[test]
    fn affine_bottom_row_is_constant() {
        let m = Mat3::translation(Vec2::new(5.0, 6.0)) * Mat3::rotation(0.3);
        assert_eq!(m.row(2), [0.0, 0.0, 1.0]);
    }
}
