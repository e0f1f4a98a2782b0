use super::Vec2;

/// Texture-space rectangle, bottom-left / top-right corners in [0, 1].
///
/// The vertex-batched path tabulates the four corner UVs; the instanced path
/// ships `scale`/`offset` and lets the vertex stage evaluate the same affine
/// map. Both derive from this type so the two paths cannot drift apart.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: Self = Self {
        min: Vec2::new(0.0, 0.0),
        max: Vec2::new(1.0, 1.0),
    };

    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Corner UVs in fan order: bottom-left, bottom-right, top-right,
    /// top-left. Matches the canonical unit-quad corner order.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.max.x, self.max.y),
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    #[inline]
    pub fn scale(self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn offset(self) -> Vec2 {
        self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_covers_unit_square() {
        let c = UvRect::FULL.corners();
        assert_eq!(c[0], Vec2::new(0.0, 0.0));
        assert_eq!(c[1], Vec2::new(1.0, 0.0));
        assert_eq!(c[2], Vec2::new(1.0, 1.0));
        assert_eq!(c[3], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn corners_follow_fan_order_for_sub_rect() {
        let uv = UvRect::new(Vec2::new(0.25, 0.5), Vec2::new(0.75, 1.0));
        let c = uv.corners();
        assert_eq!(c[0], Vec2::new(0.25, 0.5));
        assert_eq!(c[1], Vec2::new(0.75, 0.5));
        assert_eq!(c[2], Vec2::new(0.75, 1.0));
        assert_eq!(c[3], Vec2::new(0.25, 1.0));
    }

    #[test]
    fn scale_offset_reproduces_corners() {
        // The instanced path computes corner_uv * scale + offset; that must
        // land on the tabulated corners the vertex path uses.
        let uv = UvRect::new(Vec2::new(0.125, 0.25), Vec2::new(0.625, 0.75));
        let unit = UvRect::FULL.corners();
        for (u, corner) in unit.iter().zip(uv.corners()) {
            let mapped = Vec2::new(
                u.x * uv.scale().x + uv.offset().x,
                u.y * uv.scale().y + uv.offset().y,
            );
            assert_eq!(mapped, corner);
        }
    }
}
