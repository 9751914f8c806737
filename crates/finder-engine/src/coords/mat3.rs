use core::ops::Mul;

use super::{Rect, Vec2, Viewport};

/// 3x3 affine transform for 2D points, stored row-major.
///
/// Points are treated as column vectors `(x, y, 1)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub rows: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Maps logical pixels (top-left origin, +Y down) to NDC (+Y up).
    pub fn ortho_top_left(viewport: Viewport) -> Mat3 {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        Mat3 {
            rows: [
                [2.0 / w, 0.0, -1.0],
                [0.0, -2.0 / h, 1.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// Maps the unit square onto `rect`.
    pub fn from_rect(rect: Rect) -> Mat3 {
        Mat3 {
            rows: [
                [rect.size.x, 0.0, rect.origin.x],
                [0.0, rect.size.y, rect.origin.y],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.rows;
        Vec2::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
        )
    }

    /// Column-major layout padded to WGSL `mat3x3<f32>` uniform alignment.
    pub fn to_gpu_columns(&self) -> [[f32; 4]; 3] {
        let m = &self.rows;
        [
            [m[0][0], m[1][0], m[2][0], 0.0],
            [m[0][1], m[1][1], m[2][1], 0.0],
            [m[0][2], m[1][2], m[2][2], 0.0],
        ]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut rows = [[0.0f32; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Mat3 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn ortho_maps_corners_to_ndc() {
        let m = Mat3::ortho_top_left(Viewport::new(800.0, 600.0));
        assert_close(m.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_close(m.transform_point(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
        assert_close(m.transform_point(Vec2::new(400.0, 300.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn rect_then_ortho_places_unit_square() {
        let vp = Viewport::new(1000.0, 500.0);
        let m = Mat3::ortho_top_left(vp) * Mat3::from_rect(Rect::new(800.0, 0.0, 200.0, 125.0));
        assert_close(m.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(0.6, 1.0));
        assert_close(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(1.0, 0.5));
    }

    #[test]
    fn gpu_columns_are_transposed_and_padded() {
        let m = Mat3::from_rect(Rect::new(3.0, 4.0, 5.0, 6.0));
        let cols = m.to_gpu_columns();
        assert_eq!(cols[0], [5.0, 0.0, 0.0, 0.0]);
        assert_eq!(cols[2], [3.0, 4.0, 1.0, 0.0]);
    }

    #[test]
    fn identity_is_neutral() {
        let m = Mat3::from_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(Mat3::IDENTITY * m, m);
        assert_eq!(m * Mat3::IDENTITY, m);
    }

    proptest! {
        #[test]
        fn from_rect_maps_unit_corners_onto_rect(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 0.0f32..1000.0,
            h in 0.0f32..1000.0,
        ) {
            let rect = Rect::new(x, y, w, h);
            let m = Mat3::from_rect(rect);
            assert_close(m.transform_point(Vec2::new(0.0, 0.0)), Vec2::new(x, y));
            assert_close(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(x + w, y + h));
            prop_assert_eq!(Mat3::IDENTITY * m, m);
        }
    }
}
