//! Rotation-only 2x3 affine transforms

use serde::{Deserialize, Serialize};

/// A 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2x3 affine matrix, row-major: `[a b c; d e f]`.
///
/// Built as a pure rotation about a center point (no scale or shear),
/// matching the classic warp-matrix convention: for rotation angle
/// theta, alpha = cos(theta), beta = sin(theta) and
///
/// ```text
/// [ alpha   beta   (1 - alpha)*cx - beta*cy ]
/// [ -beta   alpha  beta*cx + (1 - alpha)*cy ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    m: [f32; 6],
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Rotation by `angle_deg` degrees about `center`
    pub fn rotation_about(angle_deg: f32, center: Point) -> Self {
        let theta = angle_deg.to_radians();
        let (beta, alpha) = theta.sin_cos();
        let (cx, cy) = (center.x, center.y);
        Self {
            m: [
                alpha,
                beta,
                (1.0 - alpha) * cx - beta * cy,
                -beta,
                alpha,
                beta * cx + (1.0 - alpha) * cy,
            ],
        }
    }

    /// Transform a point as a homogeneous 2D coordinate
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.m[0] * p.x + self.m[1] * p.y + self.m[2],
            y: self.m[3] * p.x + self.m[4] * p.y + self.m[5],
        }
    }

    /// Row-major 3x3 matrix (last row `0 0 1`) for projective warp back-ends
    pub fn to_matrix3(&self) -> [f32; 9] {
        [
            self.m[0], self.m[1], self.m[2], self.m[3], self.m[4], self.m[5], 0.0, 0.0, 1.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point, eps: f32) -> bool {
        (a.x - b.x).abs() < eps && (a.y - b.y).abs() < eps
    }

    #[test]
    fn test_zero_angle_is_fixed_point() {
        let t = AffineTransform::rotation_about(0.0, Point::new(320.0, 240.0));
        let p = Point::new(123.4, 56.7);
        assert!(approx(t.apply(p), p, 1e-4));
    }

    #[test]
    fn test_identity_matches_zero_rotation() {
        let id = AffineTransform::identity();
        let rot = AffineTransform::rotation_about(0.0, Point::new(50.0, 50.0));
        let p = Point::new(10.0, 90.0);
        assert!(approx(id.apply(p), rot.apply(p), 1e-4));
    }

    #[test]
    fn test_center_is_invariant_under_rotation() {
        let center = Point::new(100.0, 80.0);
        let t = AffineTransform::rotation_about(37.5, center);
        assert!(approx(t.apply(center), center, 1e-3));
    }

    #[test]
    fn test_quarter_turn_about_origin() {
        // 90 degrees with the y-down image convention maps (1, 0) to (0, -1)
        let t = AffineTransform::rotation_about(90.0, Point::new(0.0, 0.0));
        let p = t.apply(Point::new(1.0, 0.0));
        assert!(approx(p, Point::new(0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_opposite_angles_compose_to_identity() {
        let center = Point::new(42.0, 24.0);
        let fwd = AffineTransform::rotation_about(28.0, center);
        let back = AffineTransform::rotation_about(-28.0, center);
        let p = Point::new(7.0, 300.0);
        assert!(approx(back.apply(fwd.apply(p)), p, 1e-2));
    }
}
