//! Axis-aligned bounding boxes in corner form

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box `(x1, y1)` top-left, `(x2, y2)` bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    /// Create a bounding box from corner coordinates
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point (cx, cy)
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// True when the box has no positive extent in either dimension
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Clamp all coordinates to `[0, max_x] x [0, max_y]`
    pub fn clamp(&self, max_x: f32, max_y: f32) -> Self {
        Self {
            x1: self.x1.clamp(0.0, max_x),
            y1: self.y1.clamp(0.0, max_y),
            x2: self.x2.clamp(0.0, max_x),
            y2: self.y2.clamp(0.0, max_y),
        }
    }

    /// Intersection over union with another box.
    ///
    /// Returns 0 when the boxes do not overlap. Symmetric, and 1 for a
    /// box compared with itself (positive area assumed).
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x_left = self.x1.max(other.x1);
        let y_top = self.y1.max(other.y1);
        let x_right = self.x2.min(other.x2);
        let y_bottom = self.y2.min(other.y2);

        if x_right < x_left || y_bottom < y_top {
            return 0.0;
        }

        let intersection = (x_right - x_left) * (y_bottom - y_top);
        let union = self.area() + other.area() - intersection;

        if union <= 0.0 {
            return 0.0;
        }

        intersection / union
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_iou_with_self_is_one() {
        let b = BoundingBox::new(10.0, 20.0, 50.0, 60.0);
        assert!((b.iou(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iou_disjoint_is_zero() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(a.iou(&b), 0.0);
        assert_eq!(b.iou(&a), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        // Two 10x10 boxes sharing a 5x10 strip: IoU = 50 / 150
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 0.0, 15.0, 10.0);
        assert!((a.iou(&b) - 50.0 / 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_to_frame() {
        let b = BoundingBox::new(-5.0, -5.0, 120.0, 90.0).clamp(100.0, 80.0);
        assert_eq!(b, BoundingBox::new(0.0, 0.0, 100.0, 80.0));
    }

    #[test]
    fn test_degenerate_detection() {
        assert!(BoundingBox::new(10.0, 10.0, 10.0, 20.0).is_degenerate());
        assert!(BoundingBox::new(10.0, 10.0, 20.0, 5.0).is_degenerate());
        assert!(!BoundingBox::new(10.0, 10.0, 20.0, 20.0).is_degenerate());
    }

    proptest! {
        #[test]
        fn prop_iou_symmetric(
            ax in 0.0f32..500.0, ay in 0.0f32..500.0,
            aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in 0.0f32..500.0, by in 0.0f32..500.0,
            bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let a = BoundingBox::new(ax, ay, ax + aw, ay + ah);
            let b = BoundingBox::new(bx, by, bx + bw, by + bh);
            prop_assert!((a.iou(&b) - b.iou(&a)).abs() < 1e-5);
        }

        #[test]
        fn prop_iou_in_unit_range(
            ax in 0.0f32..500.0, ay in 0.0f32..500.0,
            aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in 0.0f32..500.0, by in 0.0f32..500.0,
            bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let a = BoundingBox::new(ax, ay, ax + aw, ay + ah);
            let b = BoundingBox::new(bx, by, bx + bw, by + bh);
            let iou = a.iou(&b);
            prop_assert!((0.0..=1.0 + 1e-5).contains(&iou));
        }
    }
}
