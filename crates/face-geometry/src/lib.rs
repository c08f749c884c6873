//! Geometric primitives shared across the drowsiness vision pipeline:
//! - Axis-aligned bounding boxes in corner form with IoU
//! - Rotation-only 2x3 affine transforms about an arbitrary center

pub mod bbox;
pub mod transform;

pub use bbox::BoundingBox;
pub use transform::{AffineTransform, Point};
