//! Facial landmark types (face-mesh topology)

use face_geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// Face-mesh landmark index: top of the forehead
pub const FOREHEAD: usize = 10;
/// Face-mesh landmark index: nose tip
pub const NOSE_TIP: usize = 1;
/// Face-mesh landmark index: bottom of the chin
pub const CHIN: usize = 152;
/// Face-mesh landmark index: left eye outer corner
pub const LEFT_EYE_OUTER: usize = 33;
/// Face-mesh landmark index: right eye outer corner
pub const RIGHT_EYE_OUTER: usize = 263;

/// A single landmark point, normalized to [0,1] relative to frame size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Ordered landmark collection for one face, indexed by the fixed
/// face-mesh topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    /// Tight axis-aligned bound over all landmarks, in absolute pixels
    pub fn bounding_box(&self, frame_width: u32, frame_height: u32) -> BoundingBox {
        let w = frame_width as f32;
        let h = frame_height as f32;

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for p in &self.points {
            min_x = min_x.min(p.x * w);
            min_y = min_y.min(p.y * h);
            max_x = max_x.max(p.x * w);
            max_y = max_y.max(p.y * h);
        }

        BoundingBox::new(min_x, min_y, max_x, max_y)
    }
}
