//! Raw detection records over the fixed eye/mouth/face class set

use face_geometry::BoundingBox;
use serde::{Deserialize, Serialize};

pub const CLASS_EYE_OPEN: u32 = 0;
pub const CLASS_EYE_CLOSED: u32 = 1;
pub const CLASS_MOUTH_OPEN: u32 = 2;
pub const CLASS_MOUTH_CLOSED: u32 = 3;
pub const CLASS_FACE: u32 = 4;

/// Logical grouping of detector classes for de-duplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnatomicalGroup {
    Eye,
    Mouth,
}

impl AnatomicalGroup {
    /// Group membership for a detector class. The face class (4)
    /// belongs to neither group.
    pub fn of(class_id: u32) -> Option<Self> {
        match class_id {
            CLASS_EYE_OPEN | CLASS_EYE_CLOSED => Some(Self::Eye),
            CLASS_MOUTH_OPEN | CLASS_MOUTH_CLOSED => Some(Self::Mouth),
            _ => None,
        }
    }
}

/// One raw detection from the object detector, in crop-local pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub class_id: u32,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl RawDetection {
    pub fn new(class_id: u32, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
        }
    }

    pub fn group(&self) -> Option<AnatomicalGroup> {
        AnatomicalGroup::of(self.class_id)
    }
}
