//! Analysis result for one frame

use detection_filter::RawDetection;
use face_geometry::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::DrowsinessState;

/// Complete result of one pipeline invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrowsinessAnalysis {
    /// Whether a face was located in the frame
    pub face_detected: bool,

    /// The three drowsiness signals (all false when no face)
    pub state: DrowsinessState,

    /// Face bounding box in original-frame pixels (if detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_bbox: Option<BoundingBox>,

    /// Surviving detections after overlap suppression
    pub detections: Vec<RawDetection>,

    /// Wall-clock processing time for this invocation
    pub processing_time_ms: u64,
}

impl DrowsinessAnalysis {
    /// All-false analysis for a frame with no face
    pub fn no_face(processing_time_ms: u64) -> Self {
        Self {
            processing_time_ms,
            ..Default::default()
        }
    }
}
