//! Per-frame drowsiness state rules

use detection_filter::{RawDetection, CLASS_EYE_CLOSED, CLASS_MOUTH_OPEN};
use face_geometry::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::PipelineConfig;

/// The three independent drowsiness signals for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrowsinessState {
    pub yawn: bool,
    pub eyes_closed: bool,
    pub head_drop: bool,
}

impl DrowsinessState {
    /// Any signal active
    pub fn any(&self) -> bool {
        self.yawn || self.eyes_closed || self.head_drop
    }
}

/// Stateless classification of de-duplicated detections
#[derive(Debug, Clone)]
pub struct StateClassifier {
    yawn_aspect_ratio: f32,
    yawn_area_ratio: f32,
    closed_eye_count: usize,
}

impl StateClassifier {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            yawn_aspect_ratio: config.yawn_aspect_ratio,
            yawn_area_ratio: config.yawn_area_ratio,
            closed_eye_count: config.closed_eye_count,
        }
    }

    /// Derive the drowsiness state from one frame's surviving
    /// detections.
    ///
    /// `face_bbox` is the tight landmark bound in original-frame
    /// pixels; the area fallback of the yawn check is measured against
    /// it, not against the padded crop.
    pub fn classify(
        &self,
        detections: &[RawDetection],
        head_drop: bool,
        face_bbox: &BoundingBox,
    ) -> DrowsinessState {
        let closed_eyes = detections
            .iter()
            .filter(|d| d.class_id == CLASS_EYE_CLOSED)
            .count();

        let yawn = detections
            .iter()
            .filter(|d| d.class_id == CLASS_MOUTH_OPEN)
            .any(|d| self.is_yawn(d, face_bbox));

        DrowsinessState {
            yawn,
            eyes_closed: closed_eyes >= self.closed_eye_count,
            head_drop,
        }
    }

    fn is_yawn(&self, mouth: &RawDetection, face_bbox: &BoundingBox) -> bool {
        let width = mouth.bbox.width();
        let height = mouth.bbox.height();

        // Zero-width box cannot be a candidate
        if width == 0.0 {
            return false;
        }

        if height / width >= self.yawn_aspect_ratio {
            return true;
        }

        let face_area = face_bbox.area();
        if face_area <= 0.0 {
            return false;
        }

        mouth.bbox.area() / face_area >= self.yawn_area_ratio
    }
}

impl Default for StateClassifier {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}
