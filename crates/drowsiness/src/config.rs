//! Pipeline configuration

use face_align::AlignerConfig;
use serde::{Deserialize, Serialize};

/// Thresholds for one pipeline instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// ROI padding as a fraction of the face bounding box size
    pub pad_ratio: f32,

    /// Nose-position ratio above which the head counts as dropped
    pub head_drop_threshold: f32,

    /// IoU above which overlapping detections are suppressed
    pub iou_threshold: f32,

    /// Mouth height/width ratio at which an open mouth counts as a yawn
    pub yawn_aspect_ratio: f32,

    /// Fallback mouth-to-face area ratio for the yawn check
    pub yawn_area_ratio: f32,

    /// Closed-eye detections required to flag both eyes closed
    pub closed_eye_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pad_ratio: 0.3,
            head_drop_threshold: 0.65,
            iou_threshold: 0.3,
            yawn_aspect_ratio: 0.6,
            yawn_area_ratio: 0.1,
            closed_eye_count: 2,
        }
    }
}

impl PipelineConfig {
    /// Aligner view of this configuration
    pub fn aligner_config(&self) -> AlignerConfig {
        AlignerConfig {
            pad_ratio: self.pad_ratio,
            head_drop_threshold: self.head_drop_threshold,
        }
    }
}
