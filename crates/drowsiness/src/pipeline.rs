//! Online single-frame pipeline: align, detect, suppress, classify

use std::sync::Arc;
use std::time::Instant;

use detection_filter::{ObjectDetector, OverlapFilter};
use face_align::{FaceAligner, FaceAlignment, FaceLandmarker};
use image::RgbImage;
use tracing::debug;

use crate::{DrowsinessAnalysis, PipelineConfig, PipelineError, StateClassifier};

/// The online drowsiness pipeline.
///
/// Holds the injected detector services behind `Arc` so one loaded
/// instance can be shared read-only across parallel invocations.
pub struct DrowsinessPipeline {
    aligner: FaceAligner,
    filter: OverlapFilter,
    classifier: StateClassifier,
    landmarker: Arc<dyn FaceLandmarker>,
    detector: Arc<dyn ObjectDetector>,
}

impl DrowsinessPipeline {
    pub fn new(
        config: PipelineConfig,
        landmarker: Arc<dyn FaceLandmarker>,
        detector: Arc<dyn ObjectDetector>,
    ) -> Self {
        Self {
            aligner: FaceAligner::new(config.aligner_config()),
            filter: OverlapFilter::new(config.iou_threshold),
            classifier: StateClassifier::new(&config),
            landmarker,
            detector,
        }
    }

    /// Analyze a single frame.
    ///
    /// A frame with no face returns the all-false state without ever
    /// invoking the object detector. No state is carried between
    /// invocations.
    pub fn analyze(&self, frame: &RgbImage) -> Result<DrowsinessAnalysis, PipelineError> {
        let start = Instant::now();

        let aligned = match self.aligner.align(self.landmarker.as_ref(), frame)? {
            FaceAlignment::NoFace => {
                debug!("no face in frame");
                return Ok(DrowsinessAnalysis::no_face(elapsed_ms(start)));
            }
            FaceAlignment::Aligned(result) => result,
        };

        let raw = self.detector.detect(&aligned.crop)?;
        let kept = self.filter.filter(&raw);
        let state = self
            .classifier
            .classify(&kept, aligned.head_drop, &aligned.face_bbox);

        debug!(?state, detections = kept.len(), "frame classified");

        Ok(DrowsinessAnalysis {
            face_detected: true,
            state,
            face_bbox: Some(aligned.face_bbox),
            detections: kept,
            processing_time_ms: elapsed_ms(start),
        })
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
