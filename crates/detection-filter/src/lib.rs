//! Detection De-duplicator
//!
//! Raw eye/mouth detections from the object detector frequently
//! overlap (an open-eye and a closed-eye box over the same eye, say).
//! This crate groups detections into anatomical clusters and keeps the
//! best representative per cluster via weighted, IoU-based suppression.

pub mod detection;
pub mod filter;

pub use detection::{
    AnatomicalGroup, RawDetection, CLASS_EYE_CLOSED, CLASS_EYE_OPEN, CLASS_FACE,
    CLASS_MOUTH_CLOSED, CLASS_MOUTH_OPEN,
};
pub use filter::OverlapFilter;

use image::RgbImage;
use thiserror::Error;

/// Detection error types
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid frame format")]
    InvalidFrame,
}

/// Pluggable eye/mouth/face object detector.
///
/// Runs on the aligned face crop produced by the aligner; boxes are in
/// crop-local pixel coordinates. Implementations must be safe to share
/// across parallel pipeline invocations.
pub trait ObjectDetector: Send + Sync {
    fn detect(&self, roi: &RgbImage) -> Result<Vec<RawDetection>, DetectionError>;
}
