//! Face Locator & Aligner
//!
//! Turns one camera frame into a geometrically normalized face crop:
//! - Landmark-based face location (pluggable detector backend)
//! - Head-drop ratio from forehead/nose/chin landmarks
//! - Padded, frame-clipped region of interest around the face
//! - Roll-correcting rotation of the full frame, then ROI crop

pub mod aligner;
pub mod landmarks;

pub use aligner::{AlignerConfig, AlignmentResult, FaceAligner, FaceAlignment, Roi};
pub use landmarks::{Landmark, LandmarkSet};

use image::RgbImage;
use thiserror::Error;

/// Alignment error types
#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Landmark detection failed: {0}")]
    Landmarker(String),

    #[error("Landmark set missing required indices")]
    IncompleteLandmarks,

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Pluggable facial landmark detector.
///
/// Implementations must be safe to share across parallel pipeline
/// invocations; the detector is treated as read-only after load.
pub trait FaceLandmarker: Send + Sync {
    /// Locate the first face in the frame.
    ///
    /// `Ok(None)` means no face was found - a normal, expected outcome
    /// rather than an error.
    fn detect(&self, frame: &RgbImage) -> Result<Option<LandmarkSet>, AlignError>;
}
