//! Drowsiness classification pipeline
//!
//! Single-frame driver state analysis:
//! - Face location and roll-corrected alignment
//! - Eye/mouth object detection on the aligned crop
//! - Overlap suppression of competing detections
//! - Deterministic yawn / eyes-closed / head-drop rules
//!
//! Each invocation is an independent, stateless computation; there is
//! deliberately no cross-frame smoothing in this layer.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod pipeline;

pub use analysis::DrowsinessAnalysis;
pub use classifier::{DrowsinessState, StateClassifier};
pub use config::PipelineConfig;
pub use pipeline::DrowsinessPipeline;

use detection_filter::DetectionError;
use face_align::AlignError;
use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Alignment failed: {0}")]
    Align(#[from] AlignError),

    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),
}
