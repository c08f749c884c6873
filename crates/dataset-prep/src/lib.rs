//! Offline dataset preparation
//!
//! Re-projects pre-existing ground-truth boxes from original-image
//! coordinates into the aligned-crop coordinate frame, producing
//! training labels consistent with the online inference path:
//! - YOLO-format label text parsing and formatting
//! - Box re-projection through the aligner's rotation and crop
//! - Parallel per-file batch runner with outcome counts and timing

pub mod batch;
pub mod label;
pub mod reproject;

pub use batch::{BatchDirs, BatchReport, BatchRunner, FileOutcome};
pub use label::{format_labels, parse_labels, NormalizedBox};
pub use reproject::{reproject_box, reproject_labels};

use face_align::AlignError;
use thiserror::Error;

/// Dataset preparation error types
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode/encode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Alignment failed: {0}")]
    Align(#[from] AlignError),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Worker pool failed: {0}")]
    Worker(String),
}
