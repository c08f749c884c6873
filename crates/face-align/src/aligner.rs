//! Face alignment: head-drop ratio, ROI computation, roll correction

use face_geometry::{AffineTransform, BoundingBox, Point};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::landmarks::{CHIN, FOREHEAD, LEFT_EYE_OUTER, NOSE_TIP, RIGHT_EYE_OUTER};
use crate::{AlignError, FaceLandmarker};

/// Crop rectangle in original-frame pixel coordinates, already clipped
/// to the frame bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roi {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Roi {
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }
}

/// Everything the aligner derives from one located face
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    /// Nose sits low in the face: head is dropped forward
    pub head_drop: bool,
    /// Tight landmark bound in original-frame pixels
    pub face_bbox: BoundingBox,
    /// Padded crop rectangle in original-frame pixels
    pub roi: Roi,
    /// Roll-correcting rotation applied to the frame
    pub transform: AffineTransform,
    /// The rotated frame cropped to `roi`
    pub crop: RgbImage,
}

/// Outcome of one alignment attempt.
///
/// `NoFace` is a first-class result: callers must branch on it instead
/// of treating a missing face as default geometry.
#[derive(Debug, Clone)]
pub enum FaceAlignment {
    NoFace,
    Aligned(AlignmentResult),
}

/// Aligner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// ROI padding as a fraction of the face bounding box size
    pub pad_ratio: f32,

    /// Nose-position ratio above which the head counts as dropped
    pub head_drop_threshold: f32,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            pad_ratio: 0.3,
            head_drop_threshold: 0.65,
        }
    }
}

/// Locates the face, corrects head roll, and crops the normalized ROI
#[derive(Debug, Clone, Default)]
pub struct FaceAligner {
    config: AlignerConfig,
}

impl FaceAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    /// Align one frame.
    ///
    /// Pure function of the frame and the landmarker's output: no state
    /// is carried between invocations.
    pub fn align(
        &self,
        landmarker: &dyn FaceLandmarker,
        frame: &RgbImage,
    ) -> Result<FaceAlignment, AlignError> {
        let Some(landmarks) = landmarker.detect(frame)? else {
            return Ok(FaceAlignment::NoFace);
        };

        let forehead = landmarks.get(FOREHEAD).ok_or(AlignError::IncompleteLandmarks)?;
        let nose = landmarks.get(NOSE_TIP).ok_or(AlignError::IncompleteLandmarks)?;
        let chin = landmarks.get(CHIN).ok_or(AlignError::IncompleteLandmarks)?;
        let left_eye = landmarks
            .get(LEFT_EYE_OUTER)
            .ok_or(AlignError::IncompleteLandmarks)?;
        let right_eye = landmarks
            .get(RIGHT_EYE_OUTER)
            .ok_or(AlignError::IncompleteLandmarks)?;

        let (w, h) = frame.dimensions();

        // Nose position within the face height; 0 when the face has no
        // vertical extent.
        let face_height = chin.y - forehead.y;
        let nose_ratio = if face_height != 0.0 {
            (nose.y - forehead.y) / face_height
        } else {
            0.0
        };
        let head_drop = nose_ratio > self.config.head_drop_threshold;

        let face_bbox = landmarks.bounding_box(w, h);

        let pad_x = face_bbox.width() * self.config.pad_ratio;
        let pad_y = face_bbox.height() * self.config.pad_ratio;
        let roi = Roi {
            x1: (face_bbox.x1 - pad_x).max(0.0) as u32,
            y1: (face_bbox.y1 - pad_y).max(0.0) as u32,
            x2: (face_bbox.x2 + pad_x).min(w as f32) as u32,
            y2: (face_bbox.y2 + pad_y).min(h as f32) as u32,
        };

        // Roll angle between the eye corners, in degrees
        let dx = (right_eye.x - left_eye.x) * w as f32;
        let dy = (right_eye.y - left_eye.y) * h as f32;
        let angle = dy.atan2(dx).to_degrees();

        let (cx, cy) = face_bbox.center();
        let transform = AffineTransform::rotation_about(angle, Point::new(cx, cy));

        debug!(
            angle,
            nose_ratio, head_drop, "face located, correcting roll"
        );

        // Rotate the entire frame, then crop. The ROI was computed on
        // the unrotated frame and clipped to its bounds, which keeps
        // the crop rectangle valid after rotation.
        let projection = Projection::from_matrix(transform.to_matrix3()).ok_or_else(|| {
            AlignError::ImageProcessing("rotation matrix is not invertible".to_string())
        })?;
        let rotated = warp(frame, &projection, Interpolation::Bicubic, Rgb([0, 0, 0]));
        let crop =
            image::imageops::crop_imm(&rotated, roi.x1, roi.y1, roi.width(), roi.height())
                .to_image();

        Ok(FaceAlignment::Aligned(AlignmentResult {
            head_drop,
            face_bbox,
            roi,
            transform,
            crop,
        }))
    }
}
