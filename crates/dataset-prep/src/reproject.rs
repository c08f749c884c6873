//! Ground-truth box re-projection into the aligned crop frame

use face_align::Roi;
use face_geometry::{AffineTransform, BoundingBox, Point};
use tracing::debug;

use crate::label::NormalizedBox;

/// Re-project one box from original-frame normalized coordinates into
/// crop-frame normalized coordinates.
///
/// The image was rotated, not the box, so the four transformed corners
/// are refit into a new axis-aligned bound. Boxes that end up with no
/// positive extent inside the crop are dropped (`None`) - expected when
/// a box falls entirely outside the crop after rotation.
pub fn reproject_box(
    bx: &NormalizedBox,
    transform: &AffineTransform,
    roi: &Roi,
    frame_width: u32,
    frame_height: u32,
) -> Option<NormalizedBox> {
    let w = frame_width as f32;
    let h = frame_height as f32;

    // Denormalize to absolute original-frame coordinates
    let cx = bx.cx * w;
    let cy = bx.cy * h;
    let half_w = bx.w * w / 2.0;
    let half_h = bx.h * h / 2.0;

    let corners = [
        Point::new(cx - half_w, cy - half_h),
        Point::new(cx + half_w, cy - half_h),
        Point::new(cx - half_w, cy + half_h),
        Point::new(cx + half_w, cy + half_h),
    ];

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for corner in corners {
        let p = transform.apply(corner);
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    // Translate into the crop's coordinate frame and clip
    let crop_w = roi.width() as f32;
    let crop_h = roi.height() as f32;

    let clipped = BoundingBox::new(
        min_x - roi.x1 as f32,
        min_y - roi.y1 as f32,
        max_x - roi.x1 as f32,
        max_y - roi.y1 as f32,
    )
    .clamp(crop_w, crop_h);

    if clipped.is_degenerate() {
        return None;
    }

    let (cx, cy) = clipped.center();
    Some(NormalizedBox::new(
        bx.class_id,
        cx / crop_w,
        cy / crop_h,
        clipped.width() / crop_w,
        clipped.height() / crop_h,
    ))
}

/// Re-project a whole label set; degenerate results are dropped
pub fn reproject_labels(
    boxes: &[NormalizedBox],
    transform: &AffineTransform,
    roi: &Roi,
    frame_width: u32,
    frame_height: u32,
) -> Vec<NormalizedBox> {
    let kept: Vec<NormalizedBox> = boxes
        .iter()
        .filter_map(|b| reproject_box(b, transform, roi, frame_width, frame_height))
        .collect();

    if kept.len() < boxes.len() {
        debug!(
            dropped = boxes.len() - kept.len(),
            "boxes fell outside the crop"
        );
    }

    kept
}
