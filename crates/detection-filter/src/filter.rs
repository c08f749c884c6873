//! Weighted-confidence greedy overlap suppression

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::{AnatomicalGroup, RawDetection, CLASS_EYE_CLOSED, CLASS_MOUTH_OPEN};

/// Per-class confidence weight used only for ranking competing boxes.
///
/// Closed eyes and open mouths are the clinically meaningful classes:
/// when boxes overlap, selection is biased toward them.
fn class_weight(class_id: u32) -> f32 {
    match class_id {
        CLASS_EYE_CLOSED => 1.05,
        CLASS_MOUTH_OPEN => 1.2,
        _ => 1.0,
    }
}

/// Keeps at most one representative per mutually-overlapping cluster
/// within each anatomical group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapFilter {
    /// IoU above which a lower-ranked box is suppressed
    pub iou_threshold: f32,
}

impl Default for OverlapFilter {
    fn default() -> Self {
        Self { iou_threshold: 0.3 }
    }
}

impl OverlapFilter {
    pub fn new(iou_threshold: f32) -> Self {
        Self { iou_threshold }
    }

    /// De-duplicate one detection list.
    ///
    /// Eye and mouth groups are suppressed independently; the output is
    /// the eye survivors followed by the mouth survivors. Face
    /// detections (class 4) are never part of the output.
    pub fn filter(&self, detections: &[RawDetection]) -> Vec<RawDetection> {
        let mut kept = Vec::new();
        for group in [AnatomicalGroup::Eye, AnatomicalGroup::Mouth] {
            kept.extend(self.filter_group(detections, group));
        }
        debug!(raw = detections.len(), kept = kept.len(), "overlap suppression");
        kept
    }

    fn filter_group(
        &self,
        detections: &[RawDetection],
        group: AnatomicalGroup,
    ) -> Vec<RawDetection> {
        let mut members: Vec<&RawDetection> = detections
            .iter()
            .filter(|d| d.group() == Some(group))
            .collect();

        let weighted = |d: &RawDetection| d.confidence * class_weight(d.class_id);
        members.sort_by(|a, b| {
            weighted(b)
                .partial_cmp(&weighted(a))
                .unwrap_or(Ordering::Equal)
        });

        let mut suppressed = vec![false; members.len()];
        let mut kept = Vec::new();

        for i in 0..members.len() {
            if suppressed[i] {
                continue;
            }
            kept.push(members[i].clone());
            for j in (i + 1)..members.len() {
                if suppressed[j] {
                    continue;
                }
                if members[i].bbox.iou(&members[j].bbox) > self.iou_threshold {
                    suppressed[j] = true;
                }
            }
        }

        kept
    }
}
