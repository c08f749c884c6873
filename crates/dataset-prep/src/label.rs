//! YOLO-format label text parsing and formatting
//!
//! One box per line: `class_id cx cy w h`, spatial values normalized
//! to [0,1] relative to the owning image's dimensions.

use serde::{Deserialize, Serialize};

/// A normalized center/size box with its class id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub class_id: u32,
    pub cx: f32,
    pub cy: f32,
    pub w: f32,
    pub h: f32,
}

impl NormalizedBox {
    pub fn new(class_id: u32, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self { class_id, cx, cy, w, h }
    }
}

/// Parse label text. Blank, short, or non-numeric lines are skipped
/// individually; they never abort the rest of the file.
pub fn parse_labels(text: &str) -> Vec<NormalizedBox> {
    let mut boxes = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 5 {
            continue;
        }

        let parsed = (
            fields[0].parse::<u32>(),
            fields[1].parse::<f32>(),
            fields[2].parse::<f32>(),
            fields[3].parse::<f32>(),
            fields[4].parse::<f32>(),
        );
        let (Ok(class_id), Ok(cx), Ok(cy), Ok(w), Ok(h)) = parsed else {
            continue;
        };

        boxes.push(NormalizedBox::new(class_id, cx, cy, w, h));
    }

    boxes
}

/// Format boxes back into label text, six decimal places per value
pub fn format_labels(boxes: &[NormalizedBox]) -> String {
    boxes
        .iter()
        .map(|b| {
            format!(
                "{} {:.6} {:.6} {:.6} {:.6}",
                b.class_id, b.cx, b.cy, b.w, b.h
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_lines() {
        let text = "1 0.5 0.5 0.2 0.1\n2 0.25 0.75 0.1 0.3";
        let boxes = parse_labels(text);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0], NormalizedBox::new(1, 0.5, 0.5, 0.2, 0.1));
        assert_eq!(boxes[1].class_id, 2);
    }

    #[test]
    fn test_malformed_lines_skipped_individually() {
        let text = "\n1 0.5 0.5 0.2 0.1\nnot a label\n3 0.1 0.1\n2 0.2 0.2 0.1 0.1\n";
        let boxes = parse_labels(text);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].class_id, 1);
        assert_eq!(boxes[1].class_id, 2);
    }

    #[test]
    fn test_non_numeric_fields_skipped() {
        let text = "x 0.5 0.5 0.2 0.1\n1 0.5 abc 0.2 0.1";
        assert!(parse_labels(text).is_empty());
    }

    #[test]
    fn test_format_precision() {
        let boxes = [NormalizedBox::new(3, 0.5, 0.25, 0.125, 1.0 / 3.0)];
        assert_eq!(
            format_labels(&boxes),
            "3 0.500000 0.250000 0.125000 0.333333"
        );
    }

    #[test]
    fn test_format_parse_round_trip() {
        let original = vec![
            NormalizedBox::new(0, 0.4, 0.3, 0.2, 0.1),
            NormalizedBox::new(4, 0.9, 0.8, 0.05, 0.05),
        ];
        let parsed = parse_labels(&format_labels(&original));
        assert_eq!(parsed.len(), original.len());
        for (a, b) in original.iter().zip(&parsed) {
            assert_eq!(a.class_id, b.class_id);
            assert!((a.cx - b.cx).abs() < 1e-5);
            assert!((a.h - b.h).abs() < 1e-5);
        }
    }
}
