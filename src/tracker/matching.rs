//! Detection input and matching utilities for target selection.

use nalgebra::Point2;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;

/// COCO class id for "person", the default target class.
pub const PERSON_CLASS_ID: u32 = 0;

/// Detection input for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DetectionRecord", into = "DetectionRecord")]
pub struct Detection {
    /// Class label reported by the detector
    pub class_id: u32,
    /// Bounding box in pixel coordinates
    pub bbox: Rect,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    pub fn new(class_id: u32, x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self {
            class_id,
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            score,
        }
    }

    pub fn from_rect(class_id: u32, bbox: Rect, score: f32) -> Self {
        Self {
            class_id,
            bbox,
            score,
        }
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Point2<f32> {
        let (cx, cy) = self.bbox.center();
        Point2::new(cx, cy)
    }

    pub fn is_well_formed(&self) -> bool {
        self.bbox.is_well_formed()
    }
}

/// On-disk shape of a detection: class, TLBR box, score.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DetectionRecord {
    class_id: u32,
    bbox: [f32; 4],
    #[serde(default = "default_score")]
    score: f32,
}

fn default_score() -> f32 {
    1.0
}

impl From<DetectionRecord> for Detection {
    fn from(r: DetectionRecord) -> Self {
        Detection::new(r.class_id, r.bbox[0], r.bbox[1], r.bbox[2], r.bbox[3], r.score)
    }
}

impl From<Detection> for DetectionRecord {
    fn from(d: Detection) -> Self {
        DetectionRecord {
            class_id: d.class_id,
            bbox: d.bbox.to_tlbr(),
            score: d.score,
        }
    }
}

/// Drop boxes with degenerate or non-finite geometry.
pub fn retain_well_formed(detections: &[Detection]) -> Vec<Detection> {
    detections
        .iter()
        .filter(|d| d.is_well_formed())
        .cloned()
        .collect()
}

/// Keep only detections of `class_id`, preserving order.
pub fn filter_class(detections: &[Detection], class_id: u32) -> Vec<&Detection> {
    detections
        .iter()
        .filter(|d| d.class_id == class_id)
        .collect()
}

/// Euclidean distance from each detection's box center to `anchor`.
pub fn center_distance<'a, I>(detections: I, anchor: &Point2<f32>) -> Array1<f32>
where
    I: IntoIterator<Item = &'a Detection>,
{
    detections
        .into_iter()
        .map(|d| {
            let c = d.center();
            (c.x - anchor.x).hypot(c.y - anchor.y)
        })
        .collect()
}

/// Index of the smallest distance. Ties keep the lowest index.
///
/// NaN entries are skipped; `inf` still compares, so a non-empty input
/// without NaN always has a minimum.
pub fn argmin(dists: &Array1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &d) in dists.iter().enumerate() {
        if d.is_nan() {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}
