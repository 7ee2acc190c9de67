//! Builder for creating Detection objects from various input formats.

use crate::tracker::{Detection, PERSON_CLASS_ID, Rect};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone)]
pub struct DetectionBuilder {
    class_id: u32,
    bbox: Rect,
    score: f32,
}

impl Default for DetectionBuilder {
    fn default() -> Self {
        Self {
            class_id: PERSON_CLASS_ID,
            bbox: Rect::default(),
            score: 1.0,
        }
    }
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the class label.
    pub fn class(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f32, t: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(l, t, w, h);
        self
    }

    /// Set bounding box from normalized TLBR coordinates in a `(width, height)` frame.
    pub fn normalized_tlbr(self, b: [f32; 4], frame_size: (u32, u32)) -> Self {
        let (w, h) = (frame_size.0 as f32, frame_size.1 as f32);
        self.tlbr(b[0] * w, b[1] * h, b[2] * w, b[3] * h)
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_rect(self.class_id, self.bbox, self.score)
    }
}
