//! Nearest-continuity target selection.

use nalgebra::Point2;

use crate::tracker::matching::{self, Detection};

/// Picks the single detection that continues the current track.
#[derive(Debug, Clone, Copy)]
pub struct TargetSelector {
    target_class: u32,
}

impl TargetSelector {
    pub fn new(target_class: u32) -> Self {
        Self { target_class }
    }

    pub fn target_class(&self) -> u32 {
        self.target_class
    }

    /// Whether `detection` belongs to the selectable class.
    #[inline]
    pub fn is_target(&self, detection: &Detection) -> bool {
        detection.class_id == self.target_class
    }

    /// Return the target-class detection whose center lies closest to `anchor`.
    ///
    /// Other classes are never selectable. Distances are computed over the
    /// target-class detections only, and ties resolve to the earliest of
    /// them in slice order. Returns `None` when no detection has the target
    /// class.
    pub fn select<'a>(
        &self,
        detections: &'a [Detection],
        anchor: &Point2<f32>,
    ) -> Option<&'a Detection> {
        let candidates = matching::filter_class(detections, self.target_class);
        if candidates.is_empty() {
            return None;
        }

        let dists = matching::center_distance(candidates.iter().copied(), anchor);
        matching::argmin(&dists).map(|i| candidates[i])
    }
}
