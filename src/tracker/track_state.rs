use nalgebra::Point2;

/// Engagement lifecycle of the turret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngagementState {
    /// Wings closed, flywheels off
    #[default]
    Disengaged,
    /// Wings open, flywheels spinning, firing enabled
    Engaged,
}

/// Mutable tracking state carried from one frame to the next.
///
/// Owned by the frame loop and passed by reference into each per-frame
/// step. Lives for the whole run; positions are never reset so the last
/// sighting keeps anchoring the next match.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    /// Raw center of the last selected target
    pub last_target_position: Point2<f32>,
    /// Exponentially filtered target position
    pub smoothed_position: Point2<f32>,
    /// Consecutive frames without any target-class detection
    pub missed_frames: u32,
    pub engagement: EngagementState,
    /// Set once the "lost" voiceline fired for the current loss episode
    pub voiceline_notified: bool,
}

impl Default for TrackState {
    fn default() -> Self {
        Self {
            last_target_position: Point2::origin(),
            smoothed_position: Point2::origin(),
            missed_frames: 0,
            engagement: EngagementState::Disengaged,
            voiceline_notified: false,
        }
    }
}

impl TrackState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.engagement == EngagementState::Engaged
    }
}
