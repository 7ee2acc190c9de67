//! Per-frame control step: detections in, commands out.

use tracing::debug;

use crate::protocol::Command;
use crate::tracker::aim::{AimAngles, AimMapper};
use crate::tracker::engagement::{EngagementConfig, EngagementStateMachine};
use crate::tracker::matching::{self, Detection, PERSON_CLASS_ID};
use crate::tracker::selector::TargetSelector;
use crate::tracker::smoother::PositionSmoother;
use crate::tracker::track_state::TrackState;

/// Configuration for the TurretTracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub target_class: u32,
    pub smoothing_alpha: f32,
    pub yaw_limit: f32,
    pub pitch_limit: f32,
    pub pitch_bias: f32,
    pub engagement: EngagementConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            target_class: PERSON_CLASS_ID,
            smoothing_alpha: 0.3,
            yaw_limit: 30.0,
            pitch_limit: 50.0,
            pitch_bias: 10.0,
            engagement: EngagementConfig::default(),
        }
    }
}

/// Result of one control step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// The detection chosen as the target, if any
    pub target: Option<Detection>,
    /// Angles derived from the smoothed target position
    pub aim: Option<AimAngles>,
    /// Commands to send, in order: state transitions first, then aim
    pub commands: Vec<Command>,
}

/// Single-target tracker and engagement controller.
///
/// Holds only configuration; all mutable state lives in the caller's
/// [`TrackState`], so the same tracker can step any state.
pub struct TurretTracker {
    selector: TargetSelector,
    smoother: PositionSmoother,
    mapper: AimMapper,
    engagement: EngagementStateMachine,
}

impl TurretTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            selector: TargetSelector::new(config.target_class),
            smoother: PositionSmoother::new(config.smoothing_alpha),
            mapper: AimMapper::new(config.yaw_limit, config.pitch_limit, config.pitch_bias),
            engagement: EngagementStateMachine::new(config.engagement),
        }
    }

    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    pub fn mapper(&self) -> &AimMapper {
        &self.mapper
    }

    pub fn update(
        &self,
        state: &mut TrackState,
        detections: &[Detection],
        frame_size: (u32, u32),
    ) -> FrameOutcome {
        // Step 1: Drop degenerate boxes before they reach selection
        let valid = matching::retain_well_formed(detections);
        if valid.len() != detections.len() {
            debug!(
                dropped = detections.len() - valid.len(),
                "discarded malformed detections"
            );
        }

        // Step 2: Presence drives the engagement state machine
        let target_present = valid.iter().any(|d| self.selector.is_target(d));
        let mut commands = self.engagement.step(state, target_present);

        // Step 3: Continue the track from the last known position
        let Some(target) = self
            .selector
            .select(&valid, &state.last_target_position)
            .cloned()
        else {
            return FrameOutcome {
                target: None,
                aim: None,
                commands,
            };
        };

        let raw = target.center();
        state.last_target_position = raw;
        state.smoothed_position = self.smoother.smooth(&state.smoothed_position, &raw);

        // Step 4: Aim at the smoothed position
        let aim = self.mapper.map(&state.smoothed_position, frame_size);
        if let Some(angles) = aim {
            debug!(
                x = state.smoothed_position.x,
                y = state.smoothed_position.y,
                yaw = angles.yaw,
                pitch = angles.pitch,
                "aiming"
            );
            commands.push(Command::Aim {
                pitch: angles.pitch,
                yaw: angles.yaw,
            });
        }

        FrameOutcome {
            target: Some(target),
            aim,
            commands,
        }
    }
}

impl Default for TurretTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
