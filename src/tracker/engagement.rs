//! Debounced engage/disengage control driven by target presence.

use tracing::{debug, info};

use crate::protocol::Command;
use crate::tracker::track_state::{EngagementState, TrackState};

/// Commands sent when a target appears while disengaged.
pub const ENGAGE_SEQUENCE: [Command; 4] = [
    Command::Open,
    Command::VoicelineFound,
    Command::RevOn,
    Command::FireOn,
];

/// Thresholds for the engagement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementConfig {
    /// Missed frame count at which the "lost" voiceline fires
    pub voiceline_threshold: u32,
    /// Missed frame count that must be exceeded before disengaging
    pub close_threshold: u32,
    /// Also send `AfireOff` when disengaging
    pub explicit_fire_off: bool,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            voiceline_threshold: 8,
            close_threshold: 20,
            explicit_fire_off: false,
        }
    }
}

/// Two-state engagement controller with missed-frame tolerance.
///
/// Evaluated once per frame with whether any target-class detection was
/// present. All side effects are returned as commands; emission happens
/// only on the arms that change state, so each sequence goes out once per
/// transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementStateMachine {
    config: EngagementConfig,
}

impl EngagementStateMachine {
    pub fn new(config: EngagementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    /// Advance `state` by one frame and return the commands to send, in order.
    pub fn step(&self, state: &mut TrackState, target_present: bool) -> Vec<Command> {
        let mut commands = Vec::new();

        if target_present {
            state.missed_frames = 0;
            state.voiceline_notified = false;

            match state.engagement {
                EngagementState::Disengaged => {
                    state.engagement = EngagementState::Engaged;
                    info!("target acquired, engaging");
                    commands.extend_from_slice(&ENGAGE_SEQUENCE);
                }
                EngagementState::Engaged => {}
            }
            return commands;
        }

        state.missed_frames = state.missed_frames.saturating_add(1);
        debug!(missed_frames = state.missed_frames, "no target in frame");

        if state.missed_frames == self.config.voiceline_threshold && !state.voiceline_notified {
            state.voiceline_notified = true;
            info!(missed_frames = state.missed_frames, "target lost");
            commands.push(Command::VoicelineLost);
        }

        if state.missed_frames > self.config.close_threshold {
            match state.engagement {
                EngagementState::Engaged => {
                    state.engagement = EngagementState::Disengaged;
                    info!(missed_frames = state.missed_frames, "target gone, disengaging");
                    commands.extend(self.disengage_sequence());
                }
                EngagementState::Disengaged => {}
            }
        }

        commands
    }

    /// Commands sent when dropping out of the engaged state.
    pub fn disengage_sequence(&self) -> Vec<Command> {
        let mut seq = vec![Command::Close, Command::RevOff];
        if self.config.explicit_fire_off {
            seq.push(Command::FireOff);
        }
        seq.push(Command::VoicelineClose);
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(voiceline: u32, close: u32) -> EngagementStateMachine {
        EngagementStateMachine::new(EngagementConfig {
            voiceline_threshold: voiceline,
            close_threshold: close,
            explicit_fire_off: false,
        })
    }

    #[test]
    fn test_engage_once() {
        let sm = machine(8, 20);
        let mut state = TrackState::new();

        assert_eq!(sm.step(&mut state, true), ENGAGE_SEQUENCE.to_vec());
        assert!(state.is_engaged());

        for _ in 0..10 {
            assert!(sm.step(&mut state, true).is_empty());
        }
    }

    #[test]
    fn test_lost_voiceline_fires_on_threshold_only() {
        let sm = machine(8, 20);
        let mut state = TrackState::new();

        for frame in 1..=30 {
            let cmds = sm.step(&mut state, false);
            if frame == 8 {
                assert_eq!(cmds, vec![Command::VoicelineLost]);
            } else {
                assert!(cmds.is_empty(), "frame {frame}: {cmds:?}");
            }
        }
        assert!(state.voiceline_notified);
        assert_eq!(state.engagement, EngagementState::Disengaged);
    }

    #[test]
    fn test_reacquire_before_close_keeps_engaged() {
        let sm = machine(8, 20);
        let mut state = TrackState::new();
        sm.step(&mut state, true);

        for _ in 0..8 {
            sm.step(&mut state, false);
        }
        assert!(state.voiceline_notified);

        assert!(sm.step(&mut state, true).is_empty());
        assert!(state.is_engaged());
        assert_eq!(state.missed_frames, 0);
        assert!(!state.voiceline_notified);

        // Second loss episode notifies again.
        let mut lost = 0;
        for _ in 0..8 {
            lost += sm
                .step(&mut state, false)
                .iter()
                .filter(|c| **c == Command::VoicelineLost)
                .count();
        }
        assert_eq!(lost, 1);
    }

    #[test]
    fn test_disengage_after_close_threshold() {
        let sm = machine(8, 20);
        let mut state = TrackState::new();
        sm.step(&mut state, true);

        for frame in 1..=25 {
            let cmds = sm.step(&mut state, false);
            match frame {
                8 => assert_eq!(cmds, vec![Command::VoicelineLost]),
                21 => assert_eq!(
                    cmds,
                    vec![Command::Close, Command::RevOff, Command::VoicelineClose]
                ),
                _ => assert!(cmds.is_empty(), "frame {frame}: {cmds:?}"),
            }
        }
        assert!(!state.is_engaged());
    }

    #[test]
    fn test_explicit_fire_off() {
        let sm = EngagementStateMachine::new(EngagementConfig {
            explicit_fire_off: true,
            ..EngagementConfig::default()
        });
        assert_eq!(
            sm.disengage_sequence(),
            vec![
                Command::Close,
                Command::RevOff,
                Command::FireOff,
                Command::VoicelineClose
            ]
        );
    }

    #[test]
    fn test_missed_frames_saturate() {
        let sm = machine(8, 20);
        let mut state = TrackState {
            missed_frames: u32::MAX,
            ..TrackState::default()
        };
        sm.step(&mut state, false);
        assert_eq!(state.missed_frames, u32::MAX);
    }
}
