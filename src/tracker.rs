mod aim;
mod engagement;
mod matching;
mod rect;
mod selector;
mod smoother;
mod track_state;
mod turret_tracker;

pub use aim::{AimAngles, AimMapper};
pub use engagement::{ENGAGE_SEQUENCE, EngagementConfig, EngagementStateMachine};
pub use matching::{Detection, PERSON_CLASS_ID, center_distance, filter_class, retain_well_formed};
pub use rect::Rect;
pub use selector::TargetSelector;
pub use smoother::{PositionSmoother, smooth};
pub use track_state::{EngagementState, TrackState};
pub use turret_tracker::{FrameOutcome, TrackerConfig, TurretTracker};
