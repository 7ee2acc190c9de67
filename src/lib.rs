//! Single-target continuity tracking and engagement control for a
//! camera-aimed turret.
//!
//! Each frame's detections go through [`TurretTracker`], which picks the
//! target nearest the previous one, smooths its position, maps it to
//! yaw/pitch, and runs a debounced engage/disengage state machine. The
//! resulting [`Command`]s are sent over a [`CommandLink`], normally
//! [`UdpCommandLink`].

pub mod config;
pub mod integration;
pub mod link;
pub mod protocol;
pub mod tracker;

pub use config::{ConfigError, TurretConfig};
pub use integration::{
    DetectionBuilder, DetectionSource, Frame, FrameSource, IntoDetections, PipelineStats,
    TrackerPipeline,
};
pub use link::{CommandLink, LinkError, MemoryLink, UdpCommandLink};
pub use protocol::{Command, ProtocolError};
pub use tracker::{
    AimAngles, AimMapper, Detection, EngagementConfig, EngagementState, EngagementStateMachine,
    FrameOutcome, PositionSmoother, Rect, TargetSelector, TrackState, TrackerConfig,
    TurretTracker,
};
