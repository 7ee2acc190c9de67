//! Integration module for connecting frame sources, detection backends and
//! the turret tracker.
//!
//! This module provides the traits at the boundary with the camera and the
//! detection model, plus the frame loop that drives the tracker and sends
//! commands.

mod builder;
mod detector;
mod pipeline;
mod replay;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, Frame, FrameSource, IntoDetections};
pub use pipeline::{PipelineStats, TrackerPipeline};
pub use replay::{Recording, ReplayDetector, ReplayError, ReplayFrames, load_replay};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, RawDetection};
