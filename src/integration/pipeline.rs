//! TrackerPipeline for combining detection, tracking and command output.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::link::CommandLink;
use crate::protocol::Command;
use crate::tracker::{FrameOutcome, TrackState, TrackerConfig, TurretTracker};

use super::{DetectionSource, Frame, FrameSource};

/// Counters collected while the pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineStats {
    /// Frames that went through detection and tracking
    pub frames: u64,
    /// Iterations skipped because of a frame or detection failure
    pub skipped_frames: u64,
    /// Frames in which a target was selected
    pub frames_with_target: u64,
    pub commands_sent: u64,
    pub send_failures: u64,
    /// Wall time spent inside `run`
    pub elapsed: Duration,
}

impl PipelineStats {
    /// Average processed frames per second over `elapsed`.
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }
}

/// Full control loop: detector, tracker, and command link.
///
/// Strictly single-threaded. Each frame runs detection, selection,
/// smoothing, aiming and the engagement step in sequence, then sends the
/// resulting commands before the next frame is fetched.
pub struct TrackerPipeline<D: DetectionSource, L: CommandLink> {
    detector: D,
    link: L,
    tracker: TurretTracker,
    state: TrackState,
    stats: PipelineStats,
    frame_limit: Option<u64>,
    last_frame_at: Option<Instant>,
}

impl<D: DetectionSource, L: CommandLink> TrackerPipeline<D, L> {
    /// Create a new pipeline with the given detector, link and tracker config.
    pub fn new(detector: D, link: L, config: TrackerConfig) -> Self {
        Self {
            detector,
            link,
            tracker: TurretTracker::new(config),
            state: TrackState::new(),
            stats: PipelineStats::default(),
            frame_limit: None,
            last_frame_at: None,
        }
    }

    /// Create a new pipeline with default tracker configuration.
    pub fn with_default_config(detector: D, link: L) -> Self {
        Self::new(detector, link, TrackerConfig::default())
    }

    /// Stop `run` after this many processed frames.
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Process a single frame and send the resulting commands.
    ///
    /// A detection error leaves the tracking state untouched.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameOutcome, D::Error> {
        let detections = self.detector.detect(frame)?;
        let outcome = self
            .tracker
            .update(&mut self.state, &detections, frame.size());

        self.stats.frames += 1;
        if outcome.target.is_some() {
            self.stats.frames_with_target += 1;
        }
        for command in &outcome.commands {
            self.dispatch(command);
        }

        let now = Instant::now();
        if let Some(prev) = self.last_frame_at.replace(now) {
            let dt = now.duration_since(prev).as_secs_f64();
            if dt > 0.0 {
                debug!(
                    frame = frame.id,
                    detections = detections.len(),
                    fps = 1.0 / dt,
                    "frame processed"
                );
            }
        }

        Ok(outcome)
    }

    /// Send one command, logging instead of failing.
    fn dispatch(&mut self, command: &Command) {
        match self.link.send(command) {
            Ok(()) => self.stats.commands_sent += 1,
            Err(e) => {
                self.stats.send_failures += 1;
                warn!(error = %e, "command dropped");
            }
        }
    }

    /// Pull frames from `source` until it ends, `stop` is raised, or the
    /// frame limit is hit.
    ///
    /// `stop` is checked between iterations, never mid-frame. Fetch and
    /// detection failures are logged and the loop moves on to the next
    /// frame.
    pub fn run<S>(&mut self, source: &mut S, stop: &AtomicBool) -> PipelineStats
    where
        S: FrameSource,
        S::Error: Display,
        D::Error: Display,
    {
        let started = Instant::now();
        let base = self.stats.elapsed;

        while !stop.load(Ordering::Relaxed) {
            if self.frame_limit.is_some_and(|limit| self.stats.frames >= limit) {
                info!(frames = self.stats.frames, "frame limit reached");
                break;
            }

            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("frame source ended");
                    break;
                }
                Err(e) => {
                    self.stats.skipped_frames += 1;
                    warn!(error = %e, "failed to grab frame");
                    continue;
                }
            };

            if let Err(e) = self.process_frame(&frame) {
                self.stats.skipped_frames += 1;
                warn!(frame = frame.id, error = %e, "detection failed");
            }
        }

        self.stats.elapsed = base + started.elapsed();
        info!(
            frames = self.stats.frames,
            skipped = self.stats.skipped_frames,
            with_target = self.stats.frames_with_target,
            commands = self.stats.commands_sent,
            send_failures = self.stats.send_failures,
            fps = self.stats.fps(),
            "pipeline stopped"
        );
        self.stats
    }

    /// Get a reference to the current tracking state.
    pub fn state(&self) -> &TrackState {
        &self.state
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the command link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Get a mutable reference to the command link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &TurretTracker {
        &self.tracker
    }
}
