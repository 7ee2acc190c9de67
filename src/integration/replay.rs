//! Replay of recorded detections in place of a live camera and model.
//!
//! A recording is a JSON document:
//!
//! ```json
//! {
//!   "width": 640,
//!   "height": 480,
//!   "frames": [
//!     [{ "class_id": 0, "bbox": [300, 200, 340, 280], "score": 0.91 }],
//!     []
//!   ]
//! }
//! ```
//!
//! Each entry of `frames` holds the detections for one frame, in detector
//! output order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DetectionSource, Frame, FrameSource};
use crate::tracker::Detection;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("cannot read replay {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid replay document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("replay frame size must be non-zero, got {0}x{1}")]
    FrameSize(u32, u32),
    #[error("no recorded detections for frame {0}")]
    MissingFrame(u64),
}

/// A decoded recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Vec<Detection>>,
}

impl Recording {
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let recording: Recording = serde_json::from_str(text)?;
        if recording.width == 0 || recording.height == 0 {
            return Err(ReplayError::FrameSize(recording.width, recording.height));
        }
        Ok(recording)
    }

    /// Split into a frame source and a detector that agree on frame ids.
    pub fn into_parts(self) -> (ReplayFrames, ReplayDetector) {
        let frames = ReplayFrames {
            width: self.width,
            height: self.height,
            count: self.frames.len() as u64,
            next: 0,
        };
        (frames, ReplayDetector { frames: self.frames })
    }
}

/// Read a recording from disk and split it.
pub fn load_replay(path: impl AsRef<Path>) -> Result<(ReplayFrames, ReplayDetector), ReplayError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Recording::from_json(&text)?.into_parts())
}

/// Blank frames of the recorded size, one per recorded entry.
#[derive(Debug, Clone)]
pub struct ReplayFrames {
    width: u32,
    height: u32,
    count: u64,
    next: u64,
}

impl ReplayFrames {
    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl FrameSource for ReplayFrames {
    type Error = std::convert::Infallible;

    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error> {
        if self.next >= self.count {
            return Ok(None);
        }
        let frame = Frame::new(self.next, self.width, self.height, Vec::new());
        self.next += 1;
        Ok(Some(frame))
    }
}

/// Returns the recorded detections for each frame id.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    frames: Vec<Vec<Detection>>,
}

impl DetectionSource for ReplayDetector {
    type Error = ReplayError;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        usize::try_from(frame.id)
            .ok()
            .and_then(|i| self.frames.get(i))
            .cloned()
            .ok_or(ReplayError::MissingFrame(frame.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "width": 640,
        "height": 480,
        "frames": [
            [{"class_id": 0, "bbox": [300, 200, 340, 280], "score": 0.91}],
            [],
            [{"class_id": 2, "bbox": [0, 0, 10, 10]}]
        ]
    }"#;

    #[test]
    fn test_replay_yields_recorded_frames() {
        let (mut frames, mut detector) = Recording::from_json(DOC).unwrap().into_parts();
        assert_eq!(frames.len(), 3);

        let mut per_frame = Vec::new();
        while let Ok(Some(frame)) = frames.next_frame() {
            assert_eq!(frame.size(), (640, 480));
            per_frame.push(detector.detect(&frame).unwrap());
        }

        assert_eq!(per_frame.len(), 3);
        assert_eq!(per_frame[0][0].center().x, 320.0);
        assert!(per_frame[1].is_empty());
        assert_eq!(per_frame[2][0].class_id, 2);
    }

    #[test]
    fn test_missing_frame_is_an_error() {
        let (_, mut detector) = Recording::from_json(DOC).unwrap().into_parts();
        let err = detector.detect(&Frame::new(7, 640, 480, Vec::new()));
        assert!(matches!(err, Err(ReplayError::MissingFrame(7))));
    }

    #[test]
    fn test_rejects_zero_sized_frames() {
        let err = Recording::from_json(r#"{"width": 0, "height": 480, "frames": []}"#);
        assert!(matches!(err, Err(ReplayError::FrameSize(0, 480))));
    }

    #[test]
    fn test_load_replay_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, DOC).unwrap();

        let (frames, _) = load_replay(&path).unwrap();
        assert_eq!(frames.len(), 3);

        assert!(matches!(
            load_replay(dir.path().join("missing.json")),
            Err(ReplayError::Io { .. })
        ));
    }
}
