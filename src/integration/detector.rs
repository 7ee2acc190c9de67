//! Traits for the frame source and the object detection backend.

use crate::tracker::Detection;

/// A decoded video frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Sequence number assigned by the source, starting at 0
    pub id: u64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw pixel bytes (layout depends on the source); may be empty when
    /// the detector does not look at pixels
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(id: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            id,
            width,
            height,
            data,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Supplies frames on demand, blocking until one is available.
pub trait FrameSource {
    /// Error type for transient fetch failures.
    type Error;

    /// Fetch the next frame.
    ///
    /// # Returns
    /// * `Ok(Some(frame))` - a frame is ready
    /// * `Ok(None)` - the stream has ended
    /// * `Err(_)` - no frame this time; the caller may retry immediately
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the tracker.
///
/// # Example
///
/// ```ignore
/// use turret_track::{Detection, DetectionSource, Frame};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on a frame and return detections.
    ///
    /// An empty vector is the normal "nothing in view" result, not an error.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
///
/// Implement this for your model's output format to enable easy conversion.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// `(class_id, [x1, y1, x2, y2], score)` tuples, as many YOLO wrappers emit.
impl IntoDetections for Vec<(u32, [f32; 4], f32)> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|(class_id, b, score)| Detection::new(class_id, b[0], b[1], b[2], b[3], score))
            .collect()
    }
}
