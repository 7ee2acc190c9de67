//! Burn inference backend for object detection.
//!
//! `BurnDetector` implements `DetectionSource` for detection models built
//! with the Burn framework, turning raw model rows into class-labelled
//! detections for the turret tracker.
//!
//! # Example
//!
//! ```ignore
//! use turret_track::integration::{BurnDetector, BurnModel, RawDetection};
//! use burn::backend::NdArray;
//!
//! struct MyYoloModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyYoloModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> Vec<RawDetection> {
//!         // Run inference
//!     }
//! }
//!
//! let detector = BurnDetector::new(MyYoloModel::load("model.bin"), Default::default())
//!     .with_conf_threshold(0.4);
//! ```

use burn::prelude::*;
use burn::tensor::Tensor;
use thiserror::Error;

use super::{DetectionBuilder, DetectionSource, Frame};
use crate::tracker::{Detection, PERSON_CLASS_ID};

/// Error type for Burn detection failures.
#[derive(Debug, Clone, Error)]
pub enum BurnDetectorError {
    /// Frame buffer length does not match its declared dimensions.
    #[error("frame {width}x{height} with {channels} channels needs {expected} bytes, got {got}")]
    InvalidFrameBuffer {
        width: u32,
        height: u32,
        channels: u32,
        expected: usize,
        got: usize,
    },
    /// Frame size differs from the model input size.
    #[error("frame size {got:?} doesn't match model input {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        got: (u32, u32),
    },
}

/// Raw detection output from the model.
#[derive(Debug, Clone)]
pub struct RawDetection {
    /// Bounding box: [x1, y1, x2, y2] or [cx, cy, w, h] depending on model
    pub bbox: [f32; 4],
    /// Confidence score
    pub score: f32,
    /// Class ID, `None` for single-class models
    pub class_id: Option<usize>,
}

/// Trait for Burn-based detection models.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on a `[1, channels, height, width]` tensor.
    fn forward(&self, input: Tensor<B, 4>) -> Vec<RawDetection>;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 640, 640)
    }

    /// Whether bbox output is in XYWH format (vs TLBR).
    fn bbox_is_xywh(&self) -> bool {
        true
    }
}

/// Burn-based object detector implementing `DetectionSource`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    conf_threshold: f32,
    default_class: u32,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            conf_threshold: 0.25,
            default_class: PERSON_CLASS_ID,
        }
    }

    /// Set the confidence threshold for filtering detections.
    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    /// Class assigned to rows the model leaves unlabelled.
    pub fn with_default_class(mut self, class_id: u32) -> Self {
        self.default_class = class_id;
        self
    }

    /// Normalize a planar `[C, H, W]` u8 frame into a `[1, C, H, W]` tensor.
    pub fn preprocess(&self, frame: &Frame) -> Result<Tensor<B, 4>, BurnDetectorError> {
        let (channels, model_h, model_w) = self.model.input_size();
        if (frame.width, frame.height) != (model_w, model_h) {
            return Err(BurnDetectorError::SizeMismatch {
                expected: (model_w, model_h),
                got: (frame.width, frame.height),
            });
        }

        let expected = (frame.width as usize) * (frame.height as usize) * (channels as usize);
        if frame.data.len() != expected {
            return Err(BurnDetectorError::InvalidFrameBuffer {
                width: frame.width,
                height: frame.height,
                channels,
                expected,
                got: frame.data.len(),
            });
        }

        let data: Vec<f32> = frame.data.iter().map(|&x| x as f32 / 255.0).collect();
        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            channels as usize,
            frame.height as usize,
            frame.width as usize,
        ]);
        Ok(tensor)
    }

    /// Convert raw model outputs to Detection objects.
    fn postprocess(&self, raw_detections: Vec<RawDetection>) -> Vec<Detection> {
        raw_detections
            .into_iter()
            .filter(|d| d.score >= self.conf_threshold)
            .filter_map(|d| {
                // Unlabelled rows take the default class; out-of-range labels are dropped.
                let class_id = match d.class_id {
                    None => self.default_class,
                    Some(c) => u32::try_from(c).ok()?,
                };
                let builder = DetectionBuilder::new().class(class_id).score(d.score);
                let [b0, b1, b2, b3] = d.bbox;
                let detection = if self.model.bbox_is_xywh() {
                    builder.xywh(b0, b1, b2, b3).build()
                } else {
                    builder.tlbr(b0, b1, b2, b3).build()
                };
                Some(detection)
            })
            .collect()
    }
}

impl<B: Backend, M: BurnModel<B>> DetectionSource for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Self::Error> {
        let tensor = self.preprocess(frame)?;
        let raw_detections = self.model.forward(tensor);
        Ok(self.postprocess(raw_detections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    struct FixedModel;

    impl BurnModel<NdArray> for FixedModel {
        fn forward(&self, _input: Tensor<NdArray, 4>) -> Vec<RawDetection> {
            Vec::new()
        }

        fn bbox_is_xywh(&self) -> bool {
            false
        }
    }

    fn raw(class_id: Option<usize>, score: f32) -> RawDetection {
        RawDetection {
            bbox: [10.0, 10.0, 50.0, 90.0],
            score,
            class_id,
        }
    }

    #[test]
    fn test_postprocess_class_mapping() {
        let detector = BurnDetector::<NdArray, _>::new(FixedModel, Default::default())
            .with_default_class(7);

        let dets = detector.postprocess(vec![
            raw(None, 0.9),
            raw(Some(2), 0.9),
            raw(Some(usize::MAX), 0.9),
            raw(Some(0), 0.1),
        ]);

        let classes: Vec<u32> = dets.iter().map(|d| d.class_id).collect();
        #[cfg(target_pointer_width = "64")]
        assert_eq!(classes, vec![7, 2]);
        assert_eq!(dets[0].bbox.to_tlbr(), [10.0, 10.0, 50.0, 90.0]);
    }
}
