//! Frame position to actuator angle mapping.

use nalgebra::Point2;

/// Actuator angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AimAngles {
    pub yaw: f32,
    pub pitch: f32,
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear map from frame-relative position to yaw/pitch.
///
/// The left edge of the frame maps to `+yaw_limit` and the right edge to
/// `-yaw_limit`. The top edge maps to `+pitch_limit` and the bottom edge to
/// `-pitch_limit`, then `pitch_bias` is added. Positions outside the frame
/// extrapolate; the firmware clamps to its mechanical range.
#[derive(Debug, Clone, Copy)]
pub struct AimMapper {
    pub yaw_limit: f32,
    pub pitch_limit: f32,
    pub pitch_bias: f32,
}

impl AimMapper {
    pub fn new(yaw_limit: f32, pitch_limit: f32, pitch_bias: f32) -> Self {
        Self {
            yaw_limit,
            pitch_limit,
            pitch_bias,
        }
    }

    /// Map a pixel position in a `(width, height)` frame to angles.
    ///
    /// Returns `None` for a zero-sized frame.
    pub fn map(&self, position: &Point2<f32>, frame_size: (u32, u32)) -> Option<AimAngles> {
        let (width, height) = frame_size;
        if width == 0 || height == 0 {
            return None;
        }

        let rel_x = position.x / width as f32;
        let rel_y = position.y / height as f32;

        Some(AimAngles {
            yaw: lerp(self.yaw_limit, -self.yaw_limit, rel_x),
            pitch: lerp(self.pitch_limit, -self.pitch_limit, rel_y) + self.pitch_bias,
        })
    }
}
