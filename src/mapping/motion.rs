//! Speed and heading derived from the stick actions.

use crate::core::runtime::AnalogActionData;

/// Upper bound of the 2-D speed contribution.
pub const MAX_SPEED: f32 = 1.0;

/// Deflection of a 2-D stick, clamped to `MAX_SPEED`.
pub fn planar_speed(x: f32, y: f32) -> f32 {
    x.hypot(y).min(MAX_SPEED)
}

/// Larger of the two speed contributions. Returns `linear` unless it is
/// strictly below `planar`.
pub fn combined_speed(linear: f32, planar: f32) -> f32 {
    if linear < planar { planar } else { linear }
}

/// Degrees from radians. The multiply stays in `f32`, only the division by π
/// is done in `f64`.
pub fn rad2deg(rad: f32) -> f32 {
    ((rad * 180.0) as f64 / std::f64::consts::PI) as f32
}

/// Compass-style bearing of the direction stick: up is 0°, the sign of the
/// x axis is flipped twice so right on the stick is +90°.
pub fn heading_degrees(x: f32, y: f32) -> f32 {
    rad2deg(-(-x).atan2(y))
}

/// Speed and heading of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub speed: f32,
    pub direction: f32,
}

impl Motion {
    pub fn from_actions(
        speed_vector1: &AnalogActionData,
        speed_vector2: &AnalogActionData,
        direction: &AnalogActionData,
    ) -> Self {
        let (sx, sy) = speed_vector2.vector();
        let speed = combined_speed(speed_vector1.scalar(), planar_speed(sx, sy));
        let (dx, dy) = direction.vector();
        Self {
            speed,
            direction: heading_degrees(dx, dy),
        }
    }

    /// Snap turns are only honoured while standing still.
    pub fn is_stationary(&self) -> bool {
        self.speed == 0.0
    }
}
