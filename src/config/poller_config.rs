use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::controller::ControlMode;

/// Priority that puts the control set above anything else bound to the same inputs.
pub const CONTROL_SET_PRIORITY: i32 = 0x01FF_FFFF;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Polling rate. The tick period is `1000 / tick_hz` whole milliseconds.
    pub tick_hz: u32,

    /// Only emit `move` when speed or direction changed since the last tick.
    /// When false every control tick emits a `move` line.
    pub suppress_duplicate_moves: bool,

    /// Activate the control set on every tick, even in default mode.
    pub always_activate_control_set: bool,

    /// Mode at startup.
    pub initial_mode: ControlMode,

    pub control_set_priority: i32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            tick_hz: 100,
            suppress_duplicate_moves: true,
            always_activate_control_set: false,
            initial_mode: ControlMode::Control,
            control_set_priority: CONTROL_SET_PRIORITY,
        }
    }
}

impl PollerConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_hz.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_is_ten_milliseconds() {
        assert_eq!(PollerConfig::default().tick_period(), Duration::from_millis(10));
    }

    #[test]
    fn tick_period_truncates_to_whole_milliseconds() {
        let config = PollerConfig {
            tick_hz: 90,
            ..PollerConfig::default()
        };
        assert_eq!(config.tick_period(), Duration::from_millis(11));
    }
}
