//! Controller mode state machine
//! The toggle action flips between idle pass-through and active locomotion control.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which action sets drive output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Only the toggle action is watched; nothing is emitted.
    Default,
    /// Speed, direction and snap turns are translated into commands.
    #[default]
    Control,
}

impl ControlMode {
    pub fn is_control(self) -> bool {
        self == ControlMode::Control
    }

    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Default => ControlMode::Control,
            ControlMode::Control => ControlMode::Default,
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Default => f.write_str("Default"),
            ControlMode::Control => f.write_str("Control"),
        }
    }
}
