//! Input runtime abstraction
//! This module defines the narrow capability surface the bridge needs from a VR
//! input runtime: manifest registration, handle resolution, action set
//! activation and per-action state queries.

use std::path::Path;

use thiserror::Error;

#[cfg(feature = "openvr")]
pub mod openvr;
pub mod script;

/// Opaque handle of a single named action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionHandle(pub u64);

impl ActionHandle {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Opaque handle of a named action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActionSetHandle(pub u64);

impl ActionSetHandle {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// One entry of a per-tick action set activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveActionSet {
    pub action_set: ActionSetHandle,
    /// Higher priority wins when several sets bind the same physical input.
    pub priority: i32,
}

impl ActiveActionSet {
    pub fn new(action_set: ActionSetHandle, priority: i32) -> Self {
        Self {
            action_set,
            priority,
        }
    }
}

/// State of a digital (button) action as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitalActionData {
    /// The action is bound and its set is active.
    pub active: bool,
    /// Button is currently held.
    pub state: bool,
    /// `state` differs from the previous update.
    pub changed: bool,
}

impl DigitalActionData {
    pub fn is_pressed(&self) -> bool {
        self.active && self.state
    }

    /// Button went down during the last update.
    pub fn rising_edge(&self) -> bool {
        self.active && self.changed && self.state
    }
}

/// State of an analog (axis) action as reported by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalogActionData {
    pub active: bool,
    pub x: f32,
    pub y: f32,
}

impl AnalogActionData {
    /// 1-D reading, zero when the action is inactive.
    pub fn scalar(&self) -> f32 {
        if self.active { self.x } else { 0.0 }
    }

    /// 2-D reading, zero when the action is inactive.
    pub fn vector(&self) -> (f32, f32) {
        if self.active {
            (self.x, self.y)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Runtime initialization failure. Carries the runtime's numeric code, which
/// becomes the process exit code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{symbol} ({code})")]
pub struct InitError {
    pub code: i32,
    pub symbol: String,
}

impl InitError {
    pub fn new(code: i32, symbol: impl Into<String>) -> Self {
        Self {
            code,
            symbol: symbol.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.code
    }
}

/// Capabilities consumed from a VR input runtime.
///
/// Every query is a best-effort single read. Resolution failures surface as
/// invalid handles, and queries on invalid handles report inactive data.
pub trait InputRuntime {
    /// Registers the action manifest describing the named actions.
    fn set_action_manifest_path(&mut self, path: &Path);

    fn action_set_handle(&mut self, name: &str) -> ActionSetHandle;

    fn action_handle(&mut self, name: &str) -> ActionHandle;

    /// Activates exactly the given sets for this tick and refreshes action state.
    fn update_action_state(&mut self, sets: &[ActiveActionSet]);

    fn digital_action_data(&mut self, action: ActionHandle) -> DigitalActionData;

    fn analog_action_data(&mut self, action: ActionHandle) -> AnalogActionData;
}

impl<T: InputRuntime + ?Sized> InputRuntime for Box<T> {
    fn set_action_manifest_path(&mut self, path: &Path) {
        (**self).set_action_manifest_path(path)
    }

    fn action_set_handle(&mut self, name: &str) -> ActionSetHandle {
        (**self).action_set_handle(name)
    }

    fn action_handle(&mut self, name: &str) -> ActionHandle {
        (**self).action_handle(name)
    }

    fn update_action_state(&mut self, sets: &[ActiveActionSet]) {
        (**self).update_action_state(sets)
    }

    fn digital_action_data(&mut self, action: ActionHandle) -> DigitalActionData {
        (**self).digital_action_data(action)
    }

    fn analog_action_data(&mut self, action: ActionHandle) -> AnalogActionData {
        (**self).analog_action_data(action)
    }
}
