//! Named actions from the action manifest and their resolved handles.

use std::path::Path;

use log::{debug, warn};

use crate::core::runtime::{ActionHandle, ActionSetHandle, InputRuntime};

pub const MANIFEST_FILE_NAME: &str = "actions.json";

pub const DEFAULT_SET: &str = "/actions/default";
pub const TOGGLE_CONTROL: &str = "/actions/default/in/ToggleControl";

pub const CONTROL_SET: &str = "/actions/control";
pub const SNAP_TURN_LEFT: &str = "/actions/control/in/SnapTurnLeft";
pub const SNAP_TURN_RIGHT: &str = "/actions/control/in/SnapTurnRight";
/// 1-D speed input, e.g. a trigger.
pub const SPEED_VECTOR_1: &str = "/actions/control/in/SpeedVector1";
/// 2-D speed input, e.g. a thumbstick whose deflection is the speed.
pub const SPEED_VECTOR_2: &str = "/actions/control/in/SpeedVector2";
pub const DIRECTION: &str = "/actions/control/in/Direction";

/// Handles resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionBindings {
    pub default_set: ActionSetHandle,
    pub toggle_control: ActionHandle,
    pub control_set: ActionSetHandle,
    pub snap_turn_left: ActionHandle,
    pub snap_turn_right: ActionHandle,
    pub speed_vector1: ActionHandle,
    pub speed_vector2: ActionHandle,
    pub direction: ActionHandle,
}

impl ActionBindings {
    /// Registers the manifest with the runtime and resolves every handle.
    ///
    /// A missing manifest is only warned about: the runtime then leaves the
    /// actions unbound and they read as inactive.
    pub fn register<R: InputRuntime + ?Sized>(runtime: &mut R, manifest_path: &Path) -> Self {
        if !manifest_path.is_file() {
            warn!(
                "Action manifest not found at {:?}, controller input will read as idle.",
                manifest_path
            );
        }
        runtime.set_action_manifest_path(manifest_path);

        let bindings = Self::resolve(runtime);
        for name in bindings.unresolved() {
            debug!("Runtime returned no handle for {}", name);
        }
        bindings
    }

    pub fn resolve<R: InputRuntime + ?Sized>(runtime: &mut R) -> Self {
        let default_set = runtime.action_set_handle(DEFAULT_SET);
        let toggle_control = runtime.action_handle(TOGGLE_CONTROL);
        let control_set = runtime.action_set_handle(CONTROL_SET);
        Self {
            default_set,
            toggle_control,
            control_set,
            snap_turn_left: runtime.action_handle(SNAP_TURN_LEFT),
            snap_turn_right: runtime.action_handle(SNAP_TURN_RIGHT),
            speed_vector1: runtime.action_handle(SPEED_VECTOR_1),
            speed_vector2: runtime.action_handle(SPEED_VECTOR_2),
            direction: runtime.action_handle(DIRECTION),
        }
    }

    /// Paths whose handle came back invalid.
    pub fn unresolved(&self) -> Vec<&'static str> {
        let sets = [(DEFAULT_SET, self.default_set), (CONTROL_SET, self.control_set)];
        let actions = [
            (TOGGLE_CONTROL, self.toggle_control),
            (SNAP_TURN_LEFT, self.snap_turn_left),
            (SNAP_TURN_RIGHT, self.snap_turn_right),
            (SPEED_VECTOR_1, self.speed_vector1),
            (SPEED_VECTOR_2, self.speed_vector2),
            (DIRECTION, self.direction),
        ];
        sets.iter()
            .filter(|(_, handle)| !handle.is_valid())
            .map(|(name, _)| *name)
            .chain(
                actions
                    .iter()
                    .filter(|(_, handle)| !handle.is_valid())
                    .map(|(name, _)| *name),
            )
            .collect()
    }
}
