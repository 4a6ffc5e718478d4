//! OpenVR input backend
//! Talks to SteamVR through the flat C function tables exported by `openvr_sys`.

use std::ffi::{CStr, CString};
use std::mem;
use std::path::Path;

use log::{debug, warn};
use openvr_sys as sys;

use super::{
    ActionHandle, ActionSetHandle, ActiveActionSet, AnalogActionData, DigitalActionData,
    InitError, InputRuntime,
};

/// `k_ulInvalidInputValueHandle`: do not restrict queries to one device.
const ANY_INPUT_SOURCE: u64 = 0;

pub struct OpenVrRuntime {
    input: &'static sys::VR_IVRInput_FnTable,
}

fn init_error(error: sys::EVRInitError) -> InitError {
    let symbol = unsafe {
        let ptr = sys::VR_GetVRInitErrorAsSymbol(error);
        if ptr.is_null() {
            format!("VRInitError_{}", error as i32)
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    };
    InitError::new(error as i32, symbol)
}

impl OpenVrRuntime {
    /// Initializes the runtime as an overlay application and loads the input interface.
    pub fn init_overlay() -> Result<Self, InitError> {
        let mut error = sys::EVRInitError_VRInitError_None;
        unsafe {
            sys::VR_InitInternal(&mut error, sys::EVRApplicationType_VRApplication_Overlay);
        }
        if error != sys::EVRInitError_VRInitError_None {
            return Err(init_error(error));
        }

        let mut magic = Vec::from(b"FnTable:".as_ref());
        magic.extend(sys::IVRInput_Version.iter().copied());
        let table = unsafe { sys::VR_GetGenericInterface(magic.as_ptr() as *const _, &mut error) };
        if error != sys::EVRInitError_VRInitError_None || table == 0 {
            return Err(init_error(error));
        }

        Ok(Self {
            input: unsafe { &*(table as *const sys::VR_IVRInput_FnTable) },
        })
    }
}

fn c_string(value: &str) -> Option<CString> {
    match CString::new(value) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Cannot pass {:?} to the runtime: {}", value, e);
            None
        }
    }
}

impl InputRuntime for OpenVrRuntime {
    fn set_action_manifest_path(&mut self, path: &Path) {
        let Some(set_manifest) = self.input.SetActionManifestPath else {
            return;
        };
        let Some(path) = c_string(&path.to_string_lossy()) else {
            return;
        };
        let result = unsafe { set_manifest(path.as_ptr() as *mut _) };
        debug!("SetActionManifestPath returned {}", result as i32);
    }

    fn action_set_handle(&mut self, name: &str) -> ActionSetHandle {
        let (Some(get_handle), Some(name)) = (self.input.GetActionSetHandle, c_string(name)) else {
            return ActionSetHandle::INVALID;
        };
        let mut handle = 0;
        unsafe { get_handle(name.as_ptr() as *mut _, &mut handle) };
        ActionSetHandle(handle)
    }

    fn action_handle(&mut self, name: &str) -> ActionHandle {
        let (Some(get_handle), Some(name)) = (self.input.GetActionHandle, c_string(name)) else {
            return ActionHandle::INVALID;
        };
        let mut handle = 0;
        unsafe { get_handle(name.as_ptr() as *mut _, &mut handle) };
        ActionHandle(handle)
    }

    fn update_action_state(&mut self, sets: &[ActiveActionSet]) {
        let Some(update) = self.input.UpdateActionState else {
            return;
        };
        let mut active: Vec<sys::VRActiveActionSet_t> = sets
            .iter()
            .map(|set| {
                let mut raw: sys::VRActiveActionSet_t = unsafe { mem::zeroed() };
                raw.ulActionSet = set.action_set.0;
                raw.nPriority = set.priority;
                raw
            })
            .collect();
        unsafe {
            update(
                active.as_mut_ptr(),
                mem::size_of::<sys::VRActiveActionSet_t>() as u32,
                active.len() as u32,
            );
        }
    }

    fn digital_action_data(&mut self, action: ActionHandle) -> DigitalActionData {
        let Some(get_data) = self.input.GetDigitalActionData else {
            return DigitalActionData::default();
        };
        let mut raw: sys::InputDigitalActionData_t = unsafe { mem::zeroed() };
        unsafe {
            get_data(
                action.0,
                &mut raw,
                mem::size_of::<sys::InputDigitalActionData_t>() as u32,
                ANY_INPUT_SOURCE,
            );
        }
        DigitalActionData {
            active: raw.bActive,
            state: raw.bState,
            changed: raw.bChanged,
        }
    }

    fn analog_action_data(&mut self, action: ActionHandle) -> AnalogActionData {
        let Some(get_data) = self.input.GetAnalogActionData else {
            return AnalogActionData::default();
        };
        let mut raw: sys::InputAnalogActionData_t = unsafe { mem::zeroed() };
        unsafe {
            get_data(
                action.0,
                &mut raw,
                mem::size_of::<sys::InputAnalogActionData_t>() as u32,
                ANY_INPUT_SOURCE,
            );
        }
        AnalogActionData {
            active: raw.bActive,
            x: raw.x,
            y: raw.y,
        }
    }
}
