//! Scripted input runtime
//! Replays recorded controller frames from a JSON-lines file. Each line is one
//! tick and maps action paths to samples:
//!
//! ```text
//! {"/actions/control/in/SpeedVector1": {"analog": {"x": 0.3}}}
//! {"/actions/default/in/ToggleControl": {"digital": true}}
//! ```
//!
//! The runtime behaves like the real action system where it matters to the
//! bridge: handles are assigned on resolution, actions outside the active sets
//! read inactive, and the `changed` flag of digital actions is derived from the
//! previous frame. Once the script is exhausted every action reads inactive.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use super::{
    ActionHandle, ActionSetHandle, ActiveActionSet, AnalogActionData, DigitalActionData,
    InputRuntime,
};

/// A single recorded action value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSample {
    Analog {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    Digital(bool),
}

/// Samples of one tick, keyed by action path.
pub type Frame = HashMap<String, ActionSample>;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read input script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frame on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub struct ScriptedRuntime {
    frames: Vec<Frame>,
    /// Index of the next frame to play.
    next_frame: usize,
    current: Frame,
    previous: Frame,
    action_sets: Vec<String>,
    actions: Vec<String>,
    active_sets: Vec<ActionSetHandle>,
    manifest_path: Option<PathBuf>,
}

impl ScriptedRuntime {
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            next_frame: 0,
            current: Frame::new(),
            previous: Frame::new(),
            action_sets: Vec::new(),
            actions: Vec::new(),
            active_sets: Vec::new(),
            manifest_path: None,
        }
    }

    /// Parses a JSON-lines script. Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ScriptError> {
        let mut frames = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| ScriptError::Io {
                path: PathBuf::from("<reader>"),
                source,
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let frame: Frame = serde_json::from_str(trimmed).map_err(|source| {
                ScriptError::Parse {
                    line: index + 1,
                    source,
                }
            })?;
            frames.push(frame);
        }
        Ok(Self::from_frames(frames))
    }

    pub fn open(path: &Path) -> Result<Self, ScriptError> {
        let file = File::open(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let runtime = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} input frames from {:?}",
            runtime.frame_count(),
            path
        );
        Ok(runtime)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frames not played yet.
    pub fn remaining_frames(&self) -> usize {
        self.frames.len().saturating_sub(self.next_frame)
    }

    pub fn manifest_path(&self) -> Option<&Path> {
        self.manifest_path.as_deref()
    }

    pub fn active_sets(&self) -> &[ActionSetHandle] {
        &self.active_sets
    }

    fn action_path(&self, action: ActionHandle) -> Option<&str> {
        let index = usize::try_from(action.0).ok()?.checked_sub(1)?;
        self.actions.get(index).map(String::as_str)
    }

    fn set_handle_of(&self, set_path: &str) -> ActionSetHandle {
        self.action_sets
            .iter()
            .position(|path| path == set_path)
            .map(|index| ActionSetHandle(index as u64 + 1))
            .unwrap_or(ActionSetHandle::INVALID)
    }

    /// Whether the set owning `action_path` was activated by the last update.
    fn is_live(&self, action_path: &str) -> bool {
        let Some(set_path) = owning_set(action_path) else {
            return false;
        };
        let handle = self.set_handle_of(set_path);
        handle.is_valid() && self.active_sets.contains(&handle)
    }
}

/// `/actions/control/in/Direction` belongs to `/actions/control`.
fn owning_set(action_path: &str) -> Option<&str> {
    action_path
        .rsplit_once("/in/")
        .or_else(|| action_path.rsplit_once("/out/"))
        .map(|(set, _)| set)
}

fn register(paths: &mut Vec<String>, name: &str) -> u64 {
    let index = match paths.iter().position(|path| path == name) {
        Some(index) => index,
        None => {
            paths.push(name.to_string());
            paths.len() - 1
        }
    };
    index as u64 + 1
}

fn pressed(frame: &Frame, path: &str) -> Option<bool> {
    match frame.get(path) {
        Some(ActionSample::Digital(state)) => Some(*state),
        _ => None,
    }
}

impl InputRuntime for ScriptedRuntime {
    fn set_action_manifest_path(&mut self, path: &Path) {
        debug!("Scripted runtime using manifest {:?}", path);
        self.manifest_path = Some(path.to_path_buf());
    }

    fn action_set_handle(&mut self, name: &str) -> ActionSetHandle {
        ActionSetHandle(register(&mut self.action_sets, name))
    }

    fn action_handle(&mut self, name: &str) -> ActionHandle {
        ActionHandle(register(&mut self.actions, name))
    }

    fn update_action_state(&mut self, sets: &[ActiveActionSet]) {
        self.active_sets = sets
            .iter()
            .map(|set| set.action_set)
            .filter(|handle| handle.is_valid())
            .collect();

        let next = self.frames.get(self.next_frame).cloned().unwrap_or_default();
        self.next_frame = self.next_frame.saturating_add(1);
        self.previous = std::mem::replace(&mut self.current, next);
    }

    fn digital_action_data(&mut self, action: ActionHandle) -> DigitalActionData {
        let Some(path) = self.action_path(action) else {
            return DigitalActionData::default();
        };
        let Some(state) = pressed(&self.current, path) else {
            return DigitalActionData::default();
        };
        let was_pressed = pressed(&self.previous, path).unwrap_or(false);
        DigitalActionData {
            active: self.is_live(path),
            state,
            changed: state != was_pressed,
        }
    }

    fn analog_action_data(&mut self, action: ActionHandle) -> AnalogActionData {
        let Some(path) = self.action_path(action) else {
            return AnalogActionData::default();
        };
        match self.current.get(path) {
            Some(ActionSample::Analog { x, y }) => AnalogActionData {
                active: self.is_live(path),
                x: *x,
                y: *y,
            },
            _ => AnalogActionData::default(),
        }
    }
}
