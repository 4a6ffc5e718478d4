//! Core functionality for the VR locomotion bridge
//! This module contains the input runtime abstraction, the named actions and the mode state machine.

pub mod actions;
pub mod controller;
pub mod runtime;

// Re-export commonly used types
pub use actions::ActionBindings;
pub use controller::ControlMode;
pub use runtime::{InitError, InputRuntime};
