//! Per-tick translation of controller actions into locomotion commands.

use log::info;

use crate::config::poller_config::PollerConfig;
use crate::core::actions::ActionBindings;
use crate::core::controller::ControlMode;
use crate::core::runtime::{ActiveActionSet, InputRuntime};
use crate::mapping::command::{Command, Turn};
use crate::mapping::motion::Motion;

/// Priority of the default action set; the control set outranks it.
pub const DEFAULT_SET_PRIORITY: i32 = 0;

/// Result of a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Commands to emit, in order.
    pub commands: Vec<Command>,
    /// New mode if the toggle fired this tick.
    pub transition: Option<ControlMode>,
}

/// Translates controller actions into commands
pub struct Translator {
    bindings: ActionBindings,
    mode: ControlMode,
    /// Last motion passed through the duplicate check. `None` until the first
    /// control tick, so the first move always goes out.
    last_motion: Option<Motion>,
    suppress_duplicate_moves: bool,
    always_activate_control_set: bool,
    control_set_priority: i32,
}

impl Translator {
    pub fn new(bindings: ActionBindings, config: &PollerConfig) -> Self {
        Self {
            bindings,
            mode: config.initial_mode,
            last_motion: None,
            suppress_duplicate_moves: config.suppress_duplicate_moves,
            always_activate_control_set: config.always_activate_control_set,
            control_set_priority: config.control_set_priority,
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn last_motion(&self) -> Option<Motion> {
        self.last_motion
    }

    /// Runs one tick against the runtime and returns what to emit.
    pub fn step<R: InputRuntime + ?Sized>(&mut self, runtime: &mut R) -> TickOutcome {
        self.activate_action_sets(runtime);

        let toggle = runtime.digital_action_data(self.bindings.toggle_control);
        if toggle.rising_edge() {
            self.mode = self.mode.toggled();
            info!("Activate State: {}", self.mode);
            return TickOutcome {
                commands: Vec::new(),
                transition: Some(self.mode),
            };
        }

        if !self.mode.is_control() {
            return TickOutcome::default();
        }

        let motion = Motion::from_actions(
            &runtime.analog_action_data(self.bindings.speed_vector1),
            &runtime.analog_action_data(self.bindings.speed_vector2),
            &runtime.analog_action_data(self.bindings.direction),
        );

        let mut commands = Vec::new();
        if !self.suppress_duplicate_moves || self.last_motion != Some(motion) {
            commands.push(Command::Move {
                speed: motion.speed,
                direction: motion.direction,
            });
        }
        self.last_motion = Some(motion);

        if motion.is_stationary()
            && runtime
                .digital_action_data(self.bindings.snap_turn_left)
                .rising_edge()
        {
            commands.push(Command::SnapTurn(Turn::Left));
        }
        if motion.is_stationary()
            && runtime
                .digital_action_data(self.bindings.snap_turn_right)
                .rising_edge()
        {
            commands.push(Command::SnapTurn(Turn::Right));
        }

        TickOutcome {
            commands,
            transition: None,
        }
    }

    /// Sends this tick's single activation update: the default set alone, or
    /// both sets with the control set on top.
    fn activate_action_sets<R: InputRuntime + ?Sized>(&self, runtime: &mut R) {
        let sets = [
            ActiveActionSet::new(self.bindings.default_set, DEFAULT_SET_PRIORITY),
            ActiveActionSet::new(self.bindings.control_set, self.control_set_priority),
        ];
        let count = if self.mode.is_control() || self.always_activate_control_set {
            2
        } else {
            1
        };
        runtime.update_action_state(&sets[..count]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::runtime::script::ScriptedRuntime;

    fn setup(script: &str, config: &PollerConfig) -> (Translator, ScriptedRuntime) {
        let mut runtime = ScriptedRuntime::from_reader(script.as_bytes()).unwrap();
        let bindings = ActionBindings::resolve(&mut runtime);
        (Translator::new(bindings, config), runtime)
    }

    #[test]
    fn default_mode_activates_only_default_set() {
        let config = PollerConfig {
            initial_mode: ControlMode::Default,
            ..PollerConfig::default()
        };
        let (mut translator, mut runtime) = setup("{}\n", &config);

        let outcome = translator.step(&mut runtime);

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(runtime.active_sets().len(), 1);
    }

    #[test]
    fn always_activate_keeps_control_set_live_in_default_mode() {
        let config = PollerConfig {
            initial_mode: ControlMode::Default,
            always_activate_control_set: true,
            ..PollerConfig::default()
        };
        let (mut translator, mut runtime) = setup(
            "{\"/actions/control/in/SpeedVector1\": {\"analog\": {\"x\": 1.0}}}\n",
            &config,
        );

        let outcome = translator.step(&mut runtime);

        assert_eq!(runtime.active_sets().len(), 2);
        assert!(outcome.commands.is_empty());
    }

    #[test]
    fn control_mode_activates_both_sets() {
        let (mut translator, mut runtime) = setup("{}\n", &PollerConfig::default());
        translator.step(&mut runtime);
        assert_eq!(runtime.active_sets().len(), 2);
        assert_eq!(translator.last_motion(), Some(Motion { speed: 0.0, direction: 0.0 }));
    }

    #[test]
    fn toggle_tick_emits_nothing() {
        let (mut translator, mut runtime) = setup(
            concat!(
                "{\"/actions/default/in/ToggleControl\": {\"digital\": true},",
                " \"/actions/control/in/SpeedVector1\": {\"analog\": {\"x\": 0.5}}}\n",
            ),
            &PollerConfig::default(),
        );

        let outcome = translator.step(&mut runtime);

        assert_eq!(outcome.transition, Some(ControlMode::Default));
        assert!(outcome.commands.is_empty());
        assert_eq!(translator.mode(), ControlMode::Default);
        assert_eq!(translator.last_motion(), None);
    }

    #[test]
    fn snap_turn_ignored_while_moving() {
        let (mut translator, mut runtime) = setup(
            concat!(
                "{\"/actions/control/in/SnapTurnRight\": {\"digital\": true},",
                " \"/actions/control/in/SpeedVector2\": {\"analog\": {\"x\": 0.0, \"y\": 0.2}}}\n",
            ),
            &PollerConfig::default(),
        );

        let outcome = translator.step(&mut runtime);

        assert_eq!(
            outcome.commands,
            vec![Command::Move {
                speed: 0.2,
                direction: 0.0
            }]
        );
    }
}
