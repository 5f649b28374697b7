use crate::bindings::{BindingAction, BindingRegistry, BindingSet};
use crate::error::ConfigurationError;
use crate::gate::{evaluate_pause, ActivationListener, ActivationState};
use crate::input::{DisplayBackend, InputAction, InputBackend};
use crate::monitors::{MonitorInfo, MonitorTopology};
use crate::settings::SharedSettings;
use crate::shapes::GestureIndex;
use crate::trigger::{
    detect_edge, evaluate_keyboard, evaluate_mouse, Edge, KeyState, MouseTrigger, Trigger,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Turns gesture sample vectors into device actions, one tick at a time.
///
/// The host owns the engine and feeds it samples in order; evaluation is
/// synchronous and never blocks on the input backend.
pub struct Keybinder {
    settings: SharedSettings,
    input: Arc<dyn InputBackend>,
    display: Arc<dyn DisplayBackend>,
    gestures: GestureIndex,
    registry: BindingRegistry,
    activation: ActivationState,
    topology: MonitorTopology,
    screen_size: Option<(i32, i32)>,
    started: bool,
    actions: Vec<InputAction>,
}

impl Keybinder {
    pub fn new(
        settings: SharedSettings,
        input: Arc<dyn InputBackend>,
        display: Arc<dyn DisplayBackend>,
    ) -> Self {
        Self {
            settings,
            input,
            display,
            gestures: GestureIndex::blendshapes(),
            registry: BindingRegistry::new(),
            activation: ActivationState::default(),
            topology: MonitorTopology::default(),
            screen_size: None,
            started: false,
            actions: Vec::new(),
        }
    }

    /// Use a custom gesture layout instead of the face blendshape table.
    pub fn with_gesture_index(mut self, gestures: GestureIndex) -> Self {
        self.gestures = gestures;
        self
    }

    /// Load bindings, capture the monitor layout and seed the activation
    /// flag. Calling it again is a no-op.
    ///
    /// Invalid bindings do not prevent startup; the error resurfaces from the
    /// first [`evaluate`](Self::evaluate) call.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        tracing::info!("starting keybinder");

        match self.settings.lock() {
            Ok(settings) => {
                if let Err(err) = self.registry.reload_if_changed(&settings) {
                    tracing::warn!(%err, "bindings rejected at startup");
                }
                self.activation.set(settings.auto_play);
            }
            Err(err) => tracing::error!(%err, "failed to lock settings"),
        }

        self.screen_size = Some(self.input.screen_size());
        self.topology = MonitorTopology::capture(self.display.as_ref());
        self.started = true;
    }

    /// Evaluate one sample vector at the current time.
    pub fn evaluate(&mut self, values: &[f32]) -> Result<(), ConfigurationError> {
        self.evaluate_at(values, Instant::now())
    }

    /// Evaluate one sample vector taken at `now`.
    pub fn evaluate_at(&mut self, values: &[f32], now: Instant) -> Result<(), ConfigurationError> {
        if !self.started {
            tracing::debug!("sample ignored; keybinder not started");
            return Ok(());
        }

        let (hold_trigger, honor_mouse_modes) = {
            let settings = self
                .settings
                .lock()
                .map_err(|err| ConfigurationError::SettingsUnavailable(err.to_string()))?;
            if self.registry.reload_if_changed(&settings)? {
                tracing::info!("bindings changed; key state reset");
            }
            (
                Duration::from_millis(settings.hold_trigger_ms),
                settings.honor_mouse_modes,
            )
        };

        let (bindings, state) = self.registry.parts_mut();
        for binding in bindings.iter() {
            let Some(value) = self.gestures.value_in(&binding.gesture, values) else {
                continue;
            };
            let id = binding.id();

            if binding.action == BindingAction::Pause {
                let slot = state.slot_mut(&id);
                if evaluate_pause(&mut slot.active, value, binding.threshold, &mut self.activation) {
                    tracing::info!(gesture = %binding.gesture, "pause gesture toggled activation");
                }
                continue;
            }
            if !self.activation.is_active() {
                continue;
            }

            match &binding.action {
                BindingAction::Reset | BindingAction::Cycle => {
                    let slot = state.slot_mut(&id);
                    if detect_edge(&mut slot.active, value, binding.threshold)
                        == Some(Edge::Rising)
                    {
                        let cursor = self.input.cursor_position();
                        let target = if binding.action == BindingAction::Reset {
                            self.topology.reset_target(cursor)
                        } else {
                            self.topology.cycle_target(cursor)
                        };
                        match target {
                            Some((x, y)) => self.actions.push(InputAction::MoveTo { x, y }),
                            None => tracing::warn!(
                                gesture = %binding.gesture,
                                "no monitors known; pointer left in place"
                            ),
                        }
                    }
                }
                BindingAction::Button(button) => {
                    let mode = if honor_mouse_modes {
                        binding.mode
                    } else {
                        mouse_mode_override(state)
                    };
                    evaluate_mouse(
                        state,
                        MouseTrigger {
                            id: &id,
                            button: *button,
                            value,
                            threshold: binding.threshold,
                            mode,
                        },
                        now,
                        hold_trigger,
                        &mut self.actions,
                    );
                }
                BindingAction::Key(key) => {
                    evaluate_keyboard(state, &id, key, value, binding.threshold, &mut self.actions);
                }
                BindingAction::Pause => {}
            }

            for action in self.actions.drain(..) {
                tracing::debug!(gesture = %binding.gesture, ?action, "dispatching input");
                self.input.perform(&action);
            }
        }
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.activation.set(active);
    }

    /// Flip activation and return the new value.
    pub fn toggle_active(&mut self) -> bool {
        tracing::info!("toggle active");
        self.activation.toggle()
    }

    pub fn is_active(&self) -> bool {
        self.activation.is_active()
    }

    /// Register a callback invoked with the new value on every activation
    /// change.
    pub fn subscribe_activation(&mut self, listener: ActivationListener) {
        self.activation.subscribe(listener);
    }

    /// Run overridden mouse bindings as HOLD until the next binding reload.
    pub fn route_mouse_through_hold(&mut self, hold: bool) {
        self.registry.parts_mut().1.set_route_through_hold(hold);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn bindings(&self) -> &BindingSet {
        self.registry.bindings()
    }

    pub fn key_state(&self) -> &KeyState {
        self.registry.key_state()
    }

    pub fn monitors(&self) -> &[MonitorInfo] {
        self.topology.monitors()
    }

    pub fn screen_size(&self) -> Option<(i32, i32)> {
        self.screen_size
    }

    /// Stop accepting samples. Keys and buttons still held are not released.
    pub fn shutdown(&mut self) {
        if self.started {
            tracing::info!("keybinder shut down");
        }
        self.started = false;
    }
}

/// Mouse buttons run as HOLD while the hold route is set and as DYNAMIC
/// otherwise, whatever mode they were configured with. A DYNAMIC escalation
/// does not set the route, so the escalated button is released by its own
/// falling edge.
fn mouse_mode_override(state: &KeyState) -> Trigger {
    if state.routes_through_hold() {
        Trigger::Hold
    } else {
        Trigger::Dynamic
    }
}
