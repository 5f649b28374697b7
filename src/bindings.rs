use crate::error::ConfigurationError;
use crate::input::MouseButton;
use crate::keys::virtual_key_from_string;
use crate::settings::{RawBindings, Settings};
use crate::trigger::{KeyState, Trigger};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    Mouse,
    Keyboard,
}

impl Device {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mouse" => Some(Device::Mouse),
            "keyboard" => Some(Device::Keyboard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Mouse => "mouse",
            Device::Keyboard => "keyboard",
        }
    }
}

/// What a binding does once its trigger fires.
///
/// `pause`, `reset` and `cycle` are reserved verbs on the mouse device only;
/// on the keyboard they are ordinary key symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    /// Flip the activation gate.
    Pause,
    /// Center the pointer on its current monitor.
    Reset,
    /// Move the pointer to the center of the next monitor.
    Cycle,
    Button(MouseButton),
    Key(String),
}

/// Identity of a binding's edge state: device plus action name.
///
/// Two gestures bound to the same device action share one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingId {
    pub device: Device,
    pub action: String,
}

impl BindingId {
    pub fn new(device: Device, action: impl Into<String>) -> Self {
        Self {
            device,
            action: action.into(),
        }
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.device.as_str(), self.action)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub gesture: String,
    pub device: Device,
    /// Action name exactly as configured.
    pub action_name: String,
    pub action: BindingAction,
    pub threshold: f32,
    pub mode: Trigger,
}

impl Binding {
    /// Slot key for this binding. Mouse buttons are keyed by their canonical
    /// name so aliases of one button share a slot.
    pub fn id(&self) -> BindingId {
        match self.action {
            BindingAction::Button(button) => BindingId::new(self.device, button.as_str()),
            _ => BindingId::new(self.device, self.action_name.clone()),
        }
    }

    /// Parse one `[device, action, threshold, mode]` entry.
    pub fn parse(gesture: &str, raw: &Value) -> Result<Self, ConfigurationError> {
        let malformed = |reason: &str| ConfigurationError::MalformedBinding {
            gesture: gesture.to_string(),
            reason: reason.to_string(),
        };

        let fields = raw
            .as_array()
            .ok_or_else(|| malformed("expected [device, action, threshold, mode]"))?;
        if fields.len() != 4 {
            return Err(malformed(&format!("expected 4 fields, found {}", fields.len())));
        }

        let device_name = fields[0]
            .as_str()
            .ok_or_else(|| malformed("device must be a string"))?;
        let action_name = fields[1]
            .as_str()
            .ok_or_else(|| malformed("action must be a string"))?;
        let threshold = fields[2]
            .as_f64()
            .ok_or_else(|| malformed("threshold must be a number"))?;
        let mode_name = fields[3]
            .as_str()
            .ok_or_else(|| malformed("mode must be a string"))?;

        let device = Device::parse(device_name).ok_or_else(|| ConfigurationError::UnknownDevice {
            gesture: gesture.to_string(),
            device: device_name.to_string(),
        })?;
        let mode: Trigger = mode_name
            .parse()
            .map_err(|_| ConfigurationError::UnknownMode {
                gesture: gesture.to_string(),
                mode: mode_name.to_string(),
            })?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange {
                gesture: gesture.to_string(),
                threshold,
            });
        }

        let action = match device {
            Device::Mouse => match action_name {
                "pause" => BindingAction::Pause,
                "reset" => BindingAction::Reset,
                "cycle" => BindingAction::Cycle,
                _ => MouseButton::parse(action_name)
                    .map(BindingAction::Button)
                    .ok_or_else(|| ConfigurationError::UnknownMouseButton {
                        gesture: gesture.to_string(),
                        button: action_name.to_string(),
                    })?,
            },
            Device::Keyboard => {
                if virtual_key_from_string(action_name).is_none() {
                    return Err(ConfigurationError::UnknownKey {
                        gesture: gesture.to_string(),
                        key: action_name.to_string(),
                    });
                }
                BindingAction::Key(action_name.to_string())
            }
        };

        Ok(Self {
            gesture: gesture.to_string(),
            device,
            action_name: action_name.to_string(),
            action,
            threshold: threshold as f32,
            mode,
        })
    }
}

/// Parsed bindings, ordered by gesture name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingSet {
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn parse(raw: &RawBindings) -> Result<Self, ConfigurationError> {
        let bindings = raw
            .iter()
            .map(|(gesture, entry)| Binding::parse(gesture, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bindings })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.bindings.iter()
    }

    pub fn get(&self, gesture: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.gesture == gesture)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Current bindings plus the edge state that belongs to them.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    snapshot: Option<RawBindings>,
    rejection: Option<ConfigurationError>,
    bindings: BindingSet,
    state: KeyState,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload when the merged mouse and keyboard bindings differ from the
    /// last snapshot.
    ///
    /// A reload clears every slot, the hold latch and all pending releases
    /// without emitting any input; buttons or keys that were down stay down.
    /// On error the previous bindings and state are kept, the rejected map
    /// becomes the snapshot and the same error is returned until the
    /// configuration changes again.
    pub fn reload_if_changed(&mut self, settings: &Settings) -> Result<bool, ConfigurationError> {
        let merged = settings.merged_bindings();
        if self.snapshot.as_ref() == Some(&merged) {
            return match &self.rejection {
                Some(err) => Err(err.clone()),
                None => Ok(false),
            };
        }

        let parsed = BindingSet::parse(&merged);
        self.snapshot = Some(merged);
        match parsed {
            Ok(bindings) => {
                self.state = KeyState::for_bindings(&bindings);
                tracing::info!(count = bindings.len(), "loaded bindings");
                self.bindings = bindings;
                self.rejection = None;
                Ok(true)
            }
            Err(err) => {
                self.rejection = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn lookup(&self, gesture: &str) -> Option<&Binding> {
        self.bindings.get(gesture)
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn key_state(&self) -> &KeyState {
        &self.state
    }

    /// Bindings and their mutable state, borrowed together for a tick.
    pub fn parts_mut(&mut self) -> (&BindingSet, &mut KeyState) {
        (&self.bindings, &mut self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_reserved_mouse_verbs_and_keys() {
        let pause = Binding::parse("mouthPucker", &json!(["mouse", "pause", 0.6, "single"])).unwrap();
        assert_eq!(pause.action, BindingAction::Pause);

        let key = Binding::parse("jawOpen", &json!(["keyboard", "pause", 0.4, "HOLD"])).unwrap();
        assert_eq!(key.action, BindingAction::Key("pause".into()));
        assert_eq!(key.mode, Trigger::Hold);
        assert_eq!(key.id().to_string(), "keyboard_pause");

        let button = Binding::parse("eyeBlinkLeft", &json!(["mouse", "left", 0.5, "Dynamic"])).unwrap();
        assert_eq!(button.action, BindingAction::Button(MouseButton::Left));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let err = Binding::parse("jawOpen", &json!(["mouse", "left", 0.5])).unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedBinding { .. }));

        let err = Binding::parse("jawOpen", &json!("mouse left")).unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedBinding { .. }));

        let err = Binding::parse("jawOpen", &json!(["mouse", "left", "high", "hold"])).unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedBinding { .. }));
    }

    #[test]
    fn unknown_values_name_the_offending_field() {
        assert_eq!(
            Binding::parse("jawOpen", &json!(["pen", "left", 0.5, "hold"])).unwrap_err(),
            ConfigurationError::UnknownDevice {
                gesture: "jawOpen".into(),
                device: "pen".into()
            }
        );
        assert_eq!(
            Binding::parse("jawOpen", &json!(["mouse", "left", 0.5, "burst"])).unwrap_err(),
            ConfigurationError::UnknownMode {
                gesture: "jawOpen".into(),
                mode: "burst".into()
            }
        );
        assert!(matches!(
            Binding::parse("jawOpen", &json!(["mouse", "x9", 0.5, "hold"])).unwrap_err(),
            ConfigurationError::UnknownMouseButton { .. }
        ));
        assert!(matches!(
            Binding::parse("jawOpen", &json!(["keyboard", "hyper", 0.5, "hold"])).unwrap_err(),
            ConfigurationError::UnknownKey { .. }
        ));
        assert!(matches!(
            Binding::parse("jawOpen", &json!(["keyboard", "w", 1.5, "hold"])).unwrap_err(),
            ConfigurationError::ThresholdOutOfRange { .. }
        ));
    }

    #[test]
    fn registry_reloads_only_on_drift() {
        let mut settings = Settings::default();
        settings
            .keyboard_bindings
            .insert("jawOpen".into(), json!(["keyboard", "space", 0.4, "hold"]));

        let mut registry = BindingRegistry::new();
        assert_eq!(registry.reload_if_changed(&settings), Ok(true));
        assert_eq!(registry.reload_if_changed(&settings), Ok(false));
        assert!(registry.lookup("jawOpen").is_some());
        assert!(registry.lookup("cheekPuff").is_none());

        settings
            .keyboard_bindings
            .insert("jawOpen".into(), json!(["keyboard", "space", 0.45, "hold"]));
        assert_eq!(registry.reload_if_changed(&settings), Ok(true));
        assert_eq!(registry.lookup("jawOpen").map(|b| b.threshold), Some(0.45));
    }

    #[test]
    fn failed_reload_keeps_previous_bindings() {
        let mut settings = Settings::default();
        settings
            .mouse_bindings
            .insert("jawOpen".into(), json!(["mouse", "left", 0.5, "hold"]));
        let mut registry = BindingRegistry::new();
        registry.reload_if_changed(&settings).unwrap();

        settings
            .mouse_bindings
            .insert("cheekPuff".into(), json!(["mouse", "left", 0.5, "sometimes"]));
        assert!(registry.reload_if_changed(&settings).is_err());
        assert!(registry.reload_if_changed(&settings).is_err());
        assert_eq!(registry.bindings().len(), 1);
        assert!(registry.lookup("jawOpen").is_some());
    }

    #[test]
    fn reverting_a_rejected_map_reloads_and_clears_state() {
        let mut settings = Settings::default();
        settings
            .mouse_bindings
            .insert("jawOpen".into(), json!(["mouse", "left", 0.5, "hold"]));
        let good = settings.clone();
        let mut registry = BindingRegistry::new();
        registry.reload_if_changed(&good).unwrap();

        let id = registry.lookup("jawOpen").map(Binding::id).unwrap();
        registry.parts_mut().1.slot_mut(&id).active = true;

        settings
            .mouse_bindings
            .insert("cheekPuff".into(), json!(["mouse", "left", 0.5, "sometimes"]));
        assert!(registry.reload_if_changed(&settings).is_err());
        assert!(registry.key_state().slot(&id).active);

        assert_eq!(registry.reload_if_changed(&good), Ok(true));
        assert!(registry.key_state().is_clear());
        assert_eq!(registry.reload_if_changed(&good), Ok(false));
    }

    #[test]
    fn mouse_button_aliases_share_a_slot() {
        let left = Binding::parse("jawOpen", &json!(["mouse", "left", 0.5, "hold"])).unwrap();
        let primary = Binding::parse("cheekPuff", &json!(["mouse", "primary", 0.5, "hold"])).unwrap();
        assert_eq!(primary.action_name, "primary");
        assert_eq!(left.id(), primary.id());
        assert_eq!(primary.id().to_string(), "mouse_left");
    }
}
