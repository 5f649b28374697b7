use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Raw binding entries keyed by gesture name.
///
/// Each value is expected to be `[device, action, threshold, mode]`. Entries
/// stay as raw JSON until the registry loads them so that a malformed entry
/// surfaces as a configuration error on the tick that sees it.
pub type RawBindings = BTreeMap<String, Value>;

/// Live configuration shared between the host and the engine.
pub type SharedSettings = Arc<Mutex<Settings>>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub mouse_bindings: RawBindings,
    #[serde(default)]
    pub keyboard_bindings: RawBindings,
    /// How long a DYNAMIC mouse gesture must stay above its threshold before
    /// the click escalates into a held button.
    #[serde(default = "default_hold_trigger_ms")]
    pub hold_trigger_ms: u64,
    /// Initial state of the activation gate.
    #[serde(default = "default_auto_play")]
    pub auto_play: bool,
    /// Evaluate mouse bindings with their configured trigger mode instead of
    /// the HOLD/DYNAMIC override.
    #[serde(default)]
    pub honor_mouse_modes: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file. Logs go to stdout only when absent.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Minimum delay between ticks when replaying samples from the host.
    #[serde(default)]
    pub tick_interval_ms: u64,
}

fn default_hold_trigger_ms() -> u64 {
    500
}

fn default_auto_play() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mouse_bindings: RawBindings::new(),
            keyboard_bindings: RawBindings::new(),
            hold_trigger_ms: default_hold_trigger_ms(),
            auto_play: default_auto_play(),
            honor_mouse_modes: false,
            debug_logging: false,
            log_file: None,
            tick_interval_ms: 0,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Mouse and keyboard bindings merged into one map.
    ///
    /// Keyboard entries are inserted last, so a gesture bound in both maps
    /// resolves to its keyboard binding.
    pub fn merged_bindings(&self) -> RawBindings {
        let mut merged = self.mouse_bindings.clone();
        for (gesture, binding) in &self.keyboard_bindings {
            merged.insert(gesture.clone(), binding.clone());
        }
        merged
    }

    pub fn into_shared(self) -> SharedSettings {
        Arc::new(Mutex::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keyboard_binding_wins_on_duplicate_gesture() {
        let mut settings = Settings::default();
        settings
            .mouse_bindings
            .insert("jawOpen".into(), json!(["mouse", "left", 0.5, "dynamic"]));
        settings
            .keyboard_bindings
            .insert("jawOpen".into(), json!(["keyboard", "space", 0.4, "hold"]));

        let merged = settings.merged_bindings();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["jawOpen"], json!(["keyboard", "space", 0.4, "hold"]));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.hold_trigger_ms, 500);
        assert!(settings.auto_play);
    }
}
