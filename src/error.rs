use thiserror::Error;

/// A binding definition the engine cannot act on.
///
/// Returned from [`crate::engine::Keybinder::evaluate`]; the tick that
/// produced it fires no actions and leaves the previous binding state intact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("binding for '{gesture}' is malformed: {reason}")]
    MalformedBinding { gesture: String, reason: String },
    #[error("binding for '{gesture}' uses unknown device '{device}'")]
    UnknownDevice { gesture: String, device: String },
    #[error("binding for '{gesture}' uses unknown trigger mode '{mode}'")]
    UnknownMode { gesture: String, mode: String },
    #[error("binding for '{gesture}' uses unknown mouse button '{button}'")]
    UnknownMouseButton { gesture: String, button: String },
    #[error("binding for '{gesture}' uses unknown key '{key}'")]
    UnknownKey { gesture: String, key: String },
    #[error("binding for '{gesture}' has threshold {threshold} outside [0, 1]")]
    ThresholdOutOfRange { gesture: String, threshold: f64 },
    #[error("settings are unavailable: {0}")]
    SettingsUnavailable(String),
}
