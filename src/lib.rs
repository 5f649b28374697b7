pub mod bindings;
pub mod engine;
pub mod error;
pub mod gate;
pub mod input;
pub mod keys;
pub mod logging;
pub mod monitors;
pub mod settings;
pub mod shapes;
pub mod trigger;

pub use engine::Keybinder;
pub use error::ConfigurationError;
