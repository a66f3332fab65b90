//! gameconf - settings, keybind overrides and rebind capture for a first-person game
//!
//! The library holds everything that does not need the engine: the settings
//! model and its XML file, the keybind override table, the click-to-rebind
//! state machine, and the field table the options menu binds controls to.
//! Engine capabilities come in through the traits in [`engine`] and
//! [`input::InputBindings`].

pub mod binder;
pub mod build_info;
pub mod constants;
pub mod engine;
pub mod error;
pub mod input;
pub mod panel;
pub mod pool;
pub mod rebind;
pub mod settings;
pub mod store;
pub mod ui;
pub mod utils;
pub mod versioning;
pub mod weighted;

pub use error::SettingsError;
pub use settings::{KeybindOverride, KeybindSettings, SettingsContainer};
pub use store::SettingsStore;
