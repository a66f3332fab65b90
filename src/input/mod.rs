//! Input-binding service: control paths, action maps and the trait the
//! keybind layer applies overrides through.

pub mod action_map;
pub mod control_path;
pub mod terminal;

pub use action_map::*;
pub use control_path::*;

use crate::error::SettingsError;

/// Control scheme used for keyboard and mouse bindings.
pub const KEYBOARD_MOUSE_SCHEME: &str = "Keyboard&Mouse";
/// Control scheme used for gamepad bindings.
pub const GAMEPAD_SCHEME: &str = "Gamepad";

/// Something that owns named actions with indexed binding slots.
pub trait InputBindings {
    /// Points `binding_index` of `action` at `path` until the override is removed.
    fn apply_binding_override(
        &mut self,
        action: &str,
        binding_index: usize,
        path: &str,
    ) -> Result<(), SettingsError>;

    fn remove_binding_override(
        &mut self,
        action: &str,
        binding_index: usize,
    ) -> Result<(), SettingsError>;

    /// Override path if one is set, else the default path.
    fn effective_path(&self, action: &str, binding_index: usize) -> Option<String>;

    /// Enables or disables input processing for the whole map.
    fn set_map_enabled(&mut self, enabled: bool);

    fn is_map_enabled(&self) -> bool;
}
