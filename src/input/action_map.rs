//! In-memory action map used by the terminal front-end and by tests.

use super::{InputBindings, GAMEPAD_SCHEME, KEYBOARD_MOUSE_SCHEME};
use crate::error::SettingsError;

/// Actions players may remap from the keybind panel.
pub const REBINDABLE_ACTIONS: &[&str] = &[
    "Move",
    "Jump",
    "Sprint",
    "Crouch",
    "Interact",
    "Primary Action",
    "Secondary Action",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBinding {
    pub path: String,
    pub override_path: Option<String>,
    /// Control schemes this binding belongs to, `;`-separated
    pub groups: String,
    /// Part name (Up, Down, ...) when the binding is one piece of a composite
    pub composite_part: Option<String>,
}

impl InputBinding {
    pub fn new(path: &str, groups: &str) -> Self {
        Self {
            path: path.to_string(),
            override_path: None,
            groups: groups.to_string(),
            composite_part: None,
        }
    }

    pub fn part(path: &str, groups: &str, part: &str) -> Self {
        Self {
            composite_part: Some(part.to_string()),
            ..Self::new(path, groups)
        }
    }

    pub fn effective_path(&self) -> &str {
        self.override_path.as_deref().unwrap_or(&self.path)
    }

    pub fn is_part_of_composite(&self) -> bool {
        self.composite_part.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAction {
    pub name: String,
    pub bindings: Vec<InputBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMap {
    pub name: String,
    actions: Vec<InputAction>,
    enabled: bool,
}

impl ActionMap {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            actions: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_action(mut self, name: &str, bindings: Vec<InputBinding>) -> Self {
        self.actions.push(InputAction {
            name: name.to_string(),
            bindings,
        });
        self
    }

    /// Default first-person controls for keyboard/mouse and gamepad.
    pub fn first_person_defaults() -> Self {
        let km = KEYBOARD_MOUSE_SCHEME;
        let pad = GAMEPAD_SCHEME;
        Self::new("Player")
            .with_action(
                "Move",
                vec![
                    InputBinding::part("<Keyboard>/w", km, "Up"),
                    InputBinding::part("<Keyboard>/s", km, "Down"),
                    InputBinding::part("<Keyboard>/a", km, "Left"),
                    InputBinding::part("<Keyboard>/d", km, "Right"),
                    InputBinding::new("<Gamepad>/leftStick", pad),
                ],
            )
            .with_action(
                "Look",
                vec![
                    InputBinding::new("<Mouse>/delta", km),
                    InputBinding::new("<Gamepad>/rightStick", pad),
                ],
            )
            .with_action(
                "Jump",
                vec![
                    InputBinding::new("<Keyboard>/space", km),
                    InputBinding::new("<Gamepad>/buttonSouth", pad),
                ],
            )
            .with_action(
                "Sprint",
                vec![
                    InputBinding::new("<Keyboard>/leftShift", km),
                    InputBinding::new("<Gamepad>/leftStickPress", pad),
                ],
            )
            .with_action(
                "Crouch",
                vec![
                    InputBinding::new("<Keyboard>/leftCtrl", km),
                    InputBinding::new("<Gamepad>/buttonEast", pad),
                ],
            )
            .with_action(
                "Interact",
                vec![
                    InputBinding::new("<Keyboard>/e", km),
                    InputBinding::new("<Gamepad>/buttonWest", pad),
                ],
            )
            .with_action(
                "Primary Action",
                vec![
                    InputBinding::new("<Mouse>/leftButton", km),
                    InputBinding::new("<Gamepad>/rightTrigger", pad),
                ],
            )
            .with_action(
                "Secondary Action",
                vec![
                    InputBinding::new("<Mouse>/rightButton", km),
                    InputBinding::new("<Gamepad>/leftTrigger", pad),
                ],
            )
            .with_action(
                "Pause",
                vec![
                    InputBinding::new("<Keyboard>/escape", km),
                    InputBinding::new("<Gamepad>/start", pad),
                ],
            )
    }

    pub fn actions(&self) -> &[InputAction] {
        &self.actions
    }

    pub fn find_action(&self, name: &str) -> Option<&InputAction> {
        self.actions.iter().find(|a| a.name == name)
    }

    pub fn binding(&self, action: &str, binding_index: usize) -> Option<&InputBinding> {
        self.find_action(action)?.bindings.get(binding_index)
    }

    fn binding_mut(
        &mut self,
        action: &str,
        binding_index: usize,
    ) -> Result<&mut InputBinding, SettingsError> {
        let found = self
            .actions
            .iter_mut()
            .find(|a| a.name == action)
            .ok_or_else(|| SettingsError::UnknownAction(action.to_string()))?;
        found
            .bindings
            .get_mut(binding_index)
            .ok_or_else(|| SettingsError::UnknownBinding {
                action: action.to_string(),
                index: binding_index,
            })
    }

    /// Drops every override, restoring default paths.
    pub fn remove_all_overrides(&mut self) {
        for binding in self.actions.iter_mut().flat_map(|a| a.bindings.iter_mut()) {
            binding.override_path = None;
        }
    }
}

impl InputBindings for ActionMap {
    fn apply_binding_override(
        &mut self,
        action: &str,
        binding_index: usize,
        path: &str,
    ) -> Result<(), SettingsError> {
        self.binding_mut(action, binding_index)?.override_path = Some(path.to_string());
        Ok(())
    }

    fn remove_binding_override(
        &mut self,
        action: &str,
        binding_index: usize,
    ) -> Result<(), SettingsError> {
        self.binding_mut(action, binding_index)?.override_path = None;
        Ok(())
    }

    fn effective_path(&self, action: &str, binding_index: usize) -> Option<String> {
        self.binding(action, binding_index)
            .map(|b| b.effective_path().to_string())
    }

    fn set_map_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_map_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_rebindable_actions() {
        let map = ActionMap::first_person_defaults();
        for name in REBINDABLE_ACTIONS {
            assert!(map.find_action(name).is_some(), "missing action {}", name);
        }
        assert!(map.is_map_enabled());
    }

    #[test]
    fn test_override_and_remove() {
        let mut map = ActionMap::first_person_defaults();
        map.apply_binding_override("Jump", 0, "<Keyboard>/j").unwrap();
        assert_eq!(map.effective_path("Jump", 0).as_deref(), Some("<Keyboard>/j"));
        assert_eq!(map.binding("Jump", 0).unwrap().path, "<Keyboard>/space");

        map.remove_binding_override("Jump", 0).unwrap();
        assert_eq!(map.effective_path("Jump", 0).as_deref(), Some("<Keyboard>/space"));
    }

    #[test]
    fn test_override_errors() {
        let mut map = ActionMap::first_person_defaults();
        assert!(matches!(
            map.apply_binding_override("Fly", 0, "<Keyboard>/f"),
            Err(SettingsError::UnknownAction(_))
        ));
        assert!(matches!(
            map.apply_binding_override("Jump", 7, "<Keyboard>/f"),
            Err(SettingsError::UnknownBinding { index: 7, .. })
        ));
    }

    #[test]
    fn test_remove_all_overrides() {
        let mut map = ActionMap::first_person_defaults();
        map.apply_binding_override("Move", 0, "<Keyboard>/i").unwrap();
        map.apply_binding_override("Crouch", 1, "<Gamepad>/buttonNorth").unwrap();
        map.remove_all_overrides();
        assert_eq!(map, ActionMap::first_person_defaults());
    }
}
