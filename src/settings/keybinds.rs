//! Keybind override table.
//!
//! Overrides are keyed by action name alone: adding an override for an action
//! replaces whatever override that action already had, whichever binding slot
//! it targeted. Composite actions (a WASD "Move" for instance) can therefore
//! only keep one remapped part at a time. A replacement that changes the slot
//! is logged so the collapse is visible.

use crate::input::InputBindings;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// One user remap of an action's binding slot to a control path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeybindOverride {
    pub action_name: String,
    pub binding_index: usize,
    pub binding_path: String,
}

impl KeybindOverride {
    pub fn new(
        action_name: impl Into<String>,
        binding_index: usize,
        binding_path: impl Into<String>,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            binding_index,
            binding_path: binding_path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeybindSettings {
    /// Overrides in the order they were made. Change through [`KeybindSettings::add_override`].
    #[serde(rename = "keybindOverride", default)]
    overrides: Vec<KeybindOverride>,
}

impl KeybindSettings {
    pub fn overrides(&self) -> &[KeybindOverride] {
        &self.overrides
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn find(&self, action_name: &str) -> Option<&KeybindOverride> {
        self.overrides.iter().find(|o| o.action_name == action_name)
    }

    /// Replaces every override for `action_name`, then appends the new one.
    pub fn add_override(
        &mut self,
        action_name: &str,
        binding_index: usize,
        binding_path: &str,
    ) -> &KeybindOverride {
        for replaced in self.take_action(action_name) {
            if replaced.binding_index != binding_index {
                warn!(
                    action = action_name,
                    replaced_index = replaced.binding_index,
                    new_index = binding_index,
                    "override for another binding slot of this action was dropped"
                );
            }
        }

        self.overrides
            .push(KeybindOverride::new(action_name, binding_index, binding_path));
        &self.overrides[self.overrides.len() - 1]
    }

    /// Removes the override for `action_name`, returning it if there was one.
    pub fn remove_override(&mut self, action_name: &str) -> Option<KeybindOverride> {
        self.take_action(action_name).pop()
    }

    /// Keeps only the last override of each action, as a file edited by hand
    /// may list one action more than once. Returns how many were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.overrides.len();
        let mut seen = HashSet::new();
        let mut kept: Vec<KeybindOverride> = Vec::with_capacity(before);
        for keybind in self.overrides.drain(..).rev() {
            if seen.insert(keybind.action_name.clone()) {
                kept.push(keybind);
            }
        }
        kept.reverse();
        self.overrides = kept;
        before - self.overrides.len()
    }

    /// Removes every override for `action_name`, in table order.
    fn take_action(&mut self, action_name: &str) -> Vec<KeybindOverride> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.overrides)
            .into_iter()
            .partition(|o| o.action_name == action_name);
        self.overrides = kept;
        taken
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    /// Applies every stored override to `target` in table order.
    ///
    /// Returns how many overrides were applied. Overrides the target rejects
    /// (unknown action, missing slot) are logged and skipped.
    pub fn load_overrides<B: InputBindings + ?Sized>(&self, target: &mut B) -> usize {
        let mut applied = 0;
        for keybind in &self.overrides {
            match target.apply_binding_override(
                &keybind.action_name,
                keybind.binding_index,
                &keybind.binding_path,
            ) {
                Ok(()) => applied += 1,
                Err(e) => warn!("Skipping stored keybind override: {}", e),
            }
        }
        debug!(applied, stored = self.overrides.len(), "Loaded keybind overrides");
        applied
    }
}
