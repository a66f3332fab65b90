//! Keybind panel: one row per rebindable binding in the active control scheme.

use crate::input::{display_name, in_scheme, ActionMap, InputBindings};
use crate::rebind::{RebindController, RebindRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeybindRow {
    pub action: String,
    pub binding_index: usize,
    pub groups: String,
    /// Composite part name, or the action name for plain bindings
    pub label: String,
    pub button_text: String,
}

impl KeybindRow {
    pub fn rebind_request(&self) -> RebindRequest {
        RebindRequest::new(&self.action, self.binding_index, &self.groups)
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeybindPanel {
    scheme: String,
    rows: Vec<KeybindRow>,
}

impl KeybindPanel {
    /// Builds rows for the `reference` actions of `map` whose bindings belong to `scheme`.
    ///
    /// Actions missing from `map` are skipped.
    pub fn populate(map: &ActionMap, reference: &[&str], scheme: &str) -> Self {
        let mut rows = Vec::new();
        for name in reference {
            let Some(action) = map.find_action(name) else {
                continue;
            };
            for (index, binding) in action.bindings.iter().enumerate() {
                if !in_scheme(&binding.groups, scheme) {
                    continue;
                }
                rows.push(KeybindRow {
                    action: action.name.clone(),
                    binding_index: index,
                    groups: binding.groups.clone(),
                    label: binding
                        .composite_part
                        .clone()
                        .unwrap_or_else(|| action.name.clone()),
                    button_text: display_name(binding.effective_path()),
                });
            }
        }
        Self {
            scheme: scheme.to_string(),
            rows,
        }
    }

    pub fn header(&self) -> String {
        format!("{} Keybinds", self.scheme)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn rows(&self) -> &[KeybindRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&KeybindRow> {
        self.rows.get(index)
    }

    /// Refreshes every button from the bindings' effective paths.
    pub fn update_displayed_labels<B: InputBindings + ?Sized>(&mut self, bindings: &B) {
        for row in &mut self.rows {
            row.button_text = bindings
                .effective_path(&row.action, row.binding_index)
                .map(|p| display_name(&p))
                .unwrap_or_default();
        }
    }

    /// Like [`Self::update_displayed_labels`], but shows the pending
    /// placeholder on the row being captured.
    pub fn update_with_capture<B: InputBindings + ?Sized>(
        &mut self,
        bindings: &B,
        rebind: &RebindController,
    ) {
        for row in &mut self.rows {
            row.button_text = rebind.button_label(&row.action, row.binding_index, bindings);
        }
    }
}
