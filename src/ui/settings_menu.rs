//! Options menu state and input handling.
//!
//! Rendering lives in the parent module; everything here works on plain key
//! and mouse events so the menu can be driven without a terminal.

use crate::binder::{
    fields_in, ControlKind, FieldBinding, SettingValue, SettingsCategory, ValueKind,
};
use crate::engine::EngineServices;
use crate::input::terminal::{key_control_path, mouse_control_path};
use crate::input::{
    ActionMap, InputBindings, GAMEPAD_SCHEME, KEYBOARD_MOUSE_SCHEME, REBINDABLE_ACTIONS,
};
use crate::panel::KeybindPanel;
use crate::rebind::RebindController;
use crate::settings::SettingsContainer;
use crate::store::{ObserverId, SettingsStore};
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Order in which a field picks the control it is shown with.
const CONTROL_PRIORITY: [ControlKind; 4] = [
    ControlKind::Toggle,
    ControlKind::Dropdown,
    ControlKind::Slider,
    ControlKind::TextField,
];

pub struct SettingsMenu {
    pub tab: usize,
    pub selected: usize,
    /// Last status line shown under the list
    pub message: Option<String>,
    fields: Vec<(SettingsCategory, Vec<FieldBinding>)>,
    panel: KeybindPanel,
    rebind: RebindController,
    /// Set by the store observer when overrides change
    labels_stale: Rc<Cell<bool>>,
    observer: ObserverId,
    quit: bool,
}

impl SettingsMenu {
    /// Builds the menu and subscribes its keybind labels to `store`.
    pub fn new(map: &ActionMap, store: &mut SettingsStore) -> Self {
        let fields = SettingsCategory::ALL
            .iter()
            .filter(|c| **c != SettingsCategory::Keybinds)
            .map(|&category| (category, bind_category(category)))
            .collect();
        let labels_stale = Rc::new(Cell::new(false));
        let flag = Rc::clone(&labels_stale);
        let observer = store.subscribe(move |_| flag.set(true));
        Self {
            tab: 0,
            selected: 0,
            message: None,
            fields,
            panel: KeybindPanel::populate(map, REBINDABLE_ACTIONS, KEYBOARD_MOUSE_SCHEME),
            rebind: RebindController::new(),
            labels_stale,
            observer,
            quit: false,
        }
    }

    pub fn category(&self) -> SettingsCategory {
        SettingsCategory::ALL[self.tab % SettingsCategory::ALL.len()]
    }

    /// Stops listening for keybind changes.
    pub fn detach(&self, store: &mut SettingsStore) {
        store.unsubscribe(self.observer);
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_capturing(&self) -> bool {
        self.rebind.is_awaiting()
    }

    pub fn panel(&self) -> &KeybindPanel {
        &self.panel
    }

    /// Field bindings shown on the current tab; empty on the keybinds tab.
    pub fn field_bindings(&self) -> &[FieldBinding] {
        let category = self.category();
        self.fields
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, f)| f.as_slice())
            .unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        match self.category() {
            SettingsCategory::Keybinds => self.panel.rows().len(),
            _ => self.field_bindings().len(),
        }
    }

    pub fn next_tab(&mut self, direction: i32) {
        let count = SettingsCategory::ALL.len() as i32;
        self.tab = (self.tab as i32 + direction).rem_euclid(count) as usize;
        self.selected = 0;
    }

    pub fn move_selection(&mut self, direction: i32) {
        let count = self.row_count() as i32;
        if count == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected as i32 + direction).rem_euclid(count) as usize;
    }

    pub fn handle_key<E: EngineServices + ?Sized>(
        &mut self,
        key: KeyEvent,
        now: Instant,
        store: &mut SettingsStore,
        map: &mut ActionMap,
        engine: &mut E,
    ) {
        if self.rebind.is_awaiting() {
            if key.code == KeyCode::Esc {
                self.rebind.cancel(map);
                self.panel.update_displayed_labels(map);
                self.message = Some("Rebind cancelled".to_string());
                return;
            }
            if let Some(path) = key_control_path(&key) {
                if !self.rebind.offer_input(&path, now) {
                    debug!(path = %path, "Ignored input during rebind");
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => self.next_tab(1),
            KeyCode::BackTab => self.next_tab(-1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') => self.adjust(-1, store, engine),
            KeyCode::Right | KeyCode::Char('l') => self.adjust(1, store, engine),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.category() == SettingsCategory::Keybinds {
                    self.begin_rebind(now, map);
                } else {
                    self.adjust(1, store, engine);
                }
            }
            KeyCode::Char('g') if self.category() == SettingsCategory::Keybinds => {
                self.switch_scheme(map)
            }
            KeyCode::Delete | KeyCode::Backspace
                if self.category() == SettingsCategory::Keybinds =>
            {
                self.clear_selected_override(store, map)
            }
            KeyCode::Char('r') if self.category() == SettingsCategory::Keybinds => {
                store.reset_overrides();
                store.save_settings();
                map.remove_all_overrides();
                self.message = Some("Keybinds reset to defaults".to_string());
            }
            _ => {}
        }
    }

    /// Mouse presses only matter while a rebind is waiting for input.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if !self.rebind.is_awaiting() {
            return;
        }
        if let Some(path) = mouse_control_path(&mouse) {
            self.rebind.offer_input(&path, now);
        }
    }

    /// Per-frame update: lets a pending rebind settle and commit, and
    /// refreshes the keybind labels once the store reports a change.
    pub fn tick(&mut self, now: Instant, store: &mut SettingsStore, map: &mut ActionMap) {
        let was_capturing = self.rebind.is_awaiting();
        if was_capturing {
            if let Some(added) = self.rebind.poll(now, store, map) {
                self.message = Some(format!(
                    "{} bound to {}",
                    added.action_name,
                    crate::input::display_name(&added.binding_path)
                ));
            }
        }
        // a timed-out capture changes no override but still drops the placeholder
        let capture_ended = was_capturing && !self.rebind.is_awaiting();
        if self.labels_stale.replace(false) || capture_ended {
            self.panel.update_with_capture(map, &self.rebind);
        }
    }

    fn begin_rebind(&mut self, now: Instant, map: &mut ActionMap) {
        let Some(row) = self.panel.row(self.selected) else {
            return;
        };
        let request = row.rebind_request();
        self.rebind.start_rebind(request, map, now);
        self.panel.update_with_capture(map, &self.rebind);
        self.message = Some("Press a key or mouse button (Esc cancels)".to_string());
    }

    fn switch_scheme(&mut self, map: &ActionMap) {
        let next = if self.panel.scheme() == KEYBOARD_MOUSE_SCHEME {
            GAMEPAD_SCHEME
        } else {
            KEYBOARD_MOUSE_SCHEME
        };
        self.panel = KeybindPanel::populate(map, REBINDABLE_ACTIONS, next);
        self.selected = 0;
    }

    fn clear_selected_override(&mut self, store: &mut SettingsStore, map: &mut ActionMap) {
        let Some(row) = self.panel.row(self.selected) else {
            return;
        };
        let action = row.action.clone();
        let Some(removed) = store.remove_override(&action) else {
            self.message = Some(format!("{} has no custom binding", action));
            return;
        };
        store.save_settings();
        if let Err(e) = map.remove_binding_override(&action, removed.binding_index) {
            warn!("Could not restore default binding: {}", e);
        }
        self.message = Some(format!("{} restored to default", action));
    }

    fn adjust<E: EngineServices + ?Sized>(
        &mut self,
        direction: i32,
        store: &mut SettingsStore,
        engine: &mut E,
    ) {
        let Some(binding) = self.field_bindings().get(self.selected).copied() else {
            return;
        };
        let value = {
            let settings = store.get_settings();
            match binding.control {
                ControlKind::Dropdown => {
                    let options = binding.dropdown_options(settings, engine);
                    if options.is_empty() {
                        return;
                    }
                    let current = binding.selected_option(settings, &options).unwrap_or(0) as i32;
                    let next = (current + direction).rem_euclid(options.len() as i32) as usize;
                    binding.dropdown_edit(next, &options)
                }
                _ => binding.stepped_value(settings, direction),
            }
        };
        let Some(value) = value else {
            return;
        };

        match binding.apply_edit(store, value, engine) {
            Ok(()) => {
                store.save_settings();
                info!(field = binding.name(), "Setting changed");
                self.message = None;
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }
}

/// Text a field's current value is shown as.
pub fn value_text(binding: &FieldBinding, settings: &SettingsContainer) -> String {
    match binding.current_value(settings) {
        SettingValue::Bool(true) => "On".to_string(),
        SettingValue::Bool(false) => "Off".to_string(),
        SettingValue::Float(f) => format!("{:.2}", f),
        SettingValue::Int(i) => i.to_string(),
        SettingValue::Choice(i) => match binding.field.value_kind {
            ValueKind::Enum(names) => names.get(i).copied().unwrap_or("?").to_string(),
            _ => i.to_string(),
        },
        SettingValue::Text(t) => t,
    }
}

/// Binds every field of `category`, in table order, to the first control in
/// [`CONTROL_PRIORITY`] that can drive it.
fn bind_category(category: SettingsCategory) -> Vec<FieldBinding> {
    fields_in(category)
        .enumerate()
        .filter_map(|(index, field)| {
            let control = CONTROL_PRIORITY
                .into_iter()
                .find(|c| c.accepts(field.value_kind))
                .unwrap_or(ControlKind::TextField);
            FieldBinding::try_bind(category, index, control)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SETTINGS_FILE_NAME;
    use crate::engine::HeadlessEngine;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use std::time::Duration;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: SettingsStore,
        map: ActionMap,
        engine: HeadlessEngine,
        menu: SettingsMenu,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME));
        let map = ActionMap::first_person_defaults();
        let menu = SettingsMenu::new(&map, &mut store);
        Fixture {
            _dir: dir,
            store,
            map,
            engine: HeadlessEngine::with_common_modes(),
            menu,
        }
    }

    fn press(f: &mut Fixture, code: KeyCode, now: Instant) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        f.menu
            .handle_key(key, now, &mut f.store, &mut f.map, &mut f.engine);
    }

    fn select_field(f: &mut Fixture, name: &str) {
        f.menu.selected = f
            .menu
            .field_bindings()
            .iter()
            .position(|b| b.name() == name)
            .unwrap();
    }

    #[test]
    fn test_each_field_bound_once() {
        let f = fixture();
        let names: Vec<&str> = f.menu.field_bindings().iter().map(|b| b.name()).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
        assert!(names.contains(&"vSync"));
        assert!(names.contains(&"refreshRate"));
    }

    #[test]
    fn test_tabs_wrap() {
        let mut f = fixture();
        assert_eq!(f.menu.category(), SettingsCategory::Video);
        press(&mut f, KeyCode::BackTab, Instant::now());
        assert_eq!(f.menu.category(), SettingsCategory::Keybinds);
        press(&mut f, KeyCode::Tab, Instant::now());
        assert_eq!(f.menu.category(), SettingsCategory::Video);
    }

    #[test]
    fn test_toggle_edit_saves() {
        let mut f = fixture();
        f.menu.next_tab(2);
        assert_eq!(f.menu.category(), SettingsCategory::Gameplay);
        select_field(&mut f, "invertY");

        press(&mut f, KeyCode::Enter, Instant::now());
        assert!(f.store.get_settings().gameplay.invert_y);
        assert!(f.store.path().exists());
    }

    #[test]
    fn test_dropdown_cycles_enum() {
        let mut f = fixture();
        select_field(&mut f, "qualityLevel");
        let before = f.store.get_settings().video.quality_level;

        press(&mut f, KeyCode::Right, Instant::now());
        assert_ne!(f.store.get_settings().video.quality_level, before);
        assert!(f.engine.quality.is_some());
    }

    #[test]
    fn test_slider_step_pushes_mixer() {
        let mut f = fixture();
        f.menu.next_tab(1);
        select_field(&mut f, "masterVolume");

        press(&mut f, KeyCode::Left, Instant::now());
        assert!(!f.engine.mixer.is_empty());
    }

    #[test]
    fn test_keyboard_rebind_through_menu() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        let jump = f
            .menu
            .panel()
            .rows()
            .iter()
            .position(|r| r.action == "Jump")
            .unwrap();
        f.menu.selected = jump;

        let start = Instant::now();
        press(&mut f, KeyCode::Enter, start);
        assert!(f.menu.is_capturing());
        assert!(!f.map.is_map_enabled());
        assert_eq!(f.menu.panel().rows()[jump].button_text, "...");

        press(&mut f, KeyCode::Char('f'), start);
        f.menu
            .tick(start + Duration::from_millis(150), &mut f.store, &mut f.map);

        assert!(!f.menu.is_capturing());
        assert!(f.map.is_map_enabled());
        assert_eq!(f.menu.panel().rows()[jump].button_text, "F");
        assert_eq!(
            f.store.get_settings().keybinds.find("Jump").unwrap().binding_path,
            "<Keyboard>/f"
        );
    }

    #[test]
    fn test_escape_cancels_capture() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        let now = Instant::now();
        press(&mut f, KeyCode::Enter, now);
        press(&mut f, KeyCode::Esc, now);

        assert!(!f.menu.is_capturing());
        assert!(!f.menu.should_quit());
        assert!(f.map.is_map_enabled());
        assert!(f.store.get_settings().keybinds.is_empty());
    }

    #[test]
    fn test_mouse_press_captured() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        let now = Instant::now();
        press(&mut f, KeyCode::Enter, now);
        f.menu.handle_mouse(
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Right),
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            },
            now,
        );
        f.menu
            .tick(now + Duration::from_millis(150), &mut f.store, &mut f.map);
        assert_eq!(f.store.get_settings().keybinds.len(), 1);
    }

    #[test]
    fn test_clear_and_reset_overrides() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        f.store.add_override("Move", 0, "<Keyboard>/i");
        f.map
            .apply_binding_override("Move", 0, "<Keyboard>/i")
            .unwrap();

        f.menu.selected = 0;
        press(&mut f, KeyCode::Delete, Instant::now());
        assert!(f.store.get_settings().keybinds.is_empty());
        assert_eq!(
            f.map.effective_path("Move", 0).as_deref(),
            Some("<Keyboard>/w")
        );

        f.store.add_override("Jump", 0, "<Keyboard>/j");
        press(&mut f, KeyCode::Char('r'), Instant::now());
        assert!(f.store.get_settings().keybinds.is_empty());
    }

    #[test]
    fn test_labels_follow_store_changes() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        let jump = f
            .menu
            .panel()
            .rows()
            .iter()
            .position(|r| r.action == "Jump")
            .unwrap();

        // a change made outside the menu reaches it through the store observer
        f.map
            .apply_binding_override("Jump", 0, "<Keyboard>/j")
            .unwrap();
        f.store.add_override("Jump", 0, "<Keyboard>/j");
        assert_eq!(f.menu.panel().rows()[jump].button_text, "Space");
        f.menu.tick(Instant::now(), &mut f.store, &mut f.map);
        assert_eq!(f.menu.panel().rows()[jump].button_text, "J");

        f.menu.selected = jump;
        press(&mut f, KeyCode::Delete, Instant::now());
        f.menu.tick(Instant::now(), &mut f.store, &mut f.map);
        assert_eq!(f.menu.panel().rows()[jump].button_text, "Space");

        f.menu.detach(&mut f.store);
        f.map
            .apply_binding_override("Jump", 0, "<Keyboard>/k")
            .unwrap();
        f.store.add_override("Jump", 0, "<Keyboard>/k");
        f.menu.tick(Instant::now(), &mut f.store, &mut f.map);
        assert_eq!(f.menu.panel().rows()[jump].button_text, "Space");
    }

    #[test]
    fn test_timed_out_capture_clears_placeholder() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        f.menu.rebind = RebindController::new().with_timeout(Duration::from_secs(1));
        let start = Instant::now();
        press(&mut f, KeyCode::Enter, start);
        assert_eq!(f.menu.panel().rows()[0].button_text, "...");

        f.menu
            .tick(start + Duration::from_secs(2), &mut f.store, &mut f.map);
        assert!(!f.menu.is_capturing());
        assert_eq!(f.menu.panel().rows()[0].button_text, "W");
    }

    #[test]
    fn test_scheme_switch_lists_gamepad_rows() {
        let mut f = fixture();
        f.menu.next_tab(-1);
        press(&mut f, KeyCode::Char('g'), Instant::now());
        assert_eq!(f.menu.panel().scheme(), GAMEPAD_SCHEME);
        assert!(f
            .menu
            .panel()
            .rows()
            .iter()
            .all(|r| r.groups.contains(GAMEPAD_SCHEME)));
    }

    #[test]
    fn test_value_text() {
        let mut settings = SettingsContainer::default();
        settings.gameplay.toggle_crouch = true;
        let toggle = FieldBinding::bind(SettingsCategory::Gameplay, 2, ControlKind::Toggle).unwrap();
        assert_eq!(value_text(&toggle, &settings), "On");
    }
}
