//! Integration test: click-to-rebind flow
//!
//! Drives the keybind panel and rebind controller the way the menu does and
//! checks the result lands in the action map, the settings file, and the next
//! session.

use gameconf::constants::SETTINGS_FILE_NAME;
use gameconf::input::{ActionMap, InputBindings, KEYBOARD_MOUSE_SCHEME, REBINDABLE_ACTIONS};
use gameconf::panel::KeybindPanel;
use gameconf::rebind::RebindController;
use gameconf::utils::persistence::read_settings;
use gameconf::SettingsStore;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const SETTLED: Duration = Duration::from_millis(150);

fn row_index(panel: &KeybindPanel, action: &str, label: &str) -> usize {
    panel
        .rows()
        .iter()
        .position(|r| r.action == action && r.label == label)
        .unwrap()
}

#[test]
fn test_rebind_is_applied_saved_and_restored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    let mut store = SettingsStore::new(&path);
    let mut map = ActionMap::first_person_defaults();
    let mut panel = KeybindPanel::populate(&map, REBINDABLE_ACTIONS, KEYBOARD_MOUSE_SCHEME);
    let mut rebind = RebindController::new();

    let sprint = row_index(&panel, "Sprint", "Sprint");
    assert_eq!(panel.rows()[sprint].button_text, "Left Shift");

    let start = Instant::now();
    rebind.start_rebind(panel.rows()[sprint].rebind_request(), &mut map, start);
    panel.update_with_capture(&map, &rebind);
    assert_eq!(panel.rows()[sprint].button_text, "...");

    // a gamepad button is not a keyboard&mouse control
    assert!(!rebind.offer_input("<Gamepad>/buttonSouth", start));
    assert!(rebind.offer_input("<Keyboard>/c", start));
    assert!(rebind.poll(start, &mut store, &mut map).is_none());

    let added = rebind
        .poll(start + SETTLED, &mut store, &mut map)
        .unwrap();
    assert_eq!(added.binding_path, "<Keyboard>/c");
    panel.update_displayed_labels(&map);
    assert_eq!(panel.rows()[sprint].button_text, "C");
    assert!(map.is_map_enabled());

    // the commit saved the file
    let on_disk = read_settings(&path).ok().unwrap();
    assert_eq!(on_disk.keybinds.find("Sprint").unwrap().binding_path, "<Keyboard>/c");

    let mut next_session = SettingsStore::new(&path);
    let mut fresh_map = ActionMap::first_person_defaults();
    assert_eq!(next_session.load_overrides(&mut fresh_map), 1);
    assert_eq!(
        fresh_map.effective_path("Sprint", 0).as_deref(),
        Some("<Keyboard>/c")
    );
}

#[test]
fn test_composite_parts_share_one_stored_override() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME));
    let mut map = ActionMap::first_person_defaults();
    let panel = KeybindPanel::populate(&map, REBINDABLE_ACTIONS, KEYBOARD_MOUSE_SCHEME);
    let mut rebind = RebindController::new();
    let now = Instant::now();

    for (label, key) in [("Up", "<Keyboard>/i"), ("Down", "<Keyboard>/k")] {
        let row = &panel.rows()[row_index(&panel, "Move", label)];
        rebind.start_rebind(row.rebind_request(), &mut map, now);
        rebind.offer_input(key, now);
        rebind.poll(now + SETTLED, &mut store, &mut map).unwrap();
    }

    // both parts are live in this session, but only the last one is stored
    assert_eq!(map.effective_path("Move", 0).as_deref(), Some("<Keyboard>/i"));
    assert_eq!(map.effective_path("Move", 1).as_deref(), Some("<Keyboard>/k"));
    let keybinds = &store.get_settings().keybinds;
    assert_eq!(keybinds.len(), 1);
    assert_eq!(keybinds.find("Move").unwrap().binding_index, 1);
}

#[test]
fn test_observer_sees_committed_rebind() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME));
    let mut map = ActionMap::first_person_defaults();
    let mut rebind = RebindController::new();

    let refreshes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&refreshes);
    store.subscribe(move |_| counter.set(counter.get() + 1));

    let panel = KeybindPanel::populate(&map, REBINDABLE_ACTIONS, KEYBOARD_MOUSE_SCHEME);
    let jump = &panel.rows()[row_index(&panel, "Jump", "Jump")];
    let now = Instant::now();
    rebind.start_rebind(jump.rebind_request(), &mut map, now);
    rebind.offer_input("<Mouse>/rightButton", now);
    rebind.poll(now + SETTLED, &mut store, &mut map).unwrap();

    assert_eq!(refreshes.get(), 1);
}

#[test]
fn test_cancelled_rebind_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SETTINGS_FILE_NAME);
    let mut store = SettingsStore::new(&path);
    let mut map = ActionMap::first_person_defaults();
    let before = map.clone();
    let panel = KeybindPanel::populate(&map, REBINDABLE_ACTIONS, KEYBOARD_MOUSE_SCHEME);
    let mut rebind = RebindController::new();

    let now = Instant::now();
    rebind.start_rebind(panel.rows()[0].rebind_request(), &mut map, now);
    rebind.offer_input("<Keyboard>/p", now);
    rebind.cancel(&mut map);

    assert!(rebind.poll(now + SETTLED, &mut store, &mut map).is_none());
    assert_eq!(map, before);
    assert!(!path.exists());
}
