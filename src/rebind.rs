//! Click-to-rebind capture.
//!
//! The controller is driven from the frame loop: `start_rebind` when the
//! player clicks a binding, `offer_input` for every raw input seen while
//! capturing, and `poll` once per frame. A candidate input is committed only
//! after it has stood for the settle delay, so a chord or an incidental
//! second signal replaces it instead of being bound by accident.

use crate::constants::{REBIND_PENDING_LABEL, REBIND_SETTLE_DELAY_MS};
use crate::input::{display_name, group_accepts, is_excluded, InputBindings};
use crate::settings::KeybindOverride;
use crate::store::SettingsStore;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Which binding slot to rebind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebindRequest {
    pub action: String,
    pub binding_index: usize,
    /// The binding's groups; captured controls must come from one of their devices
    pub groups: String,
}

impl RebindRequest {
    pub fn new(action: &str, binding_index: usize, groups: &str) -> Self {
        Self {
            action: action.to_string(),
            binding_index,
            groups: groups.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebindState {
    Idle,
    AwaitingInput {
        request: RebindRequest,
        started_at: Instant,
        /// Best match so far and when it arrived
        candidate: Option<(String, Instant)>,
    },
}

#[derive(Debug, Clone)]
pub struct RebindController {
    state: RebindState,
    settle_delay: Duration,
    timeout: Option<Duration>,
}

impl Default for RebindController {
    fn default() -> Self {
        Self::new()
    }
}

impl RebindController {
    pub fn new() -> Self {
        Self {
            state: RebindState::Idle,
            settle_delay: Duration::from_millis(REBIND_SETTLE_DELAY_MS),
            timeout: None,
        }
    }

    /// Gives up on a capture that saw no usable input within `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn state(&self) -> &RebindState {
        &self.state
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, RebindState::AwaitingInput { .. })
    }

    pub fn pending_request(&self) -> Option<&RebindRequest> {
        match &self.state {
            RebindState::AwaitingInput { request, .. } => Some(request),
            RebindState::Idle => None,
        }
    }

    /// Idle -> AwaitingInput. Disables the action map while capturing.
    ///
    /// A capture already in progress is abandoned in favour of the new one.
    pub fn start_rebind<B: InputBindings + ?Sized>(
        &mut self,
        request: RebindRequest,
        bindings: &mut B,
        now: Instant,
    ) {
        if let Some(previous) = self.pending_request() {
            debug!(
                action = %previous.action,
                index = previous.binding_index,
                "Abandoning unfinished rebind"
            );
        }
        debug!(action = %request.action, index = request.binding_index, "Waiting for input");
        bindings.set_map_enabled(false);
        self.state = RebindState::AwaitingInput {
            request,
            started_at: now,
            candidate: None,
        };
    }

    /// Offers a raw input. Returns whether it became the capture candidate.
    pub fn offer_input(&mut self, path: &str, now: Instant) -> bool {
        let RebindState::AwaitingInput {
            request, candidate, ..
        } = &mut self.state
        else {
            return false;
        };
        if is_excluded(path) || !group_accepts(&request.groups, path) {
            return false;
        }
        *candidate = Some((path.to_string(), now));
        true
    }

    /// Advances the capture. Returns the new override once one is committed.
    ///
    /// Committing applies the override to `bindings`, records it in the store,
    /// saves the settings and re-enables the action map.
    pub fn poll<B: InputBindings + ?Sized>(
        &mut self,
        now: Instant,
        store: &mut SettingsStore,
        bindings: &mut B,
    ) -> Option<KeybindOverride> {
        let RebindState::AwaitingInput {
            request,
            started_at,
            candidate,
        } = &self.state
        else {
            return None;
        };

        let Some((path, matched_at)) = candidate else {
            if let Some(timeout) = self.timeout {
                if now.saturating_duration_since(*started_at) >= timeout {
                    info!(action = %request.action, "Rebind timed out");
                    self.finish(bindings);
                }
            }
            return None;
        };
        if now.saturating_duration_since(*matched_at) < self.settle_delay {
            return None;
        }

        let (action, index, path) = (request.action.clone(), request.binding_index, path.clone());
        if let Err(e) = bindings.apply_binding_override(&action, index, &path) {
            error!("Could not apply captured binding: {}", e);
            self.finish(bindings);
            return None;
        }

        let added = store.add_override(&action, index, &path);
        store.save_settings();
        info!(action = %action, index, path = %path, "Rebound");
        self.finish(bindings);
        Some(added)
    }

    /// Abandons the current capture without changing any binding.
    pub fn cancel<B: InputBindings + ?Sized>(&mut self, bindings: &mut B) {
        if self.is_awaiting() {
            self.finish(bindings);
        }
    }

    /// Button text for a binding slot: a placeholder while it is being captured.
    pub fn button_label<B: InputBindings + ?Sized>(
        &self,
        action: &str,
        binding_index: usize,
        bindings: &B,
    ) -> String {
        if let Some(request) = self.pending_request() {
            if request.action == action && request.binding_index == binding_index {
                return REBIND_PENDING_LABEL.to_string();
            }
        }
        bindings
            .effective_path(action, binding_index)
            .map(|p| display_name(&p))
            .unwrap_or_default()
    }

    fn finish<B: InputBindings + ?Sized>(&mut self, bindings: &mut B) {
        bindings.set_map_enabled(true);
        self.state = RebindState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SETTINGS_FILE_NAME;
    use crate::input::{ActionMap, KEYBOARD_MOUSE_SCHEME};

    fn setup() -> (tempfile::TempDir, SettingsStore, ActionMap) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join(SETTINGS_FILE_NAME));
        (dir, store, ActionMap::first_person_defaults())
    }

    fn jump() -> RebindRequest {
        RebindRequest::new("Jump", 0, KEYBOARD_MOUSE_SCHEME)
    }

    #[test]
    fn test_start_disables_map() {
        let (_dir, _store, mut map) = setup();
        let mut rebind = RebindController::new();
        rebind.start_rebind(jump(), &mut map, Instant::now());

        assert!(rebind.is_awaiting());
        assert!(!map.is_map_enabled());
        assert_eq!(rebind.button_label("Jump", 0, &map), "...");
        assert_eq!(rebind.button_label("Crouch", 0, &map), "Left Ctrl");
    }

    #[test]
    fn test_commit_after_settle_delay() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new();
        let t0 = Instant::now();
        rebind.start_rebind(jump(), &mut map, t0);

        assert!(rebind.offer_input("<Keyboard>/j", t0));
        assert_eq!(rebind.poll(t0 + Duration::from_millis(50), &mut store, &mut map), None);

        let added = rebind
            .poll(t0 + Duration::from_millis(100), &mut store, &mut map)
            .unwrap();
        assert_eq!(added, KeybindOverride::new("Jump", 0, "<Keyboard>/j"));
        assert!(!rebind.is_awaiting());
        assert!(map.is_map_enabled());
        assert_eq!(map.effective_path("Jump", 0).as_deref(), Some("<Keyboard>/j"));
        assert_eq!(rebind.button_label("Jump", 0, &map), "J");

        // persisted as part of the commit
        let mut reopened = SettingsStore::new(store.path());
        assert_eq!(
            reopened.get_settings().keybinds.find("Jump").map(|o| o.binding_path.clone()),
            Some("<Keyboard>/j".to_string())
        );
    }

    #[test]
    fn test_excluded_and_foreign_inputs_are_ignored() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new();
        let t0 = Instant::now();
        rebind.start_rebind(jump(), &mut map, t0);

        assert!(!rebind.offer_input("<Mouse>/position", t0));
        assert!(!rebind.offer_input("<Mouse>/delta", t0));
        assert!(!rebind.offer_input("<Keyboard>/escape", t0));
        assert!(!rebind.offer_input("<Keyboard>/anyKey", t0));
        assert!(!rebind.offer_input("<Gamepad>/buttonNorth", t0));

        assert_eq!(rebind.poll(t0 + Duration::from_secs(5), &mut store, &mut map), None);
        assert!(rebind.is_awaiting());
    }

    #[test]
    fn test_later_input_within_window_replaces_candidate() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new();
        let t0 = Instant::now();
        rebind.start_rebind(jump(), &mut map, t0);

        rebind.offer_input("<Keyboard>/leftShift", t0);
        rebind.offer_input("<Keyboard>/k", t0 + Duration::from_millis(60));
        // the window restarted with the second input
        assert_eq!(rebind.poll(t0 + Duration::from_millis(120), &mut store, &mut map), None);

        let added = rebind
            .poll(t0 + Duration::from_millis(160), &mut store, &mut map)
            .unwrap();
        assert_eq!(added.binding_path, "<Keyboard>/k");
    }

    #[test]
    fn test_idle_controller_ignores_input() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new();
        assert!(!rebind.offer_input("<Keyboard>/j", Instant::now()));
        assert_eq!(rebind.poll(Instant::now(), &mut store, &mut map), None);
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_restart_abandons_previous_capture() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new();
        let t0 = Instant::now();
        rebind.start_rebind(jump(), &mut map, t0);
        rebind.offer_input("<Keyboard>/j", t0);

        rebind.start_rebind(RebindRequest::new("Crouch", 0, KEYBOARD_MOUSE_SCHEME), &mut map, t0);
        assert_eq!(rebind.pending_request().unwrap().action, "Crouch");
        assert_eq!(rebind.poll(t0 + Duration::from_secs(1), &mut store, &mut map), None);

        rebind.offer_input("<Keyboard>/c", t0 + Duration::from_secs(1));
        let added = rebind
            .poll(t0 + Duration::from_secs(2), &mut store, &mut map)
            .unwrap();
        assert_eq!(added.action_name, "Crouch");
        assert_eq!(map.effective_path("Jump", 0).as_deref(), Some("<Keyboard>/space"));
    }

    #[test]
    fn test_timeout_returns_to_idle() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new().with_timeout(Duration::from_secs(3));
        let t0 = Instant::now();
        rebind.start_rebind(jump(), &mut map, t0);

        assert_eq!(rebind.poll(t0 + Duration::from_secs(2), &mut store, &mut map), None);
        assert!(rebind.is_awaiting());
        assert_eq!(rebind.poll(t0 + Duration::from_secs(3), &mut store, &mut map), None);
        assert!(!rebind.is_awaiting());
        assert!(map.is_map_enabled());
    }

    #[test]
    fn test_cancel_keeps_bindings() {
        let (_dir, _store, mut map) = setup();
        let mut rebind = RebindController::new();
        rebind.start_rebind(jump(), &mut map, Instant::now());
        rebind.offer_input("<Keyboard>/j", Instant::now());
        rebind.cancel(&mut map);

        assert_eq!(*rebind.state(), RebindState::Idle);
        assert!(map.is_map_enabled());
        assert_eq!(map.effective_path("Jump", 0).as_deref(), Some("<Keyboard>/space"));
    }

    #[test]
    fn test_unknown_slot_is_not_recorded() {
        let (_dir, mut store, mut map) = setup();
        let mut rebind = RebindController::new();
        let t0 = Instant::now();
        rebind.start_rebind(RebindRequest::new("Jump", 9, ""), &mut map, t0);
        rebind.offer_input("<Keyboard>/j", t0);

        assert_eq!(rebind.poll(t0 + Duration::from_secs(1), &mut store, &mut map), None);
        assert!(!rebind.is_awaiting());
        assert!(map.is_map_enabled());
        assert!(store.get_settings().keybinds.is_empty());
    }
}
