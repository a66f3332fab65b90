//! The settings store: owns the loaded settings for the life of the process.
//!
//! Settings are read from disk the first time they are asked for and never
//! reloaded. A missing, empty or unreadable file is replaced with defaults on
//! the spot so the next run finds a valid file. Saving never fails loudly: a
//! write error is logged and the in-memory settings stay authoritative.

use crate::error::SettingsError;
use crate::input::InputBindings;
use crate::settings::{KeybindOverride, KeybindSettings, Resolution, SettingsContainer};
use crate::utils::persistence::{self, ReadError};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Handle returned by [`SettingsStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type KeybindObserver = Box<dyn FnMut(&KeybindSettings)>;

pub struct SettingsStore {
    path: PathBuf,
    settings: Option<SettingsContainer>,
    /// Display mode that fresh defaults are sized to
    display: Resolution,
    observers: Vec<(ObserverId, KeybindObserver)>,
    next_observer: u64,
}

impl SettingsStore {
    /// A store backed by `path`. Nothing is read until the settings are first used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: None,
            display: Resolution::default(),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// A store backed by the per-user settings file.
    pub fn open_default() -> Result<Self, SettingsError> {
        Ok(Self::new(persistence::default_settings_path()?))
    }

    /// Sizes default video settings to `resolution` and reports it as the
    /// live resolution once settings are loaded. Without it the headless
    /// 1920x1080@60 fallback is used.
    pub fn with_display(mut self, resolution: Resolution) -> Self {
        self.display = resolution;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.settings.is_some()
    }

    /// Current settings, loading them from disk on the first call only.
    pub fn get_settings(&mut self) -> &mut SettingsContainer {
        let (path, display) = (&self.path, self.display);
        self.settings
            .get_or_insert_with(|| load_or_create(path, display))
    }

    /// Writes the current settings to disk. Failures are logged and swallowed.
    pub fn save_settings(&mut self) {
        if let Err(e) = self.try_save() {
            error!("Error while trying to save settings: {}", e);
        }
    }

    pub fn try_save(&mut self) -> Result<(), SettingsError> {
        self.get_settings();
        match &self.settings {
            Some(settings) => persistence::write_settings(&self.path, settings),
            None => Ok(()),
        }
    }

    /// Saves on the way out, if anything was ever loaded.
    pub fn on_quit(&mut self) {
        if self.is_loaded() {
            self.save_settings();
        }
    }

    /// Registers a callback run after every keybind override change.
    pub fn subscribe(&mut self, observer: impl FnMut(&KeybindSettings) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Records an override (replacing any for the same action) and notifies observers.
    pub fn add_override(
        &mut self,
        action_name: &str,
        binding_index: usize,
        binding_path: &str,
    ) -> KeybindOverride {
        let added = self
            .get_settings()
            .keybinds
            .add_override(action_name, binding_index, binding_path)
            .clone();
        self.notify_keybinds_changed();
        added
    }

    pub fn remove_override(&mut self, action_name: &str) -> Option<KeybindOverride> {
        let removed = self.get_settings().keybinds.remove_override(action_name);
        if removed.is_some() {
            self.notify_keybinds_changed();
        }
        removed
    }

    /// Drops every override, returning to default bindings.
    pub fn reset_overrides(&mut self) {
        self.get_settings().keybinds.clear();
        self.notify_keybinds_changed();
    }

    /// Applies stored overrides to `target`; see [`KeybindSettings::load_overrides`].
    pub fn load_overrides<B: InputBindings + ?Sized>(&mut self, target: &mut B) -> usize {
        self.get_settings().keybinds.load_overrides(target)
    }

    fn notify_keybinds_changed(&mut self) {
        let Some(settings) = &self.settings else {
            return;
        };
        for (_, observer) in self.observers.iter_mut() {
            observer(&settings.keybinds);
        }
    }
}

fn load_or_create(path: &Path, display: Resolution) -> SettingsContainer {
    let settings = match persistence::read_settings(path) {
        Ok(mut settings) => {
            let dropped = settings.keybinds.dedupe();
            if dropped > 0 {
                warn!(dropped, "Settings file listed an action more than once; kept the last override");
            }
            settings.video.resolution = display;
            settings
        }
        Err(failure) => {
            match failure {
                ReadError::Missing | ReadError::Empty => {
                    info!("Settings file was either empty or did not exist")
                }
                ReadError::Corrupt(e) => error!("Error while trying to load settings: {}", e),
            }
            info!("Building new settings file from default values");
            let defaults = SettingsContainer::for_display(display);
            if let Err(e) = persistence::write_settings(path, &defaults) {
                warn!("Could not write default settings: {}", e);
            }
            defaults
        }
    };
    info!("Settings file located at {}", path.display());
    settings
}
