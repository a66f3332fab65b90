//! Settings data model: the persisted container and its four sub-records.

/// Declares a fieldless enum that persists as its display name and exposes the
/// ordered name list used by dropdown controls.
macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(into = "String", try_from = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const NAMES: &'static [&'static str] = &[$($label),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn index(self) -> usize {
                Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
            }

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.name() == name)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.name().to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_name(value.trim())
                    .ok_or_else(|| format!("unknown {} '{}'", stringify!($name), value))
            }
        }
    };
}

pub mod audio;
pub mod gameplay;
pub mod keybinds;
pub mod video;

pub use audio::*;
pub use gameplay::*;
pub use keybinds::*;
pub use video::*;

use crate::engine::EngineServices;
use serde::{Deserialize, Serialize};

/// Everything persisted in the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Settings")]
pub struct SettingsContainer {
    #[serde(rename = "videoSettings", default)]
    pub video: VideoSettings,
    #[serde(rename = "audioSettings", default)]
    pub audio: AudioSettings,
    #[serde(rename = "gameplaySettings", default)]
    pub gameplay: GameplaySettings,
    #[serde(rename = "keybindSettings", default)]
    pub keybinds: KeybindSettings,
}

impl SettingsContainer {
    /// Default settings sized to the display the engine reports.
    pub fn for_display(resolution: Resolution) -> Self {
        Self {
            video: VideoSettings::with_resolution(resolution),
            ..Self::default()
        }
    }

    /// Pushes every sub-setting to the engine.
    pub fn apply_all<E: EngineServices + ?Sized>(&self, engine: &mut E) {
        self.video.apply_screen(engine);
        self.video.apply_quality(engine);
        self.audio.apply_mixer(engine);
        self.audio.apply_speaker_mode(engine);
    }
}
