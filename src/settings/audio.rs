use crate::constants::{MUTED_DB, MUTE_THRESHOLD_DB};
use crate::engine::AudioMixer;
use serde::{Deserialize, Serialize};

named_enum! {
    SpeakerMode {
        Mono => "Mono",
        Stereo => "Stereo",
        Quad => "Quad",
        Surround => "Surround",
        Mode5point1 => "Mode5point1",
        Mode7point1 => "Mode7point1",
        Prologic => "Prologic",
    }
}

pub const MASTER_VOLUME: &str = "Master Volume";
pub const MUSIC_VOLUME: &str = "Music Volume";
pub const SFX_VOLUME: &str = "SFX Volume";
pub const AMBIENCE_VOLUME: &str = "Ambience Volume";
pub const DIALOGUE_VOLUME: &str = "Dialogue Volume";

/// Channel volumes are in decibels; 0 is unattenuated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub ambience_volume: f32,
    pub dialogue_volume: f32,
    pub speaker_mode: SpeakerMode,
    pub subtitles: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.0,
            music_volume: 0.0,
            sfx_volume: 0.0,
            ambience_volume: 0.0,
            dialogue_volume: 0.0,
            speaker_mode: SpeakerMode::Stereo,
            subtitles: false,
        }
    }
}

/// Slider floor counts as silence: anything at or below it is pushed to the mixer's mute level.
fn mixer_db(volume: f32) -> f32 {
    if volume <= MUTE_THRESHOLD_DB {
        MUTED_DB
    } else {
        volume
    }
}

impl AudioSettings {
    /// Mixer parameter name and level for every channel.
    pub fn mixer_levels(&self) -> [(&'static str, f32); 5] {
        [
            (MASTER_VOLUME, mixer_db(self.master_volume)),
            (MUSIC_VOLUME, mixer_db(self.music_volume)),
            (SFX_VOLUME, mixer_db(self.sfx_volume)),
            (AMBIENCE_VOLUME, mixer_db(self.ambience_volume)),
            (DIALOGUE_VOLUME, mixer_db(self.dialogue_volume)),
        ]
    }

    pub fn apply_mixer<M: AudioMixer + ?Sized>(&self, mixer: &mut M) {
        for (parameter, level) in self.mixer_levels() {
            mixer.set_float(parameter, level);
        }
    }

    pub fn apply_speaker_mode<M: AudioMixer + ?Sized>(&self, mixer: &mut M) {
        mixer.set_speaker_mode(self.speaker_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessEngine;

    #[test]
    fn test_levels_at_or_below_floor_are_muted() {
        let audio = AudioSettings {
            master_volume: -20.0,
            music_volume: -19.5,
            sfx_volume: -35.0,
            ..AudioSettings::default()
        };

        let levels = audio.mixer_levels();
        assert_eq!(levels[0], (MASTER_VOLUME, -80.0));
        assert_eq!(levels[1], (MUSIC_VOLUME, -19.5));
        assert_eq!(levels[2], (SFX_VOLUME, -80.0));
        assert_eq!(levels[3], (AMBIENCE_VOLUME, 0.0));
    }

    #[test]
    fn test_apply_mixer_sets_every_parameter() {
        let mut engine = HeadlessEngine::default();
        let audio = AudioSettings {
            dialogue_volume: -6.0,
            ..AudioSettings::default()
        };
        audio.apply_mixer(&mut engine);

        assert_eq!(engine.mixer.get(DIALOGUE_VOLUME), Some(&-6.0));
        assert_eq!(engine.mixer.get(MASTER_VOLUME), Some(&0.0));
    }
}
