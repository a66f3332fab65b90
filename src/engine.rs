//! Engine capabilities the settings layer pushes values into.
//!
//! The real game provides these from its renderer, window and audio mixer.
//! [`HeadlessEngine`] records what was applied so the CLI and tests can run
//! without any of them.

use crate::settings::{QualityProfile, Resolution, ScreenMode, SpeakerMode};
use std::collections::HashMap;

pub trait DisplayService {
    /// Every mode the display supports.
    fn available_resolutions(&self) -> Vec<Resolution>;
    fn current_resolution(&self) -> Resolution;
    fn set_screen_mode(&mut self, mode: ScreenMode);
}

pub trait QualityService {
    fn apply_quality(&mut self, profile: &QualityProfile);
}

pub trait AudioMixer {
    /// Sets an exposed mixer parameter, in decibels for volume parameters.
    fn set_float(&mut self, parameter: &str, value: f32);
    fn set_speaker_mode(&mut self, mode: SpeakerMode);
}

/// Everything the field binder may need to touch after an edit.
pub trait EngineServices: DisplayService + QualityService + AudioMixer {}

impl<T: DisplayService + QualityService + AudioMixer> EngineServices for T {}

#[derive(Debug, Clone, Default)]
pub struct HeadlessEngine {
    pub resolutions: Vec<Resolution>,
    pub screen_mode: Option<ScreenMode>,
    pub quality: Option<QualityProfile>,
    pub mixer: HashMap<String, f32>,
    pub speaker_mode: Option<SpeakerMode>,
}

impl HeadlessEngine {
    /// A headless display offering a few common modes.
    pub fn with_common_modes() -> Self {
        let resolutions = [(1280, 720), (1600, 900), (1920, 1080), (2560, 1440)]
            .iter()
            .flat_map(|&(w, h)| [60, 144].map(|hz| Resolution::new(w, h, hz)))
            .collect();
        Self {
            resolutions,
            ..Self::default()
        }
    }
}

impl DisplayService for HeadlessEngine {
    fn available_resolutions(&self) -> Vec<Resolution> {
        self.resolutions.clone()
    }

    fn current_resolution(&self) -> Resolution {
        match self.screen_mode {
            Some(mode) => Resolution::new(mode.width, mode.height, mode.refresh_rate),
            None => Resolution::default(),
        }
    }

    fn set_screen_mode(&mut self, mode: ScreenMode) {
        self.screen_mode = Some(mode);
    }
}

impl QualityService for HeadlessEngine {
    fn apply_quality(&mut self, profile: &QualityProfile) {
        self.quality = Some(*profile);
    }
}

impl AudioMixer for HeadlessEngine {
    fn set_float(&mut self, parameter: &str, value: f32) {
        self.mixer.insert(parameter.to_string(), value);
    }

    fn set_speaker_mode(&mut self, mode: SpeakerMode) {
        self.speaker_mode = Some(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_modes_include_default() {
        let engine = HeadlessEngine::with_common_modes();
        assert_eq!(engine.available_resolutions().len(), 8);
        assert!(engine
            .available_resolutions()
            .contains(&Resolution::default()));
    }

    #[test]
    fn test_current_resolution_tracks_screen_mode() {
        let mut engine = HeadlessEngine::default();
        assert_eq!(engine.current_resolution(), Resolution::default());

        engine.set_screen_mode(ScreenMode {
            width: 1280,
            height: 720,
            mode: crate::settings::FullScreenMode::Windowed,
            refresh_rate: 144,
        });
        assert_eq!(engine.current_resolution(), Resolution::new(1280, 720, 144));
    }
}
