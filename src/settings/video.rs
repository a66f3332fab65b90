use crate::constants::{DEFAULT_HEIGHT, DEFAULT_REFRESH_RATE, DEFAULT_WIDTH};
use crate::engine::{DisplayService, QualityService};
use serde::{Deserialize, Serialize};
use std::fmt;

named_enum! {
    /// How the game window occupies the display
    FullScreenMode {
        ExclusiveFullScreen => "ExclusiveFullScreen",
        FullScreenWindow => "FullScreenWindow",
        MaximizedWindow => "MaximizedWindow",
        Windowed => "Windowed",
    }
}

named_enum! {
    /// Mirrors the quality tiers configured for the renderer, lowest first
    QualityLevel {
        VeryLow => "VeryLow",
        Low => "Low",
        Medium => "Medium",
        High => "High",
        VeryHigh => "VeryHigh",
        Ultra => "Ultra",
    }
}

named_enum! {
    AnisotropicFiltering {
        Disable => "Disable",
        Enable => "Enable",
        ForceEnable => "ForceEnable",
    }
}

named_enum! {
    /// MSAA level
    AntialiasingLevel {
        Disabled => "Disabled",
        X2 => "x2",
        X4 => "x4",
        X8 => "x8",
    }
}

impl AntialiasingLevel {
    pub fn sample_count(self) -> u32 {
        match self {
            AntialiasingLevel::Disabled => 0,
            AntialiasingLevel::X2 => 2,
            AntialiasingLevel::X4 => 4,
            AntialiasingLevel::X8 => 8,
        }
    }
}

/// A display mode as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32, refresh_rate: u32) -> Self {
        Self {
            width,
            height,
            refresh_rate,
        }
    }

    /// Parses the `"WIDTHxHEIGHT"` form shown in resolution dropdowns.
    pub fn parse_size(text: &str) -> Option<(u32, u32)> {
        let (w, h) = text.trim().split_once('x')?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    }

    pub fn size_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_REFRESH_RATE)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} @ {}Hz", self.width, self.height, self.refresh_rate)
    }
}

/// What the display service needs to change the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMode {
    pub width: u32,
    pub height: u32,
    pub mode: FullScreenMode,
    pub refresh_rate: u32,
}

/// Quality values the renderer cannot infer from the quality level alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityProfile {
    pub quality_level: usize,
    pub anisotropic_filtering: AnisotropicFiltering,
    pub lod_bias: f32,
    pub maximum_lod_level: i32,
    pub vsync_count: u32,
    pub depth_texture: bool,
    pub msaa_samples: u32,
    pub shadow_distance: f32,
    pub shadow_depth_bias: f32,
    pub shadow_normal_bias: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSettings {
    /// Display mode the engine last reported; never written to disk
    #[serde(skip)]
    pub resolution: Resolution,

    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,

    pub full_screen_mode: FullScreenMode,
    pub v_sync: bool,

    /// Controls settings that can't change at runtime, mostly shadows and post-processing
    pub quality_level: QualityLevel,
    pub anisotropic_filtering: AnisotropicFiltering,
    /// Blending between LOD levels
    pub lod_bias: f32,
    /// Caps how high-poly models can get
    #[serde(rename = "maximumLODLevel")]
    pub maximum_lod_level: i32,

    pub depth_texture: bool,
    pub anti_aliasing: AntialiasingLevel,
    pub shadow_distance: f32,
    pub shadow_depth_bias: f32,
    pub shadow_normal_bias: f32,
}

impl VideoSettings {
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self {
            resolution,
            width: resolution.width,
            height: resolution.height,
            refresh_rate: resolution.refresh_rate,
            full_screen_mode: FullScreenMode::FullScreenWindow,
            v_sync: true,
            quality_level: QualityLevel::Ultra,
            anisotropic_filtering: AnisotropicFiltering::Enable,
            lod_bias: 1.0,
            maximum_lod_level: 4,
            depth_texture: true,
            anti_aliasing: AntialiasingLevel::X8,
            shadow_distance: 150.0,
            shadow_depth_bias: 1.0,
            shadow_normal_bias: 1.0,
        }
    }

    pub fn screen_mode(&self) -> ScreenMode {
        ScreenMode {
            width: self.width,
            height: self.height,
            mode: self.full_screen_mode,
            refresh_rate: self.refresh_rate,
        }
    }

    pub fn quality_profile(&self) -> QualityProfile {
        QualityProfile {
            quality_level: self.quality_level.index(),
            anisotropic_filtering: self.anisotropic_filtering,
            lod_bias: self.lod_bias,
            maximum_lod_level: self.maximum_lod_level,
            vsync_count: u32::from(self.v_sync),
            depth_texture: self.depth_texture,
            msaa_samples: self.anti_aliasing.sample_count(),
            shadow_distance: self.shadow_distance,
            shadow_depth_bias: self.shadow_depth_bias,
            shadow_normal_bias: self.shadow_normal_bias,
        }
    }

    /// Updates resolution, refresh rate and full screen mode.
    pub fn apply_screen<D: DisplayService + ?Sized>(&self, display: &mut D) {
        display.set_screen_mode(self.screen_mode());
    }

    /// Updates everything `apply_screen` does not touch.
    pub fn apply_quality<Q: QualityService + ?Sized>(&self, quality: &mut Q) {
        quality.apply_quality(&self.quality_profile());
    }
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self::with_resolution(Resolution::default())
    }
}

// The live resolution handle is transient, so equality covers persisted fields only.
impl PartialEq for VideoSettings {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.refresh_rate == other.refresh_rate
            && self.full_screen_mode == other.full_screen_mode
            && self.v_sync == other.v_sync
            && self.quality_level == other.quality_level
            && self.anisotropic_filtering == other.anisotropic_filtering
            && self.lod_bias == other.lod_bias
            && self.maximum_lod_level == other.maximum_lod_level
            && self.depth_texture == other.depth_texture
            && self.anti_aliasing == other.anti_aliasing
            && self.shadow_distance == other.shadow_distance
            && self.shadow_depth_bias == other.shadow_depth_bias
            && self.shadow_normal_bias == other.shadow_normal_bias
    }
}
