//! Settings field binder.
//!
//! Every editable setting has a row in [`FIELDS`]: its category, its name as
//! written in the settings file, what kind of value it holds, and plain
//! getter/setter functions. A UI control picks a category and an index into
//! that category's fields; binding fails when the field holds a type the
//! control cannot drive. Edits go back into the store through the setter and
//! re-apply the affected engine state.

use crate::engine::{DisplayService, EngineServices};
use crate::error::SettingsError;
use crate::settings::{
    AnisotropicFiltering, AntialiasingLevel, FullScreenMode, QualityLevel, Resolution,
    SettingsContainer, SpeakerMode,
};
use crate::store::SettingsStore;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsCategory {
    Video,
    Audio,
    Gameplay,
    Keybinds,
}

impl SettingsCategory {
    pub const ALL: [SettingsCategory; 4] = [
        SettingsCategory::Video,
        SettingsCategory::Audio,
        SettingsCategory::Gameplay,
        SettingsCategory::Keybinds,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SettingsCategory::Video => "Video",
            SettingsCategory::Audio => "Audio",
            SettingsCategory::Gameplay => "Gameplay",
            SettingsCategory::Keybinds => "Keybinds",
        }
    }
}

/// The kind of UI control a field is shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Toggle,
    Slider,
    Dropdown,
    TextField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Float,
    Int,
    /// Named options, in declaration order
    Enum(&'static [&'static str]),
    /// `"WIDTHxHEIGHT"` picked from the display's modes
    Resolution,
    /// A whole number that can also be picked from the display's modes
    RefreshRate,
    Text,
}

impl ControlKind {
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            ControlKind::Toggle => matches!(kind, ValueKind::Bool),
            ControlKind::Slider => matches!(
                kind,
                ValueKind::Float | ValueKind::Int | ValueKind::RefreshRate
            ),
            ControlKind::Dropdown => matches!(
                kind,
                ValueKind::Enum(_) | ValueKind::Resolution | ValueKind::RefreshRate
            ),
            ControlKind::TextField => matches!(kind, ValueKind::Text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Float(f32),
    Int(i64),
    /// Index into an enum's option list
    Choice(usize),
    Text(String),
}

impl SettingValue {
    fn as_bool(&self, field: &'static str) -> Result<bool, SettingsError> {
        match self {
            SettingValue::Bool(b) => Ok(*b),
            other => Err(invalid(field, format!("expected a boolean, got {:?}", other))),
        }
    }

    fn as_float(&self, field: &'static str) -> Result<f32, SettingsError> {
        match self {
            SettingValue::Float(f) => Ok(*f),
            SettingValue::Int(i) => Ok(*i as f32),
            other => Err(invalid(field, format!("expected a number, got {:?}", other))),
        }
    }

    fn as_int(&self, field: &'static str) -> Result<i64, SettingsError> {
        match self {
            SettingValue::Int(i) => Ok(*i),
            SettingValue::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            SettingValue::Text(t) => t
                .trim()
                .parse()
                .map_err(|_| invalid(field, format!("'{}' is not a whole number", t))),
            other => Err(invalid(field, format!("expected a whole number, got {:?}", other))),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

/// Engine state to refresh after a field changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyHook {
    None,
    VideoScreen,
    VideoQuality,
    AudioMixer,
    AudioSpeaker,
}

pub struct FieldDescriptor {
    pub category: SettingsCategory,
    pub name: &'static str,
    pub value_kind: ValueKind,
    /// Slider min, max and step
    pub range: Option<(f32, f32, f32)>,
    pub apply: ApplyHook,
    get: fn(&SettingsContainer) -> SettingValue,
    set: fn(&mut SettingsContainer, SettingValue) -> Result<(), SettingsError>,
}

impl FieldDescriptor {
    pub fn get(&self, settings: &SettingsContainer) -> SettingValue {
        (self.get)(settings)
    }

    pub fn set(&self, settings: &mut SettingsContainer, value: SettingValue) -> Result<(), SettingsError> {
        (self.set)(settings, value)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("category", &self.category)
            .field("name", &self.name)
            .field("value_kind", &self.value_kind)
            .finish()
    }
}

macro_rules! bool_field {
    ($cat:ident, $sub:ident . $field:ident, $name:literal, $apply:ident) => {
        FieldDescriptor {
            category: SettingsCategory::$cat,
            name: $name,
            value_kind: ValueKind::Bool,
            range: None,
            apply: ApplyHook::$apply,
            get: |s| SettingValue::Bool(s.$sub.$field),
            set: |s, v| {
                s.$sub.$field = v.as_bool($name)?;
                Ok(())
            },
        }
    };
}

macro_rules! float_field {
    ($cat:ident, $sub:ident . $field:ident, $name:literal, $apply:ident, $min:expr, $max:expr, $step:expr) => {
        FieldDescriptor {
            category: SettingsCategory::$cat,
            name: $name,
            value_kind: ValueKind::Float,
            range: Some(($min, $max, $step)),
            apply: ApplyHook::$apply,
            get: |s| SettingValue::Float(s.$sub.$field),
            set: |s, v| {
                s.$sub.$field = v.as_float($name)?;
                Ok(())
            },
        }
    };
}

macro_rules! int_field {
    ($cat:ident, $sub:ident . $field:ident : $ty:ty, $name:literal, $kind:ident, $apply:ident, $min:expr, $max:expr) => {
        FieldDescriptor {
            category: SettingsCategory::$cat,
            name: $name,
            value_kind: ValueKind::$kind,
            range: Some(($min, $max, 1.0)),
            apply: ApplyHook::$apply,
            get: |s| SettingValue::Int(i64::from(s.$sub.$field)),
            set: |s, v| {
                let raw = v.as_int($name)?;
                s.$sub.$field =
                    <$ty>::try_from(raw).map_err(|_| invalid($name, format!("{} is out of range", raw)))?;
                Ok(())
            },
        }
    };
}

macro_rules! enum_field {
    ($cat:ident, $sub:ident . $field:ident : $ty:ident, $name:literal, $apply:ident) => {
        FieldDescriptor {
            category: SettingsCategory::$cat,
            name: $name,
            value_kind: ValueKind::Enum($ty::NAMES),
            range: None,
            apply: ApplyHook::$apply,
            get: |s| SettingValue::Choice(s.$sub.$field.index()),
            set: |s, v| {
                let picked = match &v {
                    SettingValue::Choice(i) => $ty::from_index(*i),
                    SettingValue::Text(t) => $ty::from_name(t),
                    _ => None,
                };
                s.$sub.$field = picked.ok_or_else(|| invalid($name, format!("{:?} is not an option", v)))?;
                Ok(())
            },
        }
    };
}

/// Every bindable setting, in settings-file order within each category.
pub static FIELDS: &[FieldDescriptor] = &[
    // Video
    FieldDescriptor {
        category: SettingsCategory::Video,
        name: "resolution",
        value_kind: ValueKind::Resolution,
        range: None,
        apply: ApplyHook::VideoScreen,
        get: |s| SettingValue::Text(format!("{}x{}", s.video.width, s.video.height)),
        set: |s, v| {
            let SettingValue::Text(text) = &v else {
                return Err(invalid("resolution", format!("expected WIDTHxHEIGHT, got {:?}", v)));
            };
            let (width, height) = Resolution::parse_size(text)
                .ok_or_else(|| invalid("resolution", format!("'{}' is not WIDTHxHEIGHT", text)))?;
            s.video.width = width;
            s.video.height = height;
            Ok(())
        },
    },
    int_field!(Video, video.width: u32, "width", Int, VideoScreen, 640.0, 7680.0),
    int_field!(Video, video.height: u32, "height", Int, VideoScreen, 480.0, 4320.0),
    int_field!(Video, video.refresh_rate: u32, "refreshRate", RefreshRate, VideoScreen, 30.0, 360.0),
    enum_field!(Video, video.full_screen_mode: FullScreenMode, "fullScreenMode", VideoScreen),
    bool_field!(Video, video.v_sync, "vSync", VideoQuality),
    enum_field!(Video, video.quality_level: QualityLevel, "qualityLevel", VideoQuality),
    enum_field!(Video, video.anisotropic_filtering: AnisotropicFiltering, "anisotropicFiltering", VideoQuality),
    float_field!(Video, video.lod_bias, "lodBias", VideoQuality, 0.1, 4.0, 0.1),
    int_field!(Video, video.maximum_lod_level: i32, "maximumLODLevel", Int, VideoQuality, 0.0, 7.0),
    bool_field!(Video, video.depth_texture, "depthTexture", VideoQuality),
    enum_field!(Video, video.anti_aliasing: AntialiasingLevel, "antiAliasing", VideoQuality),
    float_field!(Video, video.shadow_distance, "shadowDistance", VideoQuality, 0.0, 500.0, 10.0),
    float_field!(Video, video.shadow_depth_bias, "shadowDepthBias", VideoQuality, 0.0, 10.0, 0.1),
    float_field!(Video, video.shadow_normal_bias, "shadowNormalBias", VideoQuality, 0.0, 10.0, 0.1),
    // Audio
    float_field!(Audio, audio.master_volume, "masterVolume", AudioMixer, -20.0, 0.0, 1.0),
    float_field!(Audio, audio.music_volume, "musicVolume", AudioMixer, -20.0, 0.0, 1.0),
    float_field!(Audio, audio.sfx_volume, "sfxVolume", AudioMixer, -20.0, 0.0, 1.0),
    float_field!(Audio, audio.ambience_volume, "ambienceVolume", AudioMixer, -20.0, 0.0, 1.0),
    float_field!(Audio, audio.dialogue_volume, "dialogueVolume", AudioMixer, -20.0, 0.0, 1.0),
    enum_field!(Audio, audio.speaker_mode: SpeakerMode, "speakerMode", AudioSpeaker),
    bool_field!(Audio, audio.subtitles, "subtitles", None),
    // Gameplay
    float_field!(Gameplay, gameplay.mouse_sensitivity, "mouseSensitivity", None, 0.05, 5.0, 0.05),
    float_field!(Gameplay, gameplay.controller_sensitivity, "controllerSensitivity", None, 0.5, 30.0, 0.5),
    bool_field!(Gameplay, gameplay.toggle_crouch, "toggleCrouch", None),
    bool_field!(Gameplay, gameplay.toggle_sprint, "toggleSprint", None),
    bool_field!(Gameplay, gameplay.invert_y, "invertY", None),
    bool_field!(Gameplay, gameplay.fov_modifier, "fovModifier", None),
];

/// Every field of `category`, in table order. Binding indices point into this.
pub fn fields_in(category: SettingsCategory) -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELDS.iter().filter(move |f| f.category == category)
}

/// Fields in `category` that a `control` can drive, in table order.
pub fn fields_for(category: SettingsCategory, control: ControlKind) -> Vec<&'static FieldDescriptor> {
    fields_in(category)
        .filter(|f| control.accepts(f.value_kind))
        .collect()
}

pub fn find_field(category: SettingsCategory, name: &str) -> Option<&'static FieldDescriptor> {
    FIELDS.iter().find(|f| f.category == category && f.name == name)
}

/// A UI control wired to one settings field.
#[derive(Debug, Clone, Copy)]
pub struct FieldBinding {
    pub category: SettingsCategory,
    pub control: ControlKind,
    pub field: &'static FieldDescriptor,
}

impl FieldBinding {
    /// Binds `control` to the `index`-th field of `category`.
    ///
    /// Fails when the index is out of range or the field's type is one the
    /// control cannot drive.
    pub fn bind(
        category: SettingsCategory,
        index: usize,
        control: ControlKind,
    ) -> Result<Self, SettingsError> {
        let field = fields_in(category)
            .nth(index)
            .ok_or(SettingsError::NoSuchField {
                category,
                control,
                index,
            })?;
        if !control.accepts(field.value_kind) {
            return Err(SettingsError::UnsupportedControl {
                field: field.name,
                control,
            });
        }
        Ok(Self {
            category,
            control,
            field,
        })
    }

    /// Like [`FieldBinding::bind`], but logs a failure and skips the binding.
    pub fn try_bind(category: SettingsCategory, index: usize, control: ControlKind) -> Option<Self> {
        match Self::bind(category, index, control) {
            Ok(binding) => Some(binding),
            Err(e) => {
                error!("Skipping settings field binding: {}", e);
                None
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.field.name
    }

    pub fn current_value(&self, settings: &SettingsContainer) -> SettingValue {
        self.field.get(settings)
    }

    /// Options a dropdown shows for this field.
    pub fn dropdown_options<D: DisplayService + ?Sized>(
        &self,
        settings: &SettingsContainer,
        display: &D,
    ) -> Vec<String> {
        let mut options: Vec<String> = match self.field.value_kind {
            ValueKind::Enum(names) => return names.iter().map(|n| n.to_string()).collect(),
            ValueKind::Resolution => display
                .available_resolutions()
                .iter()
                .map(|r| r.size_label())
                .collect(),
            ValueKind::RefreshRate => display
                .available_resolutions()
                .iter()
                .map(|r| r.refresh_rate.to_string())
                .collect(),
            _ => return Vec::new(),
        };
        let mut seen = std::collections::HashSet::new();
        options.retain(|o| seen.insert(o.clone()));

        // keep the stored value selectable even if the display no longer lists it
        let current = match self.current_value(settings) {
            SettingValue::Text(t) => t,
            SettingValue::Int(i) => i.to_string(),
            _ => return options,
        };
        if !options.contains(&current) {
            options.push(current);
        }
        options
    }

    /// Index of the stored value within `options`.
    pub fn selected_option(&self, settings: &SettingsContainer, options: &[String]) -> Option<usize> {
        match self.current_value(settings) {
            SettingValue::Choice(i) => Some(i),
            SettingValue::Text(t) => options.iter().position(|o| *o == t),
            SettingValue::Int(i) => options.iter().position(|o| *o == i.to_string()),
            _ => None,
        }
    }

    /// The edit a dropdown makes when option `index` is picked.
    pub fn dropdown_edit(&self, index: usize, options: &[String]) -> Option<SettingValue> {
        match self.field.value_kind {
            ValueKind::Enum(names) => (index < names.len()).then_some(SettingValue::Choice(index)),
            _ => options.get(index).map(|o| SettingValue::Text(o.clone())),
        }
    }

    /// The value one slider step or toggle press away from the current one.
    pub fn stepped_value(&self, settings: &SettingsContainer, direction: i32) -> Option<SettingValue> {
        let (min, max, step) = self.field.range.unwrap_or((f32::MIN, f32::MAX, 1.0));
        match self.current_value(settings) {
            SettingValue::Bool(b) => Some(SettingValue::Bool(!b)),
            SettingValue::Float(f) => {
                let next = (f + step * direction as f32).clamp(min, max);
                // snap to the step grid to keep float drift out of the file
                Some(SettingValue::Float((next / step).round() * step))
            }
            SettingValue::Int(i) => {
                let next = (i + i64::from(direction)).clamp(min as i64, max as i64);
                Some(SettingValue::Int(next))
            }
            _ => None,
        }
    }

    /// Writes `value` into the store and refreshes the engine state it affects.
    pub fn apply_edit<E: EngineServices + ?Sized>(
        &self,
        store: &mut SettingsStore,
        value: SettingValue,
        engine: &mut E,
    ) -> Result<(), SettingsError> {
        let settings = store.get_settings();
        self.field.set(settings, value)?;
        match self.field.apply {
            ApplyHook::None => {}
            ApplyHook::VideoScreen => settings.video.apply_screen(engine),
            ApplyHook::VideoQuality => settings.video.apply_quality(engine),
            ApplyHook::AudioMixer => settings.audio.apply_mixer(engine),
            ApplyHook::AudioSpeaker => settings.audio.apply_speaker_mode(engine),
        }
        Ok(())
    }
}
