//! Error type shared by the settings, keybind and binder layers.

use std::io;
use thiserror::Error;

use crate::binder::{ControlKind, SettingsCategory};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not serialize settings: {0}")]
    Serialize(String),

    #[error("could not parse settings: {0}")]
    Deserialize(String),

    #[error("could not read version file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine a data directory for this platform")]
    NoDataDir,

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("action '{action}' has no binding at index {index}")]
    UnknownBinding { action: String, index: usize },

    #[error("no {control:?} field #{index} in {category:?} settings")]
    NoSuchField {
        category: SettingsCategory,
        control: ControlKind,
        index: usize,
    },

    #[error("a {control:?} cannot drive the '{field}' setting")]
    UnsupportedControl {
        field: &'static str,
        control: ControlKind,
    },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
