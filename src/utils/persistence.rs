//! File persistence: the XML settings file and small JSON side files.

use crate::constants::{
    PROJECT_APPLICATION, PROJECT_ORGANIZATION, PROJECT_QUALIFIER, SETTINGS_FILE_NAME,
    SETTINGS_PATH_ENV, SETTINGS_ROOT_ELEMENT,
};
use crate::error::SettingsError;
use crate::settings::SettingsContainer;
use directories::ProjectDirs;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Per-user data directory for this game, created if needed.
pub fn data_dir() -> Result<PathBuf, SettingsError> {
    let project_dirs =
        ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
            .ok_or(SettingsError::NoDataDir)?;
    let dir = project_dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Settings file location: `$GAMECONF_SETTINGS` if set, else `Settings.config` in the data dir.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(data_dir()?.join(SETTINGS_FILE_NAME))
}

pub fn to_xml(settings: &SettingsContainer) -> Result<String, SettingsError> {
    let mut body = String::new();
    let mut serializer =
        quick_xml::se::Serializer::with_root(&mut body, Some(SETTINGS_ROOT_ELEMENT))
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;
    serializer.indent(' ', 2);
    settings
        .serialize(serializer)
        .map_err(|e| SettingsError::Serialize(e.to_string()))?;

    let mut xml = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&body);
    xml.push('\n');
    Ok(xml)
}

pub fn from_xml(xml: &str) -> Result<SettingsContainer, SettingsError> {
    quick_xml::de::from_str(xml).map_err(|e| SettingsError::Deserialize(e.to_string()))
}

/// Why a settings file could not be used.
#[derive(Debug)]
pub enum ReadError {
    Missing,
    Empty,
    Corrupt(SettingsError),
}

pub fn read_settings(path: &Path) -> Result<SettingsContainer, ReadError> {
    let xml = match fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ReadError::Missing),
        Err(e) => return Err(ReadError::Corrupt(e.into())),
    };
    if xml.trim().is_empty() {
        return Err(ReadError::Empty);
    }
    from_xml(&xml).map_err(ReadError::Corrupt)
}

/// Overwrites `path` with the serialized settings, creating parent directories.
pub fn write_settings(path: &Path, settings: &SettingsContainer) -> Result<(), SettingsError> {
    let xml = to_xml(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, xml)?;
    Ok(())
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
/// An unreadable or invalid file is logged before falling back.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!("Could not read {}, using defaults: {}", path.display(), e);
            return T::default();
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => value,
        Err(e) => {
            warn!("Could not parse {}, using defaults: {}", path.display(), e);
            T::default()
        }
    }
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}
