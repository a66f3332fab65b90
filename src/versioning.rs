//! Build versioning: `Major.minor.commits` for git checkouts, `Major.minor` otherwise.

use crate::constants::{GIT_TIMEOUT_SECONDS, VERSION_FILE_NAME};
use crate::error::SettingsError;
use crate::utils::persistence::{load_json_or_default, save_json};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Release stage; its number is the first component of the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MajorVersion {
    PreRelease = 0,
    Alpha = 1,
    Beta = 2,
    Release = 3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSettings {
    pub major_version: MajorVersion,
    pub minor_version: u32,
}

impl Default for VersionSettings {
    fn default() -> Self {
        Self {
            major_version: MajorVersion::PreRelease,
            minor_version: 1,
        }
    }
}

/// Loads `Version.json` from `dir`, creating it with `0.1` when missing.
pub fn load_version_settings(dir: &Path) -> Result<VersionSettings, SettingsError> {
    let path = dir.join(VERSION_FILE_NAME);
    if path.exists() {
        return Ok(load_json_or_default(&path));
    }
    let settings = VersionSettings::default();
    save_json(&path, &settings)?;
    info!("Created version file at {}", path.display());
    Ok(settings)
}

pub fn save_version_settings(dir: &Path, settings: &VersionSettings) -> Result<(), SettingsError> {
    save_json(&dir.join(VERSION_FILE_NAME), settings)
}

/// Number of commits in the repository at `dir`, or `None` if git is
/// unavailable, `dir` is not a checkout, or git takes longer than `timeout`.
pub fn git_commit_count(dir: &Path, timeout: Duration) -> Option<u32> {
    let mut child = Command::new("git")
        .args(["rev-list", "--all", "--count"])
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(20)),
            Ok(None) => {
                warn!("git did not answer within {:?}, building without a commit count", timeout);
                let _ = child.kill();
                let _ = child.wait();
                return None;
            }
            Err(_) => return None,
        }
    }

    let output = child.wait_with_output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()?
        .lines()
        .next()?
        .trim()
        .parse()
        .ok()
}

pub fn bundle_version(settings: &VersionSettings, commits: Option<u32>) -> String {
    let major = settings.major_version as u32;
    match commits {
        Some(count) => format!("{}.{}.{}", major, settings.minor_version, count),
        None => format!("{}.{}", major, settings.minor_version),
    }
}

/// Reads the version file in `dir` and asks git for the commit count.
pub fn update_version(dir: &Path) -> Result<String, SettingsError> {
    let settings = load_version_settings(dir)?;
    let commits = git_commit_count(dir, Duration::from_secs(GIT_TIMEOUT_SECONDS));
    let version = bundle_version(&settings, commits);
    info!(version = %version, "Bundle version updated");
    Ok(version)
}
