//! Persistence for the OBS connection settings.
//!
//! One JSON file under the platform config dir, e.g.
//! `~/.config/stagehand/config.json` on Linux. When no file exists yet the
//! settings come from `OBS_WS_URL` / `OBS_WS_PASSWORD`, falling back to the
//! stock local OBS endpoint.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use stagehand_obs::ConnectionSettings;

use crate::error::{BridgeError, Result};

pub const CONFIG_DIR_NAME: &str = "stagehand";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const OBS_URL_ENV: &str = "OBS_WS_URL";
pub const OBS_PASSWORD_ENV: &str = "OBS_WS_PASSWORD";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// File first, then environment, then defaults.
pub fn load(path: &Path) -> Result<ConnectionSettings> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let settings = serde_json::from_str(&raw)
                .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
            debug!("Loaded OBS settings from {}", path.display());
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}, using environment", path.display());
            Ok(from_env())
        }
        Err(e) => Err(BridgeError::Io(e)),
    }
}

/// Like [`load`], but an unreadable or corrupt file only costs a warning;
/// the bridge still starts and a client can resubmit settings over HTTP.
pub fn load_or_default(path: &Path) -> ConnectionSettings {
    match load(path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Ignoring stored OBS settings: {e}");
            from_env()
        }
    }
}

fn from_env() -> ConnectionSettings {
    let mut settings = ConnectionSettings::default();
    if let Ok(url) = std::env::var(OBS_URL_ENV) {
        if !url.is_empty() {
            settings.obs_url = url;
        }
    }
    if let Ok(password) = std::env::var(OBS_PASSWORD_ENV) {
        settings.obs_password = password;
    }
    settings
}

/// Write-then-rename so a crash mid-write cannot leave a truncated file.
pub fn save(path: &Path, settings: &ConnectionSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(settings)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    info!("Saved OBS settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let settings = ConnectionSettings::for_local_port(4460, "s3cret");
        save(&path, &settings).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.json");

        save(&path, &ConnectionSettings::default()).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save(&path, &ConnectionSettings::default()).unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("config.json")]);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load(&path), Err(BridgeError::Config(_))));
    }

    #[test]
    fn load_or_default_shrugs_off_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let settings = load_or_default(&path);
        assert!(settings.obs_url.starts_with("ws://"));
    }

    #[test]
    fn load_accepts_the_on_disk_wire_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "obsUrl": "ws://127.0.0.1:4461", "obsPassword": "pw" }"#,
        )
        .unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.obs_url, "ws://127.0.0.1:4461");
        assert_eq!(loaded.obs_password, "pw");
    }

    #[test]
    fn load_tolerates_missing_password_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "obsUrl": "ws://127.0.0.1:4455" }"#).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.password(), None);
    }
}
