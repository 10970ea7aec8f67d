use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ObsError, Result};

pub const DEFAULT_OBS_WS_URL: &str = "ws://127.0.0.1:4455";
const DEFAULT_OBS_WS_PORT: u16 = 4455;

/// Where to find obs-websocket, in the shape the config file stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionSettings {
    pub obs_url: String,
    pub obs_password: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            obs_url: DEFAULT_OBS_WS_URL.to_string(),
            obs_password: String::new(),
        }
    }
}

impl ConnectionSettings {
    /// Settings for an OBS instance on this machine listening on `port`.
    pub fn for_local_port(port: u16, password: impl Into<String>) -> Self {
        Self {
            obs_url: format!("ws://127.0.0.1:{port}"),
            obs_password: password.into(),
        }
    }

    /// Host and port parsed out of the stored websocket url.
    pub fn endpoint(&self) -> Result<(String, u16)> {
        let url = Url::parse(&self.obs_url)
            .map_err(|e| ObsError::InvalidEndpoint(format!("{}: {e}", self.obs_url)))?;
        let host = url
            .host_str()
            .ok_or_else(|| ObsError::InvalidEndpoint(self.obs_url.clone()))?
            .to_string();
        // `port()` is None when the port equals the scheme default, so an
        // explicit ws://host:80 resolves via `port_or_known_default`.
        Ok((
            host,
            url.port_or_known_default().unwrap_or(DEFAULT_OBS_WS_PORT),
        ))
    }

    /// An empty stored password means "no authentication".
    pub fn password(&self) -> Option<&str> {
        if self.obs_password.is_empty() {
            None
        } else {
            Some(&self.obs_password)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSource {
    pub name: String,
    pub kind: String,
    pub muted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub name: String,
    pub index: usize,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneList {
    pub current_scene: Option<String>,
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    pub item_id: i64,
    pub source_name: String,
    pub enabled: bool,
}

/// Input kinds that count as audio capture devices (mic or desktop audio),
/// e.g. `wasapi_input_capture`, `coreaudio_output_capture`,
/// `pulse_input_capture`.
pub fn is_audio_capture_kind(kind: &str) -> bool {
    kind.ends_with("_input_capture") || kind.ends_with("_output_capture")
}
