use obws::requests::scene_items::SetEnabled;
use obws::Client;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ObsError, Result};
use crate::models::*;

/// Shared handle to one OBS instance. Construct it once, wrap it in an
/// `Arc`, and pass it to whatever needs OBS; `disconnect` tears it down.
///
/// Operations connect lazily: a bridge started before OBS picks the
/// connection up on the first request that needs it, and a dropped
/// connection is retried on the next request.
pub struct ObsClient {
    settings: RwLock<ConnectionSettings>,
    client: RwLock<Option<Client>>,
}

impl ObsClient {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            client: RwLock::new(None),
        }
    }

    pub async fn connect(&self) -> Result<()> {
        let settings = self.settings.read().await.clone();
        let (host, port) = settings.endpoint()?;
        info!("Connecting to OBS at {host}:{port}");

        let client = match settings.password() {
            Some(password) => Client::connect(host.as_str(), port, Some(password))
                .await
                .map_err(|e| ObsError::ConnectionError(e.to_string()))?,
            None => Client::connect(host.as_str(), port, None::<&str>)
                .await
                .map_err(|e| ObsError::ConnectionError(e.to_string()))?,
        };

        // Concurrent connects race; the last writer wins and the loser's
        // client closes on drop.
        *self.client.write().await = Some(client);
        info!("Connected to OBS at {host}:{port}");
        Ok(())
    }

    pub async fn disconnect(&self) -> Result<()> {
        if let Some(mut client) = self.client.write().await.take() {
            client.disconnect().await;
            info!("Disconnected from OBS");
        }
        Ok(())
    }

    pub async fn is_connected(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Swap the connection target and reconnect under the new settings.
    /// The settings stick even if the reconnect fails, so a later request
    /// retries against the new target rather than the old one.
    pub async fn apply_settings(&self, settings: ConnectionSettings) -> Result<()> {
        *self.settings.write().await = settings;
        self.disconnect().await?;
        self.connect().await
    }

    async fn ensure_connected(&self) -> Result<()> {
        if self.client.read().await.is_some() {
            return Ok(());
        }
        self.connect().await
    }

    /// Any failed call tears the handle down so the next request starts
    /// from a fresh connect instead of hammering a dead socket.
    async fn connection_lost(&self, err: impl std::fmt::Display) -> ObsError {
        warn!("OBS request failed, dropping the connection: {err}");
        *self.client.write().await = None;
        ObsError::WebSocketError(err.to_string())
    }

    pub async fn version(&self) -> Result<String> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        match client.general().version().await {
            Ok(version) => Ok(format!(
                "OBS {} (obs-websocket {})",
                version.obs_version, version.obs_web_socket_version
            )),
            Err(e) => {
                drop(guard);
                Err(self.connection_lost(e).await)
            }
        }
    }

    /// Audio capture inputs with their current mute state. obs-websocket
    /// has no batched mute query, so this is one call per input.
    pub async fn list_audio_sources(&self) -> Result<Vec<AudioSource>> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        let inputs = match client.inputs().list(None).await {
            Ok(inputs) => inputs,
            Err(e) => {
                drop(guard);
                return Err(self.connection_lost(e).await);
            }
        };

        let mut sources = Vec::new();
        for input in inputs {
            if !is_audio_capture_kind(&input.kind) {
                continue;
            }
            let muted = match client.inputs().muted(input.id.name.as_str().into()).await {
                Ok(muted) => muted,
                Err(e) => {
                    drop(guard);
                    return Err(self.connection_lost(e).await);
                }
            };
            sources.push(AudioSource {
                name: input.id.name,
                kind: input.kind,
                muted,
            });
        }
        Ok(sources)
    }

    pub async fn set_mute(&self, source_name: &str, muted: bool) -> Result<()> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        if let Err(e) = client.inputs().set_muted(source_name.into(), muted).await {
            drop(guard);
            return Err(self.connection_lost(e).await);
        }
        debug!("Set mute on '{source_name}' to {muted}");
        Ok(())
    }

    pub async fn list_scenes(&self) -> Result<SceneList> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        let scene_list = match client.scenes().list().await {
            Ok(list) => list,
            Err(e) => {
                drop(guard);
                return Err(self.connection_lost(e).await);
            }
        };

        let current_scene = scene_list
            .current_program_scene
            .as_ref()
            .map(|s| s.name.clone());

        let scenes = scene_list
            .scenes
            .into_iter()
            .map(|scene| Scene {
                is_current: Some(&scene.id.name) == current_scene.as_ref(),
                name: scene.id.name,
                index: scene.index,
            })
            .collect();

        Ok(SceneList {
            current_scene,
            scenes,
        })
    }

    pub async fn set_current_scene(&self, scene_name: &str) -> Result<()> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        if let Err(e) = client.scenes().set_current_program_scene(scene_name).await {
            drop(guard);
            return Err(self.connection_lost(e).await);
        }
        info!("Switched program scene to '{scene_name}'");
        Ok(())
    }

    /// Items of one scene with their enabled flags, fetched per item like
    /// the mute states above.
    pub async fn list_scene_items(&self, scene_name: &str) -> Result<Vec<SceneItem>> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        let raw = match client.scene_items().list(scene_name.into()).await {
            Ok(items) => items,
            Err(e) => {
                drop(guard);
                return Err(self.connection_lost(e).await);
            }
        };

        let mut items = Vec::with_capacity(raw.len());
        for item in raw {
            let enabled = match client
                .scene_items()
                .enabled(scene_name.into(), item.id)
                .await
            {
                Ok(enabled) => enabled,
                Err(e) => {
                    drop(guard);
                    return Err(self.connection_lost(e).await);
                }
            };
            items.push(SceneItem {
                item_id: item.id,
                source_name: item.source_name,
                enabled,
            });
        }
        Ok(items)
    }

    pub async fn set_scene_item_enabled(
        &self,
        scene_name: &str,
        item_id: i64,
        enabled: bool,
    ) -> Result<()> {
        self.ensure_connected().await?;
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(ObsError::NotConnected)?;

        let request = SetEnabled {
            scene: scene_name.into(),
            item_id,
            enabled,
        };
        if let Err(e) = client.scene_items().set_enabled(request).await {
            drop(guard);
            return Err(self.connection_lost(e).await);
        }
        debug!("Set item {item_id} in '{scene_name}' enabled={enabled}");
        Ok(())
    }
}
