use async_trait::async_trait;

use crate::client::ObsClient;
use crate::error::Result;
use crate::models::{AudioSource, ConnectionSettings, SceneItem, SceneList};

/// The slice of OBS the HTTP layer talks to. `ObsClient` is the real
/// implementation; tests stand in their own.
#[async_trait]
pub trait ObsGateway: Send + Sync {
    async fn is_connected(&self) -> bool;

    async fn apply_settings(&self, settings: ConnectionSettings) -> Result<()>;

    async fn list_audio_sources(&self) -> Result<Vec<AudioSource>>;

    async fn set_mute(&self, source_name: &str, muted: bool) -> Result<()>;

    async fn list_scenes(&self) -> Result<SceneList>;

    async fn set_current_scene(&self, scene_name: &str) -> Result<()>;

    async fn list_scene_items(&self, scene_name: &str) -> Result<Vec<SceneItem>>;

    async fn set_scene_item_enabled(
        &self,
        scene_name: &str,
        item_id: i64,
        enabled: bool,
    ) -> Result<()>;
}

#[async_trait]
impl ObsGateway for ObsClient {
    async fn is_connected(&self) -> bool {
        ObsClient::is_connected(self).await
    }

    async fn apply_settings(&self, settings: ConnectionSettings) -> Result<()> {
        ObsClient::apply_settings(self, settings).await
    }

    async fn list_audio_sources(&self) -> Result<Vec<AudioSource>> {
        ObsClient::list_audio_sources(self).await
    }

    async fn set_mute(&self, source_name: &str, muted: bool) -> Result<()> {
        ObsClient::set_mute(self, source_name, muted).await
    }

    async fn list_scenes(&self) -> Result<SceneList> {
        ObsClient::list_scenes(self).await
    }

    async fn set_current_scene(&self, scene_name: &str) -> Result<()> {
        ObsClient::set_current_scene(self, scene_name).await
    }

    async fn list_scene_items(&self, scene_name: &str) -> Result<Vec<SceneItem>> {
        ObsClient::list_scene_items(self, scene_name).await
    }

    async fn set_scene_item_enabled(
        &self,
        scene_name: &str,
        item_id: i64,
        enabled: bool,
    ) -> Result<()> {
        ObsClient::set_scene_item_enabled(self, scene_name, item_id, enabled).await
    }
}
