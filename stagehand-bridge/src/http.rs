//! The REST surface phones talk to, plus static hosting for the bundled
//! web UI. Everything OBS-related goes through the `ObsGateway` handle in
//! `BridgeState`; OBS failures collapse to a generic 500 so the UI only
//! has to distinguish "worked" from "didn't".

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use axum_server::{Handle, Server};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use stagehand_obs::{AudioSource, ConnectionSettings, ObsError, ObsGateway, SceneItem};

use crate::config;
use crate::error::{BridgeError, Result};

/// Shared state for the Axum routes.
#[derive(Clone)]
pub struct BridgeState {
    pub obs: Arc<dyn ObsGateway>,
    pub config_path: PathBuf,
    pub webroot: Option<PathBuf>,
}

impl BridgeState {
    pub fn new(obs: Arc<dyn ObsGateway>, config_path: PathBuf, webroot: Option<PathBuf>) -> Self {
        Self {
            obs,
            config_path,
            webroot,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReply {
    status: &'static str,
    obs_connected: bool,
    web_ui: bool,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct StatusReply {
    status: &'static str,
}

impl StatusReply {
    fn ok() -> Self {
        Self { status: "ok" }
    }
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: &'static str,
}

#[derive(Debug, Serialize)]
struct AudioSourcesReply {
    sources: Vec<AudioSource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MuteRequest {
    source_name: String,
    muted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObsConfigRequest {
    port: u16,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ObsConfigReply {
    status: &'static str,
    obs_connected: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneRequest {
    scene_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneItemsQuery {
    scene_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SceneItemsReply {
    scene_name: String,
    items: Vec<SceneItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemToggleRequest {
    scene_name: String,
    item_id: i64,
    enabled: bool,
}

pub fn router(state: BridgeState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/audio-sources", get(list_audio_sources))
        .route("/api/mute", post(set_mute))
        .route("/api/obs-config", post(apply_obs_config))
        .route("/api/scenes", get(list_scenes))
        .route("/api/scene", post(set_scene))
        .route("/api/scene-items", get(list_scene_items))
        .route("/api/item-toggle", post(toggle_item))
        // Unknown API paths stay JSON instead of falling into the SPA.
        // `/api/` needs its own entry: the catch-all only matches a
        // non-empty remainder.
        .route("/api", any(api_not_found))
        .route("/api/", any(api_not_found))
        .route("/api/{*rest}", any(api_not_found));

    app = match &state.webroot {
        Some(root) => app
            .route_service("/dashboard", ServeFile::new(root.join("dashboard.html")))
            // `fallback`, not `not_found_service`: the latter rewrites the
            // status to 404, and deep links into the SPA must answer 200.
            .fallback_service(
                ServeDir::new(root).fallback(ServeFile::new(root.join("index.html"))),
            ),
        None => app.fallback(no_web_ui),
    };

    app.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    )
}

/// Bind `addr` and serve the bridge until the returned handle is shut
/// down. The `JoinHandle` resolves once the server has fully stopped.
pub async fn start(state: BridgeState, addr: SocketAddr) -> Result<(Handle, JoinHandle<()>)> {
    // Probe the port first; axum-server would only surface a bind error
    // inside the spawned task.
    let probe = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BridgeError::Http(format!("Cannot bind {addr}: {e}")))?;
    drop(probe);

    let app = router(state);
    let handle = Handle::new();
    let server = Server::bind(addr)
        .handle(handle.clone())
        .serve(app.into_make_service());

    let task = tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Bridge HTTP server error: {e}");
        }
        info!("Bridge HTTP server shut down");
    });

    info!("Bridge listening on http://{addr}");
    Ok((handle, task))
}

fn obs_failure(what: &str, err: ObsError) -> Response {
    error!("OBS request failed ({what}): {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorReply {
            error: "OBS request failed",
        }),
    )
        .into_response()
}

async fn health(State(state): State<BridgeState>) -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok",
        obs_connected: state.obs.is_connected().await,
        web_ui: state.webroot.is_some(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_audio_sources(State(state): State<BridgeState>) -> Response {
    match state.obs.list_audio_sources().await {
        Ok(sources) => Json(AudioSourcesReply { sources }).into_response(),
        Err(e) => obs_failure("audio sources", e),
    }
}

async fn set_mute(State(state): State<BridgeState>, Json(req): Json<MuteRequest>) -> Response {
    match state.obs.set_mute(&req.source_name, req.muted).await {
        Ok(()) => Json(StatusReply::ok()).into_response(),
        Err(e) => obs_failure("set mute", e),
    }
}

/// Point the bridge at a different local OBS. The settings are persisted
/// even when the reconnect fails (OBS may simply not be running yet); the
/// reply says whether a connection came up.
async fn apply_obs_config(
    State(state): State<BridgeState>,
    Json(req): Json<ObsConfigRequest>,
) -> Response {
    let settings = ConnectionSettings::for_local_port(req.port, req.password);

    if let Err(e) = config::save(&state.config_path, &settings) {
        error!("Could not save OBS settings: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorReply {
                error: "Could not save config",
            }),
        )
            .into_response();
    }

    let obs_connected = match state.obs.apply_settings(settings).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Saved new OBS settings but could not connect: {e}");
            false
        }
    };

    Json(ObsConfigReply {
        status: "ok",
        obs_connected,
    })
    .into_response()
}

async fn list_scenes(State(state): State<BridgeState>) -> Response {
    match state.obs.list_scenes().await {
        Ok(list) => Json(list).into_response(),
        Err(e) => obs_failure("scenes", e),
    }
}

async fn set_scene(State(state): State<BridgeState>, Json(req): Json<SceneRequest>) -> Response {
    match state.obs.set_current_scene(&req.scene_name).await {
        Ok(()) => Json(StatusReply::ok()).into_response(),
        Err(e) => obs_failure("set scene", e),
    }
}

async fn list_scene_items(
    State(state): State<BridgeState>,
    Query(query): Query<SceneItemsQuery>,
) -> Response {
    match state.obs.list_scene_items(&query.scene_name).await {
        Ok(items) => Json(SceneItemsReply {
            scene_name: query.scene_name,
            items,
        })
        .into_response(),
        Err(e) => obs_failure("scene items", e),
    }
}

async fn toggle_item(
    State(state): State<BridgeState>,
    Json(req): Json<ItemToggleRequest>,
) -> Response {
    match state
        .obs
        .set_scene_item_enabled(&req.scene_name, req.item_id, req.enabled)
        .await
    {
        Ok(()) => Json(StatusReply::ok()).into_response(),
        Err(e) => obs_failure("toggle item", e),
    }
}

async fn api_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorReply { error: "not found" }),
    )
        .into_response()
}

async fn no_web_ui() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorReply {
            error: "web ui not bundled",
        }),
    )
        .into_response()
}
