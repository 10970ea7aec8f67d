//! Wiring shared by the two Stagehand binaries: load the stored OBS
//! settings, stand up the OBS handle, start the HTTP bridge, advertise it
//! over mDNS, and tear all of it down again in order.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use stagehand_bridge::config;
use stagehand_bridge::discovery::BridgeAdvertiser;
use stagehand_bridge::http::{self, BridgeState};
use stagehand_obs::{ObsClient, ObsGateway};

pub struct BridgeOptions {
    pub bind: String,
    pub port: u16,
    pub config_path: Option<PathBuf>,
    pub webroot: Option<PathBuf>,
    pub service_name: String,
    pub mdns: bool,
}

/// A started bridge. Dropping it leaves the server running; call
/// [`RunningBridge::shutdown`] for an orderly stop.
pub struct RunningBridge {
    pub addr: SocketAddr,
    pub obs: Arc<ObsClient>,
    handle: axum_server::Handle,
    task: JoinHandle<()>,
    advertiser: Option<BridgeAdvertiser>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

/// Find the web UI directory: an explicit flag wins, then `webroot/` next
/// to the executable (packaged installs), then the in-tree location used
/// during development.
pub fn resolve_webroot(flag: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = flag {
        if path.is_dir() {
            return Some(path);
        }
        warn!("--webroot {} is not a directory", path.display());
        return None;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let packaged = dir.join("webroot");
            if packaged.is_dir() {
                return Some(packaged);
            }
        }
    }

    let dev = PathBuf::from("stagehand-bridge/webroot");
    if dev.is_dir() {
        return Some(dev);
    }

    warn!("No web UI directory found; serving the API only");
    None
}

pub async fn launch(opts: BridgeOptions) -> anyhow::Result<RunningBridge> {
    // 1) Work out where the config lives and load it.
    let config_path = match opts.config_path {
        Some(path) => path,
        None => {
            config::default_config_path().context("Could not determine a config directory")?
        }
    };
    let settings = config::load_or_default(&config_path);

    // 2) Stand up the OBS handle. Connecting here is best effort: OBS may
    //    not be running yet, and every operation reconnects on demand.
    let obs = Arc::new(ObsClient::new(settings));
    match obs.connect().await {
        Ok(()) => match obs.version().await {
            Ok(version) => info!("Connected: {version}"),
            Err(e) => warn!("Connected to OBS but the version query failed: {e}"),
        },
        Err(e) => warn!("OBS is not reachable yet ({e}); will keep retrying on demand"),
    }

    // 3) Start the HTTP bridge.
    let addr: SocketAddr = format!("{}:{}", opts.bind, opts.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", opts.bind, opts.port))?;
    let gateway: Arc<dyn ObsGateway> = obs.clone();
    let state = BridgeState::new(gateway, config_path, opts.webroot);
    let (handle, task) = http::start(state, addr).await?;

    // 4) Advertise over mDNS unless disabled. Failure is not fatal; the
    //    bridge still works by typed-in address.
    let advertiser = if opts.mdns {
        match BridgeAdvertiser::new() {
            Ok(adv) => match adv.advertise(&opts.service_name, opts.port) {
                Ok(()) => Some(adv),
                Err(e) => {
                    warn!("mDNS advertisement failed: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("mDNS daemon unavailable: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(RunningBridge {
        addr,
        obs,
        handle,
        task,
        advertiser,
    })
}

impl RunningBridge {
    /// Withdraw mDNS, close the OBS socket, then drain the HTTP server.
    pub async fn shutdown(self) {
        if let Some(advertiser) = &self.advertiser {
            if let Err(e) = advertiser.stop() {
                warn!("mDNS shutdown error: {e}");
            }
        }
        if let Err(e) = self.obs.disconnect().await {
            warn!("OBS disconnect error: {e}");
        }
        self.handle.graceful_shutdown(Some(Duration::from_secs(3)));
        let _ = self.task.await;
    }
}
