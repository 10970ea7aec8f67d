use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use stagehand_bridge::net;
use stagehand_server::{init_tracing, launch, resolve_webroot, BridgeOptions};

#[derive(Parser, Debug, Clone)]
#[command(name = "stagehand-server")]
#[command(author, version, about = "LAN bridge for remote-controlling OBS from a phone")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Port for the bridge HTTP server
    #[arg(long, default_value_t = stagehand_bridge::DEFAULT_PORT)]
    port: u16,

    /// Config file path (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the web UI files
    #[arg(long)]
    webroot: Option<PathBuf>,

    /// Instance name used for the mDNS advertisement
    #[arg(long, default_value = "Stagehand")]
    service_name: String,

    /// Disable mDNS advertisement
    #[arg(long, default_value = "false")]
    no_mdns: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    info!(
        "Stagehand starting. bind={}, port={}, mdns={}",
        args.bind, args.port, !args.no_mdns
    );

    if let Err(e) = run_server(args).await {
        error!("Server error: {e:?}");
    }
    info!("Stagehand stopped. Goodbye!");
    Ok(())
}

async fn run_server(args: Args) -> anyhow::Result<()> {
    let port = args.port;
    let bridge = launch(BridgeOptions {
        bind: args.bind,
        port,
        config_path: args.config,
        webroot: resolve_webroot(args.webroot),
        service_name: args.service_name,
        mdns: !args.no_mdns,
    })
    .await?;

    info!("Bridge ready on http://{}", bridge.addr);
    for ip in net::lan_ipv4_addrs() {
        info!("  reachable on the LAN at http://{ip}:{port}");
    }

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C detected; shutting down...");
    bridge.shutdown().await;
    Ok(())
}
