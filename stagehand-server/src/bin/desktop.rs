//! Desktop entry point: runs the bridge in-process and opens the pairing
//! dashboard in the default browser, so a streamer can get their phone
//! connected without touching a terminal.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, warn};

use stagehand_bridge::net;
use stagehand_server::{init_tracing, launch, resolve_webroot, BridgeOptions};

#[derive(Parser, Debug, Clone)]
#[command(name = "stagehand-desktop")]
#[command(author, version, about = "Stagehand bridge with a browser dashboard")]
struct Args {
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

    /// Do not open the dashboard in a browser
    #[arg(long, default_value = "false")]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run_desktop(args).await {
        error!("Desktop error: {e:?}");
    }
    Ok(())
}

async fn run_desktop(args: Args) -> anyhow::Result<()> {
    let port = args.port;
    let bridge = launch(BridgeOptions {
        // Phones must be able to reach us, so bind every interface.
        bind: "0.0.0.0".to_string(),
        port,
        config_path: args.config,
        webroot: resolve_webroot(args.webroot),
        service_name: args.service_name,
        mdns: !args.no_mdns,
    })
    .await?;

    let ips = net::lan_ipv4_addrs();
    let url = dashboard_url(port, &ips);
    info!("Dashboard: {url}");
    if !args.no_open {
        if let Err(err) = open::that(&url) {
            warn!("Could not open a browser ({err}); open it manually: {url}");
        }
    }

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C detected; shutting down...");
    bridge.shutdown().await;
    Ok(())
}

/// The dashboard reads the LAN addresses from its query string, so the
/// page itself stays static.
fn dashboard_url(port: u16, ips: &[Ipv4Addr]) -> String {
    let ip_list = ips
        .iter()
        .map(|ip| ip.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("http://127.0.0.1:{port}/dashboard?ips={ip_list}&port={port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_url_lists_every_lan_ip() {
        let ips = [Ipv4Addr::new(192, 168, 1, 20), Ipv4Addr::new(10, 0, 0, 5)];
        assert_eq!(
            dashboard_url(17800, &ips),
            "http://127.0.0.1:17800/dashboard?ips=192.168.1.20,10.0.0.5&port=17800"
        );
    }

    #[test]
    fn dashboard_url_with_no_lan() {
        assert_eq!(
            dashboard_url(17800, &[]),
            "http://127.0.0.1:17800/dashboard?ips=&port=17800"
        );
    }
}
