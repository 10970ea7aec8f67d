//! mDNS advertisement of the bridge as `_stagehand._tcp.local.`, so phones
//! on the same network can find it without typing an address.

use std::collections::HashMap;
use std::sync::Mutex;

use mdns_sd::{ServiceDaemon, ServiceInfo};
use tracing::{error, info};

use crate::error::{BridgeError, Result};

pub const SERVICE_TYPE: &str = "_stagehand._tcp.local.";

pub struct BridgeAdvertiser {
    daemon: ServiceDaemon,
    /// Fullnames we have registered, so `stop` can withdraw them.
    registrations: Mutex<Vec<String>>,
}

impl BridgeAdvertiser {
    pub fn new() -> Result<Self> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| BridgeError::Discovery(format!("Could not start the mDNS daemon: {e}")))?;
        Ok(Self {
            daemon,
            registrations: Mutex::new(Vec::new()),
        })
    }

    /// Advertise the bridge under `instance_name` on `port`. Addresses are
    /// filled in by the daemon (`enable_addr_auto`), which tracks interface
    /// changes for us.
    pub fn advertise(&self, instance_name: &str, port: u16) -> Result<()> {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "stagehand".to_string());
        let host_name = format!("{host}.local.");

        let mut properties = HashMap::<String, String>::new();
        properties.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());

        let info = ServiceInfo::new(SERVICE_TYPE, instance_name, &host_name, "", port, properties)
            .map_err(|e| BridgeError::Discovery(format!("Invalid mDNS service info: {e}")))?
            .enable_addr_auto();
        let fullname = info.get_fullname().to_string();

        match self.daemon.register(info) {
            Ok(_) => {
                info!("Advertising {fullname} on port {port}");
                self.registrations.lock().unwrap().push(fullname);
                Ok(())
            }
            Err(e) => Err(BridgeError::Discovery(format!(
                "Could not register the mDNS service: {e}"
            ))),
        }
    }

    /// Withdraw every advertisement this instance registered.
    pub fn stop(&self) -> Result<()> {
        let fullnames: Vec<String> = self.registrations.lock().unwrap().drain(..).collect();
        for fullname in fullnames {
            match self.daemon.unregister(&fullname) {
                Ok(_) => info!("Withdrew mDNS advertisement {fullname}"),
                Err(e) => error!("Could not unregister {fullname}: {e}"),
            }
        }
        Ok(())
    }
}
