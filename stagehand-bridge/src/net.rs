use std::net::{IpAddr, Ipv4Addr};

use tracing::warn;

/// Routable IPv4 addresses of this machine, loopback excluded. These feed
/// the dashboard pairing URLs; mDNS derives its own address set.
pub fn lan_ipv4_addrs() -> Vec<Ipv4Addr> {
    match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces
            .into_iter()
            .filter(|iface| !iface.is_loopback())
            .filter_map(|iface| match iface.ip() {
                IpAddr::V4(addr) => Some(addr),
                IpAddr::V6(_) => None,
            })
            .collect(),
        Err(e) => {
            warn!("Could not enumerate network interfaces: {e}");
            Vec::new()
        }
    }
}
