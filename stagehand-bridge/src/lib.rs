//! stagehand-bridge
//!
//! The LAN-facing half of Stagehand: an HTTP server that fronts a local
//! OBS instance (scene switching, scene item toggles, audio mute) for
//! phones on the same network, plus config persistence for the OBS
//! connection and mDNS advertisement so clients can find the bridge.

pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod net;

pub use error::{BridgeError, Result};

/// Default TCP port of the bridge.
pub const DEFAULT_PORT: u16 = 17800;
