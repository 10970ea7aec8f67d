pub mod client;
pub mod error;
pub mod gateway;
pub mod models;

pub use client::ObsClient;
pub use error::{ObsError, Result};
pub use gateway::ObsGateway;
pub use models::*;
