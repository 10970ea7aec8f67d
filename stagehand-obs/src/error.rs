use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObsError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(String),

    #[error("Invalid OBS WebSocket url: {0}")]
    InvalidEndpoint(String),

    #[error("Not connected to OBS")]
    NotConnected,
}

pub type Result<T> = std::result::Result<T, ObsError>;
