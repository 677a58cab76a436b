use serde::{Deserialize, Serialize};

/// Status of the workstation connection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// Not connected.
    Disconnected,
    /// Attempting to connect — the initial attempt or a scheduled retry.
    Connecting,
    /// Session channel is open.
    Connected,
    /// Initial connection attempt failed; only a new connect() recovers.
    Error(String),
}

/// Events surfaced to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    StatusChanged(ConnectionStatus),
    /// One-shot user-facing notice (connectivity problems, send failures).
    Notice(String),
}

/// Device-side errors. All of these are surfaced to the user; none are
/// fatal to the app.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("not connected")]
    NotConnected,
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Delay between reconnect attempts after an unexpected loss. Fixed, no
/// backoff growth, no attempt cap — sized for a local-network tool.
pub const RECONNECT_DELAY: std::time::Duration = std::time::Duration::from_secs(2);
