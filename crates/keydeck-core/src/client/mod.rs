pub mod config;
pub mod connection;
pub mod types;

pub use config::{Endpoint, DEFAULT_PORT};
pub use connection::RemoteClient;
pub use types::{ClientError, ConnectionEvent, ConnectionStatus, RECONNECT_DELAY};
