//! Shared types for the keydeck remote command channel: the command model,
//! the session protocol, and (behind the `client` feature) the device-side
//! connection manager.

pub mod commands;
pub mod wire;

#[cfg(feature = "client")]
pub mod client;
