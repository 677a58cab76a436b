//! Workstation side of the keydeck remote command channel: the listener,
//! per-session command registries, and the dispatcher that turns run
//! requests into editor actions through a host-provided backend.

pub mod host;
pub mod remote;
