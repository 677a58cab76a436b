pub mod dispatch;
pub mod registry;
pub mod routes;
pub mod server;

use crate::host::EditorHost;
use crate::remote::server::{RemoteServer, ServerConfig};
use parking_lot::Mutex;
use std::sync::Arc;

/// Renders the listener's run state to whatever the embedding editor
/// provides — a status-bar dot, a tray icon.
pub trait StatusIndicator: Send + Sync {
    fn set_running(&self, running: bool);
}

/// Shared listener status, readable from any thread/view.
#[derive(Clone, Default)]
pub struct ServerStatus {
    inner: Arc<Mutex<Option<u16>>>,
}

impl ServerStatus {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_active(&self, port: u16) {
        *self.inner.lock() = Some(port);
    }

    fn set_inactive(&self) {
        *self.inner.lock() = None;
    }

    /// Returns the bound port while the listener is running.
    pub fn port(&self) -> Option<u16> {
        *self.inner.lock()
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().is_some()
    }
}

/// Owns the listener lifecycle and mirrors it to the indicator. Starting
/// when already running and stopping when already stopped are safe no-ops.
pub struct ServerController {
    config: ServerConfig,
    host: Arc<dyn EditorHost>,
    indicator: Arc<dyn StatusIndicator>,
    status: ServerStatus,
    server: Option<RemoteServer>,
}

impl ServerController {
    pub fn new(
        config: ServerConfig,
        host: Arc<dyn EditorHost>,
        indicator: Arc<dyn StatusIndicator>,
    ) -> Self {
        indicator.set_running(false);
        Self {
            config,
            host,
            indicator,
            status: ServerStatus::new(),
            server: None,
        }
    }

    pub fn status(&self) -> ServerStatus {
        self.status.clone()
    }

    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    /// Start the listener; no-op when already running.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.server.is_some() {
            log::debug!("listener already running");
            return Ok(());
        }
        let server = RemoteServer::start(&self.config, self.host.clone())?;
        self.status.set_active(server.port());
        self.server = Some(server);
        self.indicator.set_running(true);
        Ok(())
    }

    /// Stop the listener; no-op when already stopped.
    pub fn stop(&mut self) {
        let Some(mut server) = self.server.take() else {
            log::debug!("listener already stopped");
            return;
        };
        server.stop();
        self.status.set_inactive();
        self.indicator.set_running(false);
    }

    /// Flip the run state — the status-bar click action.
    pub fn toggle(&mut self) -> anyhow::Result<()> {
        if self.server.is_some() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }
}
