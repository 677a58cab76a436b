use crate::host::EditorHost;
use crate::remote::routes;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::watch;

/// Listener configuration. The port is fixed by convention; tests pass 0
/// for an ephemeral one.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: IpAddr,
    pub port: u16,
}

/// Default port devices expect on the local network.
pub const DEFAULT_PORT: u16 = 8080;

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Handle to a running listener.
/// Dropping this will trigger shutdown.
pub struct RemoteServer {
    shutdown_tx: watch::Sender<bool>,
    runtime: Option<tokio::runtime::Runtime>,
    port: u16,
}

impl RemoteServer {
    /// Start the listener on a background tokio runtime. Fails when the
    /// configured port cannot be bound.
    pub fn start(config: &ServerConfig, host: Arc<dyn EditorHost>) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("keydeck-remote")
            .build()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let addr = SocketAddr::new(config.listen_addr, config.port);
        let listener = runtime.block_on(tokio::net::TcpListener::bind(addr))?;
        let port = listener.local_addr()?.port();
        log::info!(
            "remote command listener on {}:{}",
            config.listen_addr,
            port
        );

        let start_time = std::time::Instant::now();

        runtime.spawn(async move {
            let app = routes::build_router(host, start_time);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(shutdown_rx))
                .await
                .ok();

            log::info!("remote command listener shut down");
        });

        Ok(Self {
            shutdown_tx,
            runtime: Some(runtime),
            port,
        })
    }

    /// Get the port the listener is bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop the listener gracefully.
    pub fn stop(&mut self) {
        let _ = self.shutdown_tx.send(true);

        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(std::time::Duration::from_secs(5));
        }

        log::info!("remote command listener stopped");
    }
}

impl Drop for RemoteServer {
    fn drop(&mut self) {
        if self.runtime.is_some() {
            self.stop();
        }
    }
}

/// Wait until the shutdown signal is received.
async fn shutdown_signal(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            break;
        }
    }
}
