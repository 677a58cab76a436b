use crate::client::config::Endpoint;
use crate::client::types::{ClientError, ConnectionEvent, ConnectionStatus, RECONNECT_DELAY};
use crate::commands::Command;
use crate::wire::DeviceMessage;

use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio_tungstenite::tungstenite;

/// Device-side connection manager.
///
/// Owns the session task for exactly one logical connection. The
/// presentation layer drives it through explicit configure / connect /
/// disconnect / send calls and observes it through [`status`] and the
/// event channel handed to [`new`].
///
/// [`status`]: RemoteClient::status
/// [`new`]: RemoteClient::new
pub struct RemoteClient {
    endpoint: Option<Endpoint>,
    status: Arc<RwLock<ConnectionStatus>>,
    /// Device-local catalog copy; pushed in full on every (re)connect and
    /// on every change.
    commands: Arc<RwLock<Vec<Command>>>,
    runtime: Arc<tokio::runtime::Runtime>,
    event_tx: async_channel::Sender<ConnectionEvent>,
    ws_tx: Option<async_channel::Sender<DeviceMessage>>,
    session_abort: Option<tokio::task::AbortHandle>,
}

impl RemoteClient {
    pub fn new(
        runtime: Arc<tokio::runtime::Runtime>,
        event_tx: async_channel::Sender<ConnectionEvent>,
    ) -> Self {
        Self {
            endpoint: None,
            status: Arc::new(RwLock::new(ConnectionStatus::Disconnected)),
            commands: Arc::new(RwLock::new(Vec::new())),
            runtime,
            event_tx,
            ws_tx: None,
            session_abort: None,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.read().clone()
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Store the target address. Does not connect.
    pub fn configure(&mut self, address: &str) -> Result<(), ClientError> {
        self.endpoint = Some(Endpoint::parse(address)?);
        Ok(())
    }

    /// Replace the device-local catalog. When a session is open the full
    /// set is pushed immediately, visibility flags included.
    pub fn set_commands(&mut self, commands: Vec<Command>) {
        *self.commands.write() = commands;
        if self.status() == ConnectionStatus::Connected {
            if let Some(tx) = &self.ws_tx {
                let sync = DeviceMessage::command_list(&self.commands.read());
                if tx.try_send(sync).is_err() {
                    log::warn!("command sync not queued; session channel unavailable");
                }
            }
        }
    }

    /// Open a connection to the configured endpoint. Any live session is
    /// torn down first — clean replacement, never layered connections.
    pub fn connect(&mut self) -> Result<(), ClientError> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| ClientError::InvalidAddress("no address configured".into()))?;
        self.teardown();
        self.set_status(ConnectionStatus::Connecting);

        let (ws_tx, ws_rx) = async_channel::bounded::<DeviceMessage>(256);
        self.ws_tx = Some(ws_tx);

        let task = self.runtime.spawn(run_session_loop(
            endpoint,
            self.status.clone(),
            self.commands.clone(),
            self.event_tx.clone(),
            ws_rx,
        ));
        self.session_abort = Some(task.abort_handle());
        Ok(())
    }

    /// Close the active connection. Calling this with nothing open is a
    /// reported no-op error, never a crash.
    pub fn disconnect(&mut self) -> Result<(), ClientError> {
        if self.session_abort.is_none() {
            return Err(ClientError::NotConnected);
        }
        self.teardown();
        self.set_status(ConnectionStatus::Disconnected);
        Ok(())
    }

    /// Queue a run request for the command with the given id. Requires an
    /// open session; the caller surfaces the error to the user and an
    /// explicit user action re-triggers it — no automatic retry.
    pub fn send_command(&mut self, id: &str) -> Result<(), ClientError> {
        if self.status() != ConnectionStatus::Connected {
            return Err(ClientError::NotConnected);
        }
        let tx = self.ws_tx.as_ref().ok_or(ClientError::NotConnected)?;
        tx.try_send(DeviceMessage::Run { id: id.to_string() })
            .map_err(|_| ClientError::ConnectionFailed("session channel closed".into()))
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.session_abort.take() {
            handle.abort();
        }
        if let Some(tx) = self.ws_tx.take() {
            tx.close();
        }
    }

    fn set_status(&self, status: ConnectionStatus) {
        *self.status.write() = status.clone();
        let _ = self
            .event_tx
            .try_send(ConnectionEvent::StatusChanged(status));
    }
}

impl Drop for RemoteClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// One logical connection lifetime: the initial attempt, the open session,
/// and the fixed-delay retry loop after an unexpected loss. Runs until the
/// handle aborts it (explicit disconnect) or the initial attempt fails.
async fn run_session_loop(
    endpoint: Endpoint,
    status: Arc<RwLock<ConnectionStatus>>,
    commands: Arc<RwLock<Vec<Command>>>,
    event_tx: async_channel::Sender<ConnectionEvent>,
    ws_rx: async_channel::Receiver<DeviceMessage>,
) {
    let mut established = false;
    loop {
        match run_session(&endpoint, &status, &commands, &event_tx, &ws_rx, &mut established)
            .await
        {
            Err(e) if !established => {
                log::warn!("connection to {endpoint} failed: {e}");
                publish(&status, &event_tx, ConnectionStatus::Error(e.to_string())).await;
                let _ = event_tx
                    .send(ConnectionEvent::Notice(format!("Connection failed: {e}")))
                    .await;
                return;
            }
            Err(e) => {
                log::warn!(
                    "connection to {endpoint} lost: {e}; reconnecting in {}s",
                    RECONNECT_DELAY.as_secs()
                );
                publish(&status, &event_tx, ConnectionStatus::Connecting).await;
                let _ = event_tx
                    .send(ConnectionEvent::Notice(
                        "Connection lost, retrying".to_string(),
                    ))
                    .await;
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
            Ok(()) => return,
        }
    }
}

/// A single WebSocket session. Returns Err when the transport drops; the
/// caller decides between surfacing an error and scheduling a retry.
async fn run_session(
    endpoint: &Endpoint,
    status: &Arc<RwLock<ConnectionStatus>>,
    commands: &Arc<RwLock<Vec<Command>>>,
    event_tx: &async_channel::Sender<ConnectionEvent>,
    ws_rx: &async_channel::Receiver<DeviceMessage>,
    established: &mut bool,
) -> Result<(), ClientError> {
    let url = endpoint.url();
    let (ws_stream, _response) = tokio_tungstenite::connect_async(&url)
        .await
        .map_err(|e| ClientError::ConnectionFailed(format!("WebSocket connect failed: {e}")))?;
    let (mut ws_write, mut ws_read) = ws_stream.split();

    // Push the full catalog before anything else so the server never
    // operates on a stale registry from a previous session.
    let sync = DeviceMessage::command_list(&commands.read());
    ws_write
        .send(tungstenite::Message::Text(sync.encode().into()))
        .await
        .map_err(|e| ClientError::ConnectionFailed(format!("initial sync failed: {e}")))?;

    *established = true;
    log::info!("connected to {endpoint}");
    publish(status, event_tx, ConnectionStatus::Connected).await;

    loop {
        tokio::select! {
            queued = ws_rx.recv() => {
                match queued {
                    Ok(message) => {
                        ws_write
                            .send(tungstenite::Message::Text(message.encode().into()))
                            .await
                            .map_err(|e| {
                                ClientError::ConnectionFailed(format!("send failed: {e}"))
                            })?;
                    }
                    // Handle dropped the queue; the session is over.
                    Err(_) => return Ok(()),
                }
            }
            frame = ws_read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        // No server-to-device kinds are defined yet.
                        log::debug!("ignoring server message: {text}");
                    }
                    Some(Ok(tungstenite::Message::Close(_))) => {
                        return Err(ClientError::ConnectionFailed(
                            "server closed the connection".into(),
                        ));
                    }
                    Some(Ok(_)) => {} // binary, ping, pong
                    Some(Err(e)) => {
                        return Err(ClientError::ConnectionFailed(format!(
                            "WebSocket error: {e}"
                        )));
                    }
                    None => {
                        return Err(ClientError::ConnectionFailed(
                            "connection closed".into(),
                        ));
                    }
                }
            }
        }
    }
}

async fn publish(
    status: &Arc<RwLock<ConnectionStatus>>,
    event_tx: &async_channel::Sender<ConnectionEvent>,
    next: ConnectionStatus,
) {
    {
        let mut current = status.write();
        if *current == next {
            return;
        }
        *current = next.clone();
    }
    let _ = event_tx.send(ConnectionEvent::StatusChanged(next)).await;
}
