//! The client facade composing the command and event channels.
//!
//! A [`SwayClient`] owns one command connection (opened at construction)
//! and one lazily created event connection, each driven by its own
//! background task. Callers interact only through `send`, `subscribe`,
//! `unsubscribe` and `shutdown`; all socket I/O happens on the channel
//! workers.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::{Mutex, oneshot};

use crate::error::{Result, SwaylinkError};
use crate::ipc::command::{CommandChannel, ResponseHandler};
use crate::ipc::events::{EventChannel, EventHandler};
use crate::ipc::protocol::{CommandKind, EventKind};
use crate::models::workspace::{CommandOutcome, OutputInfo, Version, Workspace};
use crate::services::socket_path;

/// Client for a running compositor's IPC socket.
///
/// # Example
///
/// ```ignore
/// use swaylink::{CommandKind, SwayClient};
///
/// let client = SwayClient::connect().await?;
/// let workspaces = client.workspaces().await?;
/// client.shutdown().await;
/// ```
pub struct SwayClient {
    socket_path: PathBuf,
    command: CommandChannel,
    events: Mutex<EventChannel>,
    closed: AtomicBool,
}

impl SwayClient {
    /// Resolve the compositor socket and connect the command channel.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the socket path cannot be resolved and
    /// `Connection` if the socket cannot be connected to. Both surface here,
    /// synchronously, never from inside a handler.
    pub async fn connect() -> Result<Self> {
        Self::connect_to(socket_path::socket_path()?).await
    }

    /// Connect to a compositor socket at a known path.
    pub async fn connect_to(socket_path: impl Into<PathBuf>) -> Result<Self> {
        let socket_path = socket_path.into();
        let command = CommandChannel::connect(&socket_path).await?;

        Ok(Self {
            socket_path,
            command,
            events: Mutex::new(EventChannel::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Enqueue a one-shot command. Never blocks; the handler is invoked on
    /// the command worker with the decoded response.
    ///
    /// # Errors
    ///
    /// Returns `ClientClosed` after `shutdown()`, or `Connection` if the
    /// command connection has failed.
    pub fn send(
        &self,
        kind: CommandKind,
        payload: impl Into<String>,
        handler: ResponseHandler,
    ) -> Result<()> {
        self.ensure_open()?;
        self.command.submit(kind, payload, handler)
    }

    /// Subscribe to a set of event kinds, replacing any active
    /// subscription. The SUBSCRIBE handshake completes before this returns;
    /// rejection surfaces here as `Subscription`, and the event loop is
    /// only started on success.
    pub async fn subscribe(&self, kinds: &[EventKind], handler: EventHandler) -> Result<()> {
        self.ensure_open()?;
        self.events
            .lock()
            .await
            .subscribe(&self.socket_path, kinds, handler)
            .await
    }

    /// Cancel the active subscription, if any. Cooperative: the event loop
    /// keeps running for up to one read-timeout period after this returns.
    pub async fn unsubscribe(&self) {
        self.events.lock().await.unsubscribe();
    }

    /// Stop both channels and release both sockets. Idempotent and safe to
    /// call from any thread; afterwards `send` and `subscribe` fail with
    /// `ClientClosed`.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.command.stop().await;
        self.events.lock().await.stop().await;
    }

    /// Send one command and await its decoded response.
    ///
    /// A convenience over [`send`](Self::send) for request/response callers
    /// that have no long-lived handler.
    pub async fn request(
        &self,
        kind: CommandKind,
        payload: impl Into<String>,
    ) -> Result<(CommandKind, Value)> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(
            kind,
            payload,
            Box::new(move |kind, payload| {
                let _ = reply_tx.send((kind, payload));
            }),
        )?;
        reply_rx.await.map_err(|_| {
            SwaylinkError::Connection(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "command connection went down before a response arrived",
            ))
        })
    }

    /// Fetch the current workspace list.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>> {
        let (_, payload) = self.request(CommandKind::GetWorkspaces, "").await?;
        parse(payload, "GET_WORKSPACES")
    }

    /// Fetch the current output list.
    pub async fn outputs(&self) -> Result<Vec<OutputInfo>> {
        let (_, payload) = self.request(CommandKind::GetOutputs, "").await?;
        parse(payload, "GET_OUTPUTS")
    }

    /// Fetch the compositor version.
    pub async fn version(&self) -> Result<Version> {
        let (_, payload) = self.request(CommandKind::GetVersion, "").await?;
        parse(payload, "GET_VERSION")
    }

    /// Run a compositor command (e.g. `workspace 2`) and return the
    /// per-entry outcomes.
    pub async fn run_command(&self, command: impl Into<String>) -> Result<Vec<CommandOutcome>> {
        let (_, payload) = self.request(CommandKind::RunCommand, command).await?;
        parse(payload, "RUN_COMMAND")
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SwaylinkError::ClientClosed);
        }
        Ok(())
    }
}

fn parse<T: serde::de::DeserializeOwned>(payload: Value, what: &str) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| SwaylinkError::Protocol(format!("unexpected {} response shape: {}", what, e)))
}
