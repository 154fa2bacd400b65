//! The event side of the client: a dedicated subscription connection.
//!
//! A subscription opens its own connection (separate from the command
//! connection), performs the SUBSCRIBE handshake synchronously, then hands
//! the stream to a read-loop task. The loop reads with a short timeout used
//! purely for cooperative cancellation: [`EventChannel::unsubscribe`] only
//! sets a flag, and the loop observes it within one timeout period.
//!
//! Reads accumulate into a buffer and frames are decoded from it, so an
//! elapsed timeout never discards a partially received frame.

use std::path::Path;
use std::time::Duration;

use bytes::BytesMut;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::net::UnixStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{Result, SwaylinkError};
use crate::ipc::protocol::{self, CommandKind, EventKind, MessageType};

/// Read timeout on the event connection. Cancellation is cooperative and
/// bounded by this: after `unsubscribe()`, the loop keeps running for at
/// most one timeout period before exiting.
pub const EVENT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Callback invoked on the event-loop task for every received event.
///
/// Runs on the loop task, not the subscriber's. Handlers that mutate UI
/// state must post that work to their own scheduler.
pub type EventHandler = Box<dyn FnMut(EventKind, Value) + Send + 'static>;

/// Handle to the running read loop of one subscription.
struct Subscription {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// The event connection manager. At most one subscription is active per
/// instance; subscribing again replaces the previous one.
pub struct EventChannel {
    subscription: Option<Subscription>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self { subscription: None }
    }

    /// Subscribe to a set of event kinds.
    ///
    /// Opens a fresh connection, sends SUBSCRIBE with the kinds' canonical
    /// names as a JSON array, and synchronously awaits the reply. Only once
    /// the compositor has confirmed the subscription does the read loop
    /// start. A previously running loop is stopped (and awaited) first, so
    /// two readers never race on one socket.
    ///
    /// # Errors
    ///
    /// Returns `Subscription` if the reply's `success` field is false or
    /// absent, or if the reply is not a SUBSCRIBE response at all.
    /// Connection and handshake-decode failures surface as their own error
    /// kinds. In every error case the read loop is not started.
    pub async fn subscribe(
        &mut self,
        socket_path: &Path,
        kinds: &[EventKind],
        handler: EventHandler,
    ) -> Result<()> {
        self.stop().await;

        let mut stream = UnixStream::connect(socket_path).await?;

        let names: Vec<&str> = kinds.iter().map(|kind| kind.name()).collect();
        let payload = serde_json::json!(names).to_string();
        protocol::write_message(&mut stream, CommandKind::Subscribe.code(), &payload).await?;

        let (message_type, reply) = protocol::read_message(&mut stream).await?;
        if message_type != MessageType::Command(CommandKind::Subscribe) {
            return Err(SwaylinkError::Subscription(format!(
                "expected a subscribe reply, got {:?}",
                message_type
            )));
        }
        let success = reply
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            return Err(SwaylinkError::Subscription(format!(
                "compositor rejected subscription to [{}]",
                names.join(", ")
            )));
        }

        debug!(events = ?names, "subscription established");

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(event_loop(stream, handler, cancel_rx));
        self.subscription = Some(Subscription { cancel_tx, task });

        Ok(())
    }

    /// Set the cancellation flag. The socket is not force-closed; the read
    /// loop observes the flag on its own cadence, bounded by
    /// [`EVENT_READ_TIMEOUT`].
    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = &self.subscription {
            let _ = subscription.cancel_tx.send(true);
        }
    }

    /// Cancel the active subscription, if any, and wait for its loop to
    /// exit.
    pub async fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            let _ = subscription.cancel_tx.send(true);
            let _ = subscription.task.await;
        }
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads frames until cancelled or the connection fails. Event frames go to
/// the handler; anything else on this connection is dropped and logged.
async fn event_loop(
    mut stream: UnixStream,
    mut handler: EventHandler,
    cancel_rx: watch::Receiver<bool>,
) {
    let mut buf = BytesMut::with_capacity(4096);

    loop {
        if *cancel_rx.borrow() {
            debug!("event loop cancelled");
            return;
        }

        // Drain every complete frame already buffered before reading more.
        loop {
            match protocol::try_read_frame(&mut buf) {
                Ok(Some(frame)) => match protocol::decode_payload(&frame) {
                    Ok((MessageType::Event(kind), payload)) => handler(kind, payload),
                    Ok((MessageType::Command(kind), _)) => {
                        warn!(?kind, "dropping command frame on the event connection");
                    }
                    Err(e) => {
                        warn!(error = %e, "dropping undecodable event frame");
                    }
                },
                Ok(None) => break,
                Err(e) => {
                    // Header corruption; the stream is no longer aligned.
                    warn!(error = %e, "event stream desynchronized, loop exiting");
                    return;
                }
            }
        }

        match timeout(EVENT_READ_TIMEOUT, stream.read_buf(&mut buf)).await {
            // Timeout: nothing arrived this window, re-check the flag.
            Err(_) => continue,
            Ok(Ok(0)) => {
                debug!("event connection closed by compositor");
                return;
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "event connection read failed, loop exiting");
                return;
            }
        }
    }
}
