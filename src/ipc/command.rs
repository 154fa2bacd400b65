//! The command side of the client: one persistent connection, a FIFO queue,
//! and a dispatch worker.
//!
//! Callers enqueue `(kind, payload, handler)` tuples with
//! [`CommandChannel::submit`], which never blocks. A single worker task
//! drains the queue,
//! writes one frame, performs a blocking read of exactly one response frame
//! on the same connection, and invokes the handler with the decoded payload.
//! The protocol is strictly half-duplex request/response on this connection,
//! so requests are served one at a time and submission order is preserved
//! end-to-end.

use std::io;
use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use tokio::net::UnixStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{Result, SwaylinkError};
use crate::ipc::protocol::{self, CommandKind, MessageType};

/// Bounded wait on the queue, so a stop signal is observed promptly instead
/// of parking forever on an empty queue.
pub const QUEUE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Callback invoked on the dispatch worker with a decoded command response.
///
/// Handlers run on the worker task, not the submitting task. A handler that
/// touches single-threaded state (e.g. a UI widget tree) must marshal that
/// work onto its owner's event loop itself.
pub type ResponseHandler = Box<dyn FnOnce(CommandKind, Value) + Send + 'static>;

/// One queued command awaiting dispatch.
struct PendingRequest {
    kind: CommandKind,
    payload: String,
    handler: ResponseHandler,
}

/// Handle to the command connection and its dispatch worker.
pub struct CommandChannel {
    queue: mpsc::UnboundedSender<PendingRequest>,
    stop_tx: watch::Sender<bool>,
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl CommandChannel {
    /// Connect to the compositor socket and start the dispatch worker.
    pub async fn connect(socket_path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(socket_path).await?;
        let (queue, requests) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let worker = tokio::spawn(dispatch_worker(stream, requests, stop_rx));

        Ok(Self {
            queue,
            stop_tx,
            worker: tokio::sync::Mutex::new(Some(worker)),
        })
    }

    /// Enqueue a command. Returns immediately; the handler is invoked later
    /// on the worker task with the decoded response.
    ///
    /// # Errors
    ///
    /// Returns `Connection` if the dispatch worker has exited, which happens
    /// only after a socket-level failure. The client should be recreated.
    pub fn submit(
        &self,
        kind: CommandKind,
        payload: impl Into<String>,
        handler: ResponseHandler,
    ) -> Result<()> {
        let request = PendingRequest {
            kind,
            payload: payload.into(),
            handler,
        };
        self.queue.send(request).map_err(|_| {
            SwaylinkError::Connection(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "command connection is down",
            ))
        })
    }

    /// Signal the worker to exit after its current poll window and wait for
    /// it to finish. Queued requests that were not yet served are dropped;
    /// their handlers are never invoked. The connection closes with the
    /// worker.
    pub async fn stop(&self) {
        let _ = self.stop_tx.send(true);
        if let Some(worker) = self.worker.lock().await.take() {
            let _ = worker.await;
        }
    }
}

/// Drains the queue: write one frame, read one response, invoke the handler.
async fn dispatch_worker(
    mut stream: UnixStream,
    mut requests: mpsc::UnboundedReceiver<PendingRequest>,
    stop_rx: watch::Receiver<bool>,
) {
    loop {
        if *stop_rx.borrow() {
            debug!("command worker stopping");
            return;
        }

        let request = match timeout(QUEUE_POLL_INTERVAL, requests.recv()).await {
            // Poll window elapsed with nothing queued; loop to re-check stop.
            Err(_) => continue,
            // All senders dropped.
            Ok(None) => return,
            Ok(Some(request)) => request,
        };

        if let Err(e) = serve_one(&mut stream, request).await {
            warn!(error = %e, "command connection failed, worker exiting");
            return;
        }
    }
}

/// One request/response exchange. Protocol-level decode failures are
/// recovered here (the frame is dropped and logged, leaving the stream
/// aligned on the next frame); connection-level failures propagate and end
/// the worker.
async fn serve_one(stream: &mut UnixStream, request: PendingRequest) -> Result<()> {
    protocol::write_message(stream, request.kind.code(), &request.payload).await?;

    let frame = protocol::read_frame(stream).await?;
    match protocol::decode_payload(&frame) {
        Ok((MessageType::Command(kind), payload)) => {
            (request.handler)(kind, payload);
        }
        Ok((MessageType::Event(kind), _)) => {
            warn!(event = %kind, "dropping event frame on the command connection");
        }
        Err(e) => {
            warn!(error = %e, "dropping undecodable response frame");
        }
    }
    Ok(())
}
