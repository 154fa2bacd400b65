use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwaylinkError {
    /// The compositor socket path could not be resolved from the environment
    /// or the discovery command.
    #[error("socket configuration error: {0}")]
    Configuration(String),

    /// A frame on the wire did not match the IPC protocol: bad magic, an
    /// unrecognized payload type code, or a payload that is not valid JSON.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The compositor rejected a SUBSCRIBE request.
    #[error("subscription failed: {0}")]
    Subscription(String),

    /// An operation was attempted after `shutdown()`.
    #[error("client has been shut down")]
    ClientClosed,

    /// Socket-level I/O failure. Not retried internally; the recommended
    /// recovery is to discard and recreate the client.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SwaylinkError>;
