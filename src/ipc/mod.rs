//! Compositor IPC: wire protocol, channels, and the client facade.
//!
//! - [`protocol`] - message kinds and binary frame codec
//! - [`command`] - queued request/response dispatch over one connection
//! - [`events`] - long-lived event subscription over a second connection
//! - [`client`] - the [`SwayClient`] facade composing the two

pub mod client;
pub mod command;
pub mod events;
pub mod protocol;

pub use client::SwayClient;
pub use command::ResponseHandler;
pub use events::EventHandler;
pub use protocol::{CommandKind, EventKind, MessageType};
