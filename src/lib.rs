//! Swaylink - a Sway/i3 IPC client for status bars and desktop widgets
//!
//! Swaylink keeps two persistent connections to the compositor: a command
//! connection serving strictly ordered request/response exchanges, and an
//! event connection delivering a live subscription stream. Both are driven by
//! background tasks, so callers (typically bar widgets) never block on
//! socket I/O.

pub mod cli;
pub mod error;
pub mod ipc;
pub mod models;
pub mod output;
pub mod services;

pub use error::{Result, SwaylinkError};
pub use ipc::client::SwayClient;
pub use ipc::protocol::{CommandKind, EventKind};
