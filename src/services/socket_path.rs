//! Compositor socket discovery.
//!
//! The compositor advertises its IPC socket through the `SWAYSOCK`
//! environment variable. When the variable is absent (e.g. the bar was not
//! launched from the compositor's session environment), the path is
//! recovered by asking the compositor binary itself via
//! `sway --get-socketpath`.

use std::env;
use std::path::PathBuf;
use std::process::Command;

use crate::error::{Result, SwaylinkError};

/// Environment variable naming the compositor IPC socket.
pub const SOCKET_ENV_VAR: &str = "SWAYSOCK";

/// Resolve the compositor socket path.
///
/// One-shot, synchronous lookup: `$SWAYSOCK` if set and non-empty, otherwise
/// the trimmed stdout of `sway --get-socketpath`. No caching is done here;
/// the caller owns the resolved path for its own lifetime.
///
/// # Errors
///
/// Returns `Configuration` if neither source yields a non-empty path.
pub fn socket_path() -> Result<PathBuf> {
    let discovered = env::var(SOCKET_ENV_VAR)
        .ok()
        .filter(|path| !path.is_empty())
        .or_else(discover_from_compositor);

    resolve(discovered)
}

/// Ask the compositor binary for its socket path.
fn discover_from_compositor() -> Option<String> {
    let output = Command::new("sway")
        .arg("--get-socketpath")
        .output()
        .map_err(|e| {
            tracing::debug!(error = %e, "could not run `sway --get-socketpath`");
            e
        })
        .ok()?;
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn resolve(discovered: Option<String>) -> Result<PathBuf> {
    match discovered {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Err(SwaylinkError::Configuration(format!(
            "{} is unset and `sway --get-socketpath` yielded no path",
            SOCKET_ENV_VAR
        ))),
    }
}
