use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Swaylink - talk to a Sway/i3 compositor over its IPC socket
#[derive(Parser)]
#[command(name = "swaylink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Compositor socket path (falls back to `sway --get-socketpath`)
    #[arg(long, global = true, env = "SWAYSOCK")]
    pub socket: Option<PathBuf>,

    /// Raw JSON output instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List workspaces
    Workspaces,

    /// List outputs
    Outputs,

    /// Show the compositor version
    Version,

    /// Run a compositor command (e.g. "workspace 2")
    Run {
        /// Command string, passed to the compositor verbatim
        command: String,
    },

    /// Stream events as JSON lines until interrupted
    Watch {
        /// Event kinds to subscribe to (default: all)
        events: Vec<String>,
    },
}
