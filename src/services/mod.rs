pub mod socket_path;
pub mod workspaces;

pub use socket_path::socket_path;
pub use workspaces::{TrackedWorkspace, WorkspaceTracker, switch_command};
