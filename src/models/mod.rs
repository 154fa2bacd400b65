pub mod workspace;

pub use workspace::{CommandOutcome, OutputInfo, Version, Workspace, WorkspaceEvent};
