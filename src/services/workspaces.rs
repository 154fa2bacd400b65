//! Workspace-set reconciliation for a bar widget.
//!
//! A [`WorkspaceTracker`] owns the displayed workspace set for one bar
//! instance: seeded once from a GET_WORKSPACES response, then kept current
//! from WORKSPACE events ("init" adds, "empty" removes, "focus" and
//! "urgent" update flags). Persistent workspaces from configuration are
//! always shown and never removed by "empty".
//!
//! State is per-instance; two bars on two outputs each own their own
//! tracker.

use std::collections::HashMap;

use crate::models::workspace::{Workspace, WorkspaceEvent};

/// One tracked workspace, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedWorkspace {
    pub name: String,
    pub focused: bool,
    pub urgent: bool,
    /// Pinned by configuration; survives "empty" events.
    pub persistent: bool,
}

/// The displayed workspace set for one bar.
pub struct WorkspaceTracker {
    /// Output this bar lives on; `None` shows workspaces from all outputs.
    output: Option<String>,
    /// Configured persistent workspaces: name to the outputs it should
    /// appear on (empty list = every output).
    persistent: HashMap<String, Vec<String>>,
    entries: Vec<TrackedWorkspace>,
}

impl WorkspaceTracker {
    pub fn new(output: Option<String>, persistent: HashMap<String, Vec<String>>) -> Self {
        Self {
            output,
            persistent,
            entries: Vec::new(),
        }
    }

    /// Current workspaces, ordered: numeric names ascending first, then
    /// named workspaces in arrival order.
    pub fn workspaces(&self) -> &[TrackedWorkspace] {
        &self.entries
    }

    pub fn focused(&self) -> Option<&TrackedWorkspace> {
        self.entries.iter().find(|workspace| workspace.focused)
    }

    /// Replace the tracked set from a GET_WORKSPACES response, then merge
    /// in the configured persistent workspaces.
    pub fn seed(&mut self, workspaces: &[Workspace]) {
        self.entries.clear();

        for workspace in workspaces {
            let outputs: Vec<String> = workspace.output.iter().cloned().collect();
            if self.shown_on_this_bar(&outputs) {
                self.insert(TrackedWorkspace {
                    name: workspace.name.clone(),
                    focused: workspace.focused,
                    urgent: workspace.urgent,
                    persistent: false,
                });
            }
        }

        let persistent: Vec<(String, Vec<String>)> = self
            .persistent
            .iter()
            .map(|(name, outputs)| (name.clone(), outputs.clone()))
            .collect();
        for (name, outputs) in persistent {
            if !self.shown_on_this_bar(&outputs) {
                continue;
            }
            match self.entries.iter().position(|entry| entry.name == name) {
                Some(index) => self.entries[index].persistent = true,
                None => self.insert(TrackedWorkspace {
                    name,
                    focused: false,
                    urgent: false,
                    persistent: true,
                }),
            }
        }
    }

    /// Apply one WORKSPACE event. Returns whether the displayed set or any
    /// flag changed.
    pub fn apply(&mut self, event: &WorkspaceEvent) -> bool {
        match event.change.as_str() {
            "init" => {
                let Some(current) = &event.current else {
                    return false;
                };
                if self.entries.iter().any(|entry| entry.name == current.name) {
                    return false;
                }
                self.insert(TrackedWorkspace {
                    name: current.name.clone(),
                    focused: current.focused,
                    urgent: current.urgent,
                    persistent: false,
                });
                true
            }
            "empty" => {
                let Some(current) = &event.current else {
                    return false;
                };
                let before = self.entries.len();
                self.entries
                    .retain(|entry| entry.persistent || entry.name != current.name);
                before != self.entries.len()
            }
            "focus" => {
                let Some(current) = &event.current else {
                    return false;
                };
                let mut changed = false;
                for entry in &mut self.entries {
                    let focused = entry.name == current.name;
                    if entry.focused != focused {
                        entry.focused = focused;
                        changed = true;
                    }
                }
                changed
            }
            "urgent" => {
                let Some(current) = &event.current else {
                    return false;
                };
                match self
                    .entries
                    .iter_mut()
                    .find(|entry| entry.name == current.name)
                {
                    Some(entry) if entry.urgent != current.urgent => {
                        entry.urgent = current.urgent;
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn insert(&mut self, workspace: TrackedWorkspace) {
        if self.entries.iter().any(|entry| entry.name == workspace.name) {
            return;
        }
        self.entries.push(workspace);
        // Numeric names ascending, then named workspaces in arrival order.
        self.entries.sort_by_key(|entry| match entry.name.parse::<i64>() {
            Ok(n) => (0, n),
            Err(_) => (1, 0),
        });
    }

    fn shown_on_this_bar(&self, outputs: &[String]) -> bool {
        match &self.output {
            None => true,
            Some(bar_output) => outputs.is_empty() || outputs.iter().any(|o| o == bar_output),
        }
    }
}

/// Compositor command that switches to the named workspace; submit it as a
/// RUN_COMMAND payload.
pub fn switch_command(name: &str) -> String {
    format!("workspace {}", name)
}
