//! Human-readable rendering of compositor responses for the CLI.

use serde_json::Value;
use tabled::{Table, Tabled};

use crate::models::workspace::{OutputInfo, Workspace};

#[derive(Tabled)]
struct WorkspaceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Num")]
    num: String,
    #[tabled(rename = "Output")]
    output: String,
    #[tabled(rename = "Focused")]
    focused: bool,
    #[tabled(rename = "Visible")]
    visible: bool,
    #[tabled(rename = "Urgent")]
    urgent: bool,
}

impl From<&Workspace> for WorkspaceRow {
    fn from(workspace: &Workspace) -> Self {
        Self {
            name: workspace.name.clone(),
            num: workspace
                .num
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            output: workspace.output.clone().unwrap_or_else(|| "-".to_string()),
            focused: workspace.focused,
            visible: workspace.visible,
            urgent: workspace.urgent,
        }
    }
}

pub fn format_workspaces(workspaces: &[Workspace]) -> String {
    if workspaces.is_empty() {
        return "No workspaces found.\n".to_string();
    }
    let rows: Vec<WorkspaceRow> = workspaces.iter().map(WorkspaceRow::from).collect();
    Table::new(rows).to_string()
}

#[derive(Tabled)]
struct OutputRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Active")]
    active: bool,
    #[tabled(rename = "Focused")]
    focused: bool,
    #[tabled(rename = "Workspace")]
    workspace: String,
}

impl From<&OutputInfo> for OutputRow {
    fn from(output: &OutputInfo) -> Self {
        Self {
            name: output.name.clone(),
            active: output.active,
            focused: output.focused,
            workspace: output
                .current_workspace
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn format_outputs(outputs: &[OutputInfo]) -> String {
    if outputs.is_empty() {
        return "No outputs found.\n".to_string();
    }
    let rows: Vec<OutputRow> = outputs.iter().map(OutputRow::from).collect();
    Table::new(rows).to_string()
}

/// Pretty-print any JSON payload (used by `--json` and `watch`).
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_table_lists_every_row() {
        let workspaces = vec![
            Workspace {
                name: "1".to_string(),
                num: Some(1),
                focused: true,
                urgent: false,
                visible: true,
                output: Some("eDP-1".to_string()),
            },
            Workspace {
                name: "mail".to_string(),
                num: None,
                focused: false,
                urgent: true,
                visible: false,
                output: None,
            },
        ];

        let table = format_workspaces(&workspaces);
        assert!(table.contains("eDP-1"));
        assert!(table.contains("mail"));
    }

    #[test]
    fn empty_lists_render_a_message() {
        assert_eq!(format_workspaces(&[]), "No workspaces found.\n");
        assert_eq!(format_outputs(&[]), "No outputs found.\n");
    }
}
